//! tiled-isle
//!
//! A small island scene rendered with wgpu: a flat ground of textured tiles in
//! a repeating land and grass pattern, lit by one directional light under a
//! sky-blue clear colour. The camera orbits its target with the mouse and flies
//! with the keyboard. Runs natively and in the browser.
//!
//! High-level modules
//! - `camera`: camera, projection, fly controller and orbit controls
//! - `config`: scene configuration and its validation
//! - `context`: GPU and window context that owns device, queue and pipelines
//! - `data_structures`: terrain model, instances, plane mesh and textures
//! - `flow`: the event loop driving the scene
//! - `input`: keyboard movement flags
//! - `pipelines`: terrain and light pipeline pieces
//! - `render`: instanced draw calls
//! - `resources`: texture loading
//! - `scene`: the scene aggregate and its per-frame tick
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Deg, Point3, Vector3};
pub use config::SceneConfig;
pub use flow::run;
pub use scene::{Scene, TerrainStatus};
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point. Renders the default scene into the `canvas` element.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    flow::run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
