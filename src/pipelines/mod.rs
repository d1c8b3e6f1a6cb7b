//! Render pipelines and their uniforms.
//!
//! - `light` holds the directional light and its uniform buffer
//! - `terrain` builds the instanced terrain pipeline and uploads tile instances

pub mod light;
pub mod terrain;
