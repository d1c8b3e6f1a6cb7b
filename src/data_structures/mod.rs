//! Engine data structures: terrain, meshes, textures and instances.
//!
//! - `terrain` holds the tile pattern, the tile layout and the built terrain
//! - `mesh` contains the shared plane geometry and vertex layout
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data

pub mod instance;
pub mod mesh;
pub mod terrain;
pub mod texture;
