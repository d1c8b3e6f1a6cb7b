//! Flat tiled terrain.
//!
//! The terrain is a square grid of planar tiles laid edge-to-edge and centred at
//! the origin. Each tile shows one of two materials, picked by a fixed periodic
//! [`PATTERN`]. Tiles only reference a [`Material`] kind; the actual material
//! data (textures, bind groups) exists once per kind in [`TerrainMaterials`].

use cgmath::Rotation3;

use crate::{config::TerrainConfig, data_structures::instance::Instance};

/// The two surface kinds a tile can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Land,
    Grass,
}

use Material::{Grass as G, Land as L};

pub const PATTERN_WIDTH: u32 = 4;
pub const PATTERN_HEIGHT: u32 = 4;

/// Rows are indexed by `z`, columns by `x`.
pub const PATTERN: [[Material; PATTERN_WIDTH as usize]; PATTERN_HEIGHT as usize] = [
    [L, G, L, G],
    [G, G, L, L],
    [L, G, G, L],
    [G, L, G, L],
];

/// Material of the tile at grid coordinate `(x, z)`.
///
/// The pattern wraps, so this is defined for every coordinate, including grids
/// larger than the pattern itself.
pub fn resolve_material(x: u32, z: u32) -> Material {
    PATTERN[(z % PATTERN_HEIGHT) as usize][(x % PATTERN_WIDTH) as usize]
}

/// Centre of tile `(x, z)` in world space. `y` is always zero.
pub fn tile_position(x: u32, z: u32, grid_size: u32, tile_size: f32) -> cgmath::Vector3<f32> {
    let half_extent = grid_size as f32 * tile_size / 2.0;
    let half_tile = tile_size / 2.0;
    cgmath::Vector3::new(
        x as f32 * tile_size - half_extent + half_tile,
        0.0,
        z as f32 * tile_size - half_extent + half_tile,
    )
}

/// A placed terrain tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub x: u32,
    pub z: u32,
    pub material: Material,
    /// Edge length of the square tile.
    pub size: f32,
    pub transform: Instance,
    pub receive_shadow: bool,
}

impl Tile {
    pub fn new(x: u32, z: u32, grid_size: u32, tile_size: f32) -> Self {
        let mut transform = Instance::from(tile_position(x, z, grid_size, tile_size));
        // planes are modelled in the XY plane, this lays them flat facing +Y
        transform.rotation =
            cgmath::Quaternion::from_axis_angle(cgmath::Vector3::unit_x(), cgmath::Deg(-90.0));
        Self {
            x,
            z,
            material: resolve_material(x, z),
            size: tile_size,
            transform,
            receive_shadow: true,
        }
    }

    pub fn position(&self) -> cgmath::Vector3<f32> {
        self.transform.position
    }
}

/// The land and grass materials, created once and shared by all tiles.
#[derive(Clone, Debug)]
pub struct TerrainMaterials<M> {
    pub land: M,
    pub grass: M,
}

impl<M> TerrainMaterials<M> {
    pub fn get(&self, material: Material) -> &M {
        match material {
            Material::Land => &self.land,
            Material::Grass => &self.grass,
        }
    }
}

/// A built terrain: the tile grid plus the materials its tiles reference.
///
/// Immutable once built. An empty terrain (no tiles, no materials) stands for
/// the ground after a failed texture load.
#[derive(Debug)]
pub struct Terrain<M> {
    tiles: Vec<Tile>,
    materials: Option<TerrainMaterials<M>>,
}

impl<M> Default for Terrain<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M> Terrain<M> {
    pub fn empty() -> Self {
        Self {
            tiles: Vec::new(),
            materials: None,
        }
    }

    /// Lay out a `grid_size × grid_size` grid of `tile_size` tiles, row by row.
    pub fn build(grid_size: u32, tile_size: f32, materials: TerrainMaterials<M>) -> Self {
        let tiles = (0..grid_size)
            .flat_map(|z| (0..grid_size).map(move |x| Tile::new(x, z, grid_size, tile_size)))
            .collect::<Vec<_>>();
        log::info!(
            "Built terrain with {} tiles ({} land, {} grass)",
            tiles.len(),
            tiles.iter().filter(|t| t.material == Material::Land).count(),
            tiles.iter().filter(|t| t.material == Material::Grass).count(),
        );
        Self {
            tiles,
            materials: Some(materials),
        }
    }

    /// Build from the outcome of the texture load.
    ///
    /// A failed load is logged and yields an empty terrain; it never propagates.
    pub fn from_load(config: &TerrainConfig, loaded: anyhow::Result<TerrainMaterials<M>>) -> Self {
        match loaded {
            Ok(materials) => Self::build(config.grid_size, config.tile_size, materials),
            Err(e) => {
                log::error!("Texture failed to load: {:#}", e);
                Self::empty()
            }
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn materials(&self) -> Option<&TerrainMaterials<M>> {
        self.materials.as_ref()
    }

    pub fn tile_at(&self, x: u32, z: u32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.x == x && t.z == z)
    }

    /// Tiles showing `material`, in build order.
    pub fn tiles_of(&self, material: Material) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.material == material)
    }
}
