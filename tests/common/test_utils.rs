use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use cgmath::{InnerSpace, Point3, Vector3};
use tiled_isle::{
    Scene, SceneConfig,
    data_structures::terrain::TerrainMaterials,
    resources::TextureProvider,
};

pub const EPS: f32 = 1e-4;

pub fn assert_vec_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < EPS,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub fn assert_point_eq(actual: Point3<f32>, expected: Point3<f32>) {
    assert_vec_eq(
        Vector3::new(actual.x, actual.y, actual.z),
        Vector3::new(expected.x, expected.y, expected.z),
    );
}

/// A headless scene with an 800x600 viewport.
pub fn scene(config: SceneConfig) -> Scene<String> {
    Scene::new(config, 800, 600)
}

pub fn materials() -> TerrainMaterials<String> {
    TerrainMaterials {
        land: "land".to_string(),
        grass: "grass".to_string(),
    }
}

/// Texture provider that hands out the requested name and records every
/// request. Names in `failing` are rejected.
#[derive(Default)]
pub struct FakeTextures {
    failing: HashSet<String>,
    requests: RefCell<HashMap<String, usize>>,
}

impl FakeTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(name: &str) -> Self {
        let mut provider = Self::default();
        provider.failing.insert(name.to_string());
        provider
    }

    pub fn requests(&self, name: &str) -> usize {
        self.requests.borrow().get(name).copied().unwrap_or(0)
    }

    pub fn total_requests(&self) -> usize {
        self.requests.borrow().values().sum()
    }
}

impl TextureProvider for FakeTextures {
    type Texture = String;

    async fn load(&self, name: &str) -> anyhow::Result<String> {
        *self
            .requests
            .borrow_mut()
            .entry(name.to_string())
            .or_default() += 1;
        if self.failing.contains(name) {
            anyhow::bail!("404 Not Found: {}", name);
        }
        Ok(name.to_string())
    }
}
