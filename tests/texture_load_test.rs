use futures::executor::block_on;
use tiled_isle::{
    SceneConfig, TerrainStatus,
    data_structures::terrain::{Material, Terrain},
    resources::{
        load_terrain_materials,
        texture::{extension_hint, is_remote},
    },
};

use crate::common::test_utils::{FakeTextures, materials, scene};
mod common;

#[test]
fn loads_both_textures_once() {
    let provider = FakeTextures::new();
    let config = SceneConfig::default();
    let loaded = block_on(load_terrain_materials(&provider, &config.terrain)).unwrap();
    assert_eq!(loaded.land, "land.png");
    assert_eq!(loaded.grass, "grass.png");
    assert_eq!(provider.requests("land.png"), 1);
    assert_eq!(provider.requests("grass.png"), 1);
}

#[test]
fn shared_texture_is_loaded_once() {
    let provider = FakeTextures::new();
    let config = SceneConfig::single_plane();
    let loaded = block_on(load_terrain_materials(&provider, &config.terrain)).unwrap();
    assert_eq!(loaded.land, loaded.grass);
    assert_eq!(provider.total_requests(), 1);
}

#[test]
fn one_rejected_texture_fails_the_load() {
    let provider = FakeTextures::failing("grass.png");
    let config = SceneConfig::default();
    let err = block_on(load_terrain_materials(&provider, &config.terrain)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("grass texture grass.png"), "{}", message);
    assert!(message.contains("404"), "{}", message);
}

#[test]
fn scene_starts_without_terrain() {
    let mut scene = scene(SceneConfig::default());
    assert_eq!(scene.terrain_status(), TerrainStatus::Loading);
    assert!(scene.terrain().is_empty());
    // frames keep running while textures load
    scene.tick();
    scene.tick();
    assert_eq!(scene.frames(), 2);
}

#[test]
fn successful_load_attaches_the_grid() {
    let provider = FakeTextures::new();
    let mut scene = scene(SceneConfig::default());
    let loaded = block_on(load_terrain_materials(&provider, &scene.config.terrain));
    let terrain = scene.attach_terrain(loaded);
    assert_eq!(terrain.tiles().len(), 16);
    assert_eq!(scene.terrain_status(), TerrainStatus::Ready);
    let shared = scene.terrain().materials().unwrap();
    assert_eq!(shared.get(Material::Land), "land.png");
    assert_eq!(shared.get(Material::Grass), "grass.png");
}

#[test]
fn failed_load_leaves_the_ground_empty() {
    let provider = FakeTextures::failing("land.png");
    let mut scene = scene(SceneConfig::default());
    let loaded = block_on(load_terrain_materials(&provider, &scene.config.terrain));
    assert!(scene.attach_terrain(loaded).is_empty());
    assert_eq!(scene.terrain_status(), TerrainStatus::Failed);
    assert!(scene.terrain().materials().is_none());

    // the scene keeps running without terrain
    let frame = scene.tick();
    assert!(!frame.moved);
}

#[test]
fn terrain_is_attached_only_once() {
    let mut scene = scene(SceneConfig::default());
    scene.attach_terrain(Err(anyhow::anyhow!("offline")));
    scene.attach_terrain(Ok(materials()));
    assert!(scene.terrain().is_empty());
    assert_eq!(scene.terrain_status(), TerrainStatus::Failed);
}

#[test]
fn from_load_builds_or_empties() {
    let config = SceneConfig::default().with_grid(2, 10.0);
    let built = Terrain::from_load(&config.terrain, Ok(materials()));
    assert_eq!(built.tiles().len(), 4);
    let failed: Terrain<String> = Terrain::from_load(&config.terrain, Err(anyhow::anyhow!("nope")));
    assert!(failed.is_empty());
}

#[test]
fn texture_names() {
    assert!(is_remote("https://iili.io/FvNKWla.jpg"));
    assert!(is_remote("http://example.com/land.png"));
    assert!(!is_remote("land.png"));

    assert_eq!(extension_hint("https://iili.io/FvNKWla.jpg"), Some("jpg"));
    assert_eq!(extension_hint("land.png"), Some("png"));
    assert_eq!(extension_hint("tiles/grass.webp?v=2"), Some("webp"));
    assert_eq!(extension_hint("README"), None);
    assert_eq!(extension_hint(".hidden"), None);
    assert_eq!(extension_hint("https://example.com/textures/"), None);
}

#[test]
fn attached_terrain_is_used_with_the_configured_repeat() {
    let mut scene = scene(SceneConfig::single_plane());
    let texture_repeat = scene.config.terrain.texture_repeat;
    let terrain = scene.attach_terrain(Ok(materials()));
    assert_eq!(terrain.tiles().len(), 1);
    assert_eq!(texture_repeat, 20.0);
    assert_eq!(scene.terrain_status(), TerrainStatus::Ready);
}
