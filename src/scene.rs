//! The scene aggregate and its per-frame tick.
//!
//! A [`Scene`] owns everything the frame needs apart from GPU handles: camera,
//! orbit controls, movement flags, the directional light and the terrain. It is
//! built once at start-up. The terrain is empty until the texture load finishes
//! and is replaced exactly once by [`Scene::attach_terrain`].
//!
//! The host drives it through three entry points:
//!
//! - [`Scene::handle_window_events`] for keyboard and mouse input
//! - [`Scene::resize`] when the viewport changes
//! - [`Scene::tick`] once per animation frame, before rendering

use winit::event::WindowEvent;

use crate::{
    camera::{Camera, CameraController, OrbitControls, Projection},
    config::SceneConfig,
    data_structures::terrain::{Terrain, TerrainMaterials},
    input::MovementFlags,
    pipelines::{light::DirectionalLight, terrain::TerrainMaterial},
};

/// Where the ground is in its one-shot life cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainStatus {
    Loading,
    Ready,
    Failed,
}

/// Result of one [`Scene::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Horizontal forward direction used for this frame's movement.
    pub forward: cgmath::Vector3<f32>,
    pub moved: bool,
    pub orbited: bool,
}

#[derive(Debug)]
pub struct Scene<M = TerrainMaterial> {
    pub config: SceneConfig,
    pub camera: Camera,
    pub projection: Projection,
    pub controls: OrbitControls,
    pub controller: CameraController,
    pub input: MovementFlags,
    pub light: DirectionalLight,
    terrain: Terrain<M>,
    status: TerrainStatus,
    frames: u64,
}

impl<M> Scene<M> {
    pub fn new(config: SceneConfig, width: u32, height: u32) -> Self {
        let camera = Camera::from_config(&config.camera);
        let projection = Projection::new(
            width,
            height,
            cgmath::Deg(config.camera.fovy),
            config.camera.znear,
            config.camera.zfar,
        );
        let mut controls = OrbitControls::new(&config.controls);
        controls.resize(height);
        let controller = CameraController::new(config.movement_speed);
        let light = DirectionalLight::from_config(&config.light);
        Self {
            config,
            camera,
            projection,
            controls,
            controller,
            input: MovementFlags::new(),
            light,
            terrain: Terrain::empty(),
            status: TerrainStatus::Loading,
            frames: 0,
        }
    }

    pub fn terrain(&self) -> &Terrain<M> {
        &self.terrain
    }

    pub fn terrain_status(&self) -> TerrainStatus {
        self.status
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Add the terrain once its textures have resolved.
    ///
    /// A failed load leaves the ground empty; the error is logged, not returned.
    /// Later calls are ignored since the terrain is static once attached.
    pub fn attach_terrain(&mut self, loaded: anyhow::Result<TerrainMaterials<M>>) -> &Terrain<M> {
        if self.status != TerrainStatus::Loading {
            log::warn!("Terrain already attached, ignoring another texture load");
            return &self.terrain;
        }
        self.status = if loaded.is_ok() {
            TerrainStatus::Ready
        } else {
            TerrainStatus::Failed
        };
        self.terrain = Terrain::from_load(&self.config.terrain, loaded);
        &self.terrain
    }

    /// Route keyboard events to the movement flags and mouse events to the
    /// orbit controls. Returns true if the scene used the event.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { .. } | WindowEvent::Focused(_) => {
                self.input.handle_window_events(event)
            }
            _ => self.controls.handle_window_events(event),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.controls.resize(height);
    }

    /// Advance one animation frame: fly according to the held keys, re-aim the
    /// orbit target one unit ahead and apply the damped orbit update.
    pub fn tick(&mut self) -> Frame {
        let before = self.camera.position;
        let forward = self.controller.update(&mut self.camera, &self.input);
        let moved = self.camera.position != before;
        let orbited = self.controls.update(&mut self.camera);
        self.frames += 1;
        Frame {
            forward,
            moved,
            orbited,
        }
    }
}
