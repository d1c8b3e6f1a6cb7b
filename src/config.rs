//! Scene configuration.
//!
//! Every tunable of the scene lives in [`SceneConfig`]: the sky colour, the
//! camera start pose and projection, the orbit-control damping, the free-fly
//! speed, the directional light and the terrain layout. The `Default` value is
//! the tiled terrain; [`SceneConfig::single_plane`] is the one-tile variant with
//! a single repeating texture.

use anyhow::{Result, bail};

/// Light blue sky.
pub const SKY_COLOUR: u32 = 0xaee2ff;

/// World units the camera travels per frame while a movement key is held.
pub const MOVEMENT_SPEED: f32 = 0.1;

/// Texture used by the single-plane variant.
pub const ISLAND_TEXTURE_URL: &str = "https://iili.io/FvNKWla.jpg";

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 7.0],
            target: [0.0, 0.0, 0.0],
            fovy: 70.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    pub damping_factor: f32,
    /// Polar angles are measured from world up, in radians.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2,
            rotate_speed: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// The light shines from here towards the origin.
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [10.0, 20.0, 10.0],
            colour: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TerrainConfig {
    pub grid_size: u32,
    pub tile_size: f32,
    /// A URL or a file name below `assets/`.
    pub land_texture: String,
    pub grass_texture: String,
    /// How often a texture repeats across one tile (wrap S/T = repeat).
    pub texture_repeat: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            tile_size: 50.0,
            land_texture: "land.png".to_string(),
            grass_texture: "grass.png".to_string(),
            texture_repeat: 1.0,
        }
    }
}

impl TerrainConfig {
    /// Edge length of the whole terrain.
    pub fn extent(&self) -> f32 {
        self.grid_size as f32 * self.tile_size
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub sky_colour: u32,
    pub movement_speed: f32,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub light: LightConfig,
    pub terrain: TerrainConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sky_colour: SKY_COLOUR,
            movement_speed: MOVEMENT_SPEED,
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            light: LightConfig::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl SceneConfig {
    /// One 200x200 plane with the island texture repeated 20 times per axis.
    pub fn single_plane() -> Self {
        Self {
            terrain: TerrainConfig {
                grid_size: 1,
                tile_size: 200.0,
                land_texture: ISLAND_TEXTURE_URL.to_string(),
                grass_texture: ISLAND_TEXTURE_URL.to_string(),
                texture_repeat: 20.0,
            },
            ..Default::default()
        }
    }

    pub fn with_grid(mut self, grid_size: u32, tile_size: f32) -> Self {
        self.terrain.grid_size = grid_size;
        self.terrain.tile_size = tile_size;
        self
    }

    pub fn with_textures(mut self, land: impl Into<String>, grass: impl Into<String>) -> Self {
        self.terrain.land_texture = land.into();
        self.terrain.grass_texture = grass.into();
        self
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_sky_colour(mut self, rgb: u32) -> Self {
        self.sky_colour = rgb;
        self
    }

    /// Sky colour as a linear clear colour for an sRGB surface.
    pub fn clear_colour(&self) -> wgpu::Color {
        let channel = |shift: u32| srgb_to_linear(((self.sky_colour >> shift) & 0xff) as f64 / 255.0);
        wgpu::Color {
            r: channel(16),
            g: channel(8),
            b: channel(0),
            a: 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let terrain = &self.terrain;
        if terrain.grid_size == 0 {
            bail!("terrain grid size must be at least 1");
        }
        if !(terrain.tile_size.is_finite() && terrain.tile_size > 0.0) {
            bail!("tile size must be positive, got {}", terrain.tile_size);
        }
        if !(terrain.texture_repeat.is_finite() && terrain.texture_repeat > 0.0) {
            bail!("texture repeat must be positive, got {}", terrain.texture_repeat);
        }
        if !(self.movement_speed.is_finite() && self.movement_speed >= 0.0) {
            bail!("movement speed must not be negative, got {}", self.movement_speed);
        }
        let camera = &self.camera;
        if !(camera.znear > 0.0 && camera.znear < camera.zfar) {
            bail!(
                "camera clip planes must satisfy 0 < znear < zfar, got {}..{}",
                camera.znear,
                camera.zfar
            );
        }
        if !(camera.fovy > 0.0 && camera.fovy < 180.0) {
            bail!("field of view must be within (0, 180) degrees, got {}", camera.fovy);
        }
        let controls = &self.controls;
        if !(controls.damping_factor > 0.0 && controls.damping_factor <= 1.0) {
            bail!("damping factor must be within (0, 1], got {}", controls.damping_factor);
        }
        if controls.min_polar_angle < 0.0
            || controls.max_polar_angle > std::f32::consts::PI
            || controls.min_polar_angle > controls.max_polar_angle
        {
            bail!(
                "polar angle range {}..{} is invalid",
                controls.min_polar_angle,
                controls.max_polar_angle
            );
        }
        Ok(())
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
