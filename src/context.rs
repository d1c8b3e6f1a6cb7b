use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{CameraResources, CameraUniform},
    data_structures::texture,
    pipelines::{
        light::{LightResources, LightUniform},
        terrain::{mk_terrain_pipeline, mk_texture_layout},
    },
    resources::texture::GpuTextureLoader,
    scene::Scene,
};

/// GPU and window state shared by every frame.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    pub camera: CameraResources,
    pub light: LightResources,
    pub texture_layout: wgpu::BindGroupLayout,
    pub terrain_pipeline: wgpu::RenderPipeline,
}

impl Context {
    pub async fn new<M>(window: Arc<Window>, scene: &Scene<M>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter is compatible with the surface")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("could not open the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an Srgb surface texture. Using a different one makes
        // all the colours come out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&scene.camera, &scene.projection);

        let camera = CameraResources::new(camera_uniform, &device);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light_uniform: LightUniform = scene.light.to_uniform();
        let light = LightResources::new(light_uniform, &device);

        let texture_layout = mk_texture_layout(&device);
        let terrain_pipeline = mk_terrain_pipeline(
            &device,
            config.format,
            &texture_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            clear_colour: scene.config.clear_colour(),
            camera,
            light,
            texture_layout,
            terrain_pipeline,
            window,
            depth_texture,
        })
    }

    /// A loader that uploads textures to this context's device.
    pub fn texture_loader(&self) -> GpuTextureLoader {
        GpuTextureLoader {
            device: self.device.clone(),
            queue: self.queue.clone(),
            layout: self.texture_layout.clone(),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
        true
    }

    pub fn write_camera<M>(&mut self, scene: &Scene<M>) {
        self.camera.write(&self.queue, &scene.camera, &scene.projection);
    }
}
