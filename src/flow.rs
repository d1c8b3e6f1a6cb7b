//! Application event loop.
//!
//! This module owns the winit event loop and drives the [`Scene`] from it.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window (the `canvas` element on the web), the GPU
//!    [`Context`] and the [`Scene`]
//! 2. the terrain textures start loading in the background; frames render right
//!    away with sky and light only
//! 3. once the load resolves a [`FlowEvent::TerrainLoaded`] arrives and the
//!    terrain is attached (or, on failure, the ground stays empty)
//! 4. every `RedrawRequested` ticks the scene, uploads the camera, renders and
//!    requests the next redraw
//!
//! Keyboard and mouse window events are routed to the scene before anything
//! else sees them.

use std::{fmt::Debug, iter, sync::Arc};

use anyhow::Context as _;
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    config::SceneConfig,
    context::Context,
    data_structures::terrain::TerrainMaterials,
    pipelines::terrain::{TerrainMaterial, TerrainResources},
    render::DrawTerrain,
    resources::load_terrain_materials,
    scene::Scene,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Application state bundle: GPU context, scene and surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub(crate) scene: Scene,
    terrain: Option<TerrainResources>,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let scene = Scene::new(config, size.width, size.height);
        let ctx = Context::new(window, &scene)
            .await
            .context("App initialization failed. Cannot create the main context")?;
        Ok(Self {
            ctx,
            scene,
            terrain: None,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.is_surface_configured = true;
            self.scene.resize(width, height);
        }
    }

    fn attach_terrain(&mut self, loaded: anyhow::Result<TerrainMaterials<TerrainMaterial>>) {
        let texture_repeat = self.scene.config.terrain.texture_repeat;
        let terrain = self.scene.attach_terrain(loaded);
        self.terrain = TerrainResources::new(&self.ctx.device, terrain, texture_repeat);
    }

    fn update(&mut self) {
        self.scene.tick();
        self.ctx.write_camera(&self.scene);
    }

    fn render(&mut self) -> Result<(), wgpu::CurrentSurfaceTexture> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => texture,
            status => return Err(status),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            if let Some(terrain) = &self.terrain {
                render_pass.set_pipeline(&self.ctx.terrain_pipeline);
                for instanced in terrain.instanced(self.scene.terrain()) {
                    render_pass.draw_instanced_batch(
                        &instanced,
                        &self.ctx.camera.bind_group,
                        &self.ctx.light.bind_group,
                    );
                }
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Messages sent to the event loop from background tasks.
pub enum FlowEvent {
    /// Async setup finished (web only, native setup blocks).
    Initialized(AppState),
    TerrainLoaded(anyhow::Result<TerrainMaterials<TerrainMaterial>>),
    /// Async setup failed.
    Failed(anyhow::Error),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::TerrainLoaded(Ok(_)) => f.write_str("TerrainLoaded(Ok)"),
            Self::TerrainLoaded(Err(e)) => write!(f, "TerrainLoaded(Err({}))", e),
            Self::Failed(e) => write!(f, "Failed({})", e),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent>,
    state: Option<AppState>,
    // Taken on the first `resumed`.
    config: Option<SceneConfig>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime =
            tokio::runtime::Runtime::new().context("could not start the async runtime")?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            config: Some(config),
            last_time: Instant::now(),
        })
    }

    /// Fetch the terrain textures without blocking the frame loop. The outcome
    /// comes back as a `TerrainLoaded` event.
    fn start_texture_load(&self, state: &AppState) {
        let loader = state.ctx.texture_loader();
        let terrain_config = state.scene.config.terrain.clone();
        let proxy = self.proxy.clone();
        log::info!(
            "Loading terrain textures {} and {}",
            terrain_config.land_texture,
            terrain_config.grass_texture
        );
        let load = async move {
            let loaded = load_terrain_materials(&loader, &terrain_config).await;
            if proxy.send_event(FlowEvent::TerrainLoaded(loaded)).is_err() {
                log::warn!("Event loop closed before the terrain textures arrived");
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.async_runtime.spawn(load);
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(load);
        }
    }

    fn initialized(&mut self, mut app_state: AppState) {
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        self.start_texture_load(&app_state);
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
        log::info!("Scene initialized");
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("tiled-isle");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init_future = AppState::new(window, config);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(app_state) => self.initialized(app_state),
                Err(e) => {
                    log::error!("{:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(app_state) => FlowEvent::Initialized(app_state),
                    Err(e) => FlowEvent::Failed(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("Event loop closed during initialization");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(app_state) => self.initialized(app_state),
            FlowEvent::TerrainLoaded(loaded) => match &mut self.state {
                Some(state) => state.attach_terrain(loaded),
                None => log::warn!("Terrain textures arrived before the scene was ready"),
            },
            FlowEvent::Failed(e) => {
                log::error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.scene.handle_window_events(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                log::trace!("frame {} after {:?}", state.scene.frames(), dt);

                state.update();
                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {:?}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed, which is fine.
        let _ = console_log::init_with_level(log::Level::Info);
    }

    config.validate().context("invalid scene configuration")?;

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;

    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut app = App::new(&event_loop, config)?;
        event_loop.run_app(&mut app)?;
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::EventLoopExtWebSys;

        let app = App::new(&event_loop, config)?;
        event_loop.spawn_app(app);
    }

    Ok(())
}
