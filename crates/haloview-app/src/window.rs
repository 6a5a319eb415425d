//! Window creation and event handling via winit.
//!
//! Provides [`ViewerApp`] which implements winit's [`ApplicationHandler`]
//! trait, and [`run_with_config`] to start the event loop. Each frame runs in
//! a fixed order: consume the selection signal, gather input, advance the
//! fly-to interpolation, update orbit damping against the current target,
//! then render.

use std::sync::Arc;

use haloview_camera::{FlyToAnimator, OrbitCamera};
use haloview_catalog::{Catalog, CatalogGenerator};
use haloview_config::Config;
use haloview_input::{KeyboardState, MouseState};
use haloview_render::{
    Camera, DepthBuffer, HaloGeometry, HaloPipeline, LineMesh, LinePipeline, RenderContext,
    SceneBinding, SurfaceError, axis_vertices, grid_vertices, init_render_context_blocking,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::frame_loop::FrameLoop;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// GPU resources owned by the scene, created once the device exists and
/// released together on teardown.
struct SceneResources {
    depth_buffer: DepthBuffer,
    scene_binding: SceneBinding,
    halo_pipeline: HaloPipeline,
    line_pipeline: LinePipeline,
    geometry: HaloGeometry,
    grid_mesh: LineMesh,
    axes_mesh: LineMesh,
}

impl SceneResources {
    fn new(gpu: &RenderContext, config: &Config, width: u32, height: u32) -> Self {
        let depth_buffer = DepthBuffer::new(&gpu.device, width.max(1), height.max(1));
        let scene_binding = SceneBinding::new(&gpu.device);
        let halo_pipeline = HaloPipeline::new(
            &gpu.device,
            &scene_binding,
            gpu.surface_format,
            DepthBuffer::FORMAT,
        );
        let line_pipeline = LinePipeline::new(
            &gpu.device,
            &scene_binding,
            gpu.surface_format,
            DepthBuffer::FORMAT,
        );
        let geometry = HaloGeometry::new(&gpu.device);

        let grid = grid_vertices(config.render.grid_extent, config.render.grid_step);
        let grid_mesh = LineMesh::new(&gpu.device, "ground-grid", &grid);
        let axes = axis_vertices(config.render.grid_step);
        let axes_mesh = LineMesh::new(&gpu.device, "axis-indicator", &axes);

        Self {
            depth_buffer,
            scene_binding,
            halo_pipeline,
            line_pipeline,
            geometry,
            grid_mesh,
            axes_mesh,
        }
    }
}

/// Application state: window, GPU context, catalog, camera rig, and the
/// per-frame input/selection machinery.
pub struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    scene: Option<SceneResources>,
    surface_width: u32,
    surface_height: u32,
    /// False while the surface has no valid size (zero-sized container);
    /// frame work is deferred until a real size arrives.
    surface_ready: bool,
    frame_loop: FrameLoop,
    config: Config,
    catalog: Catalog,
    camera: Camera,
    orbit: OrbitCamera,
    animator: FlyToAnimator,
    selected: Option<u64>,
    selection_dirty: bool,
    keyboard: KeyboardState,
    mouse: MouseState,
}

impl ViewerApp {
    /// Creates the application state from a [`Config`], generating and
    /// filtering the demo catalog up front.
    pub fn with_config(config: Config) -> Self {
        let generator = CatalogGenerator::new(
            config.catalog.seed,
            config.catalog.halo_count,
            config.catalog.box_size,
        );
        let mut catalog = Catalog::from_records(generator.generate());
        let dropped = catalog.retain_valid();
        if dropped > 0 {
            warn!("dropped {dropped} invalid halo records from the catalog");
        }
        if config.catalog.mass_threshold > 0.0 {
            catalog = catalog.above_mass(config.catalog.mass_threshold);
        }
        info!("catalog ready: {} halos", catalog.len());

        let mut orbit = OrbitCamera::default();
        orbit.damping = config.camera.damping;
        orbit.orbit_sensitivity = config.camera.orbit_sensitivity;
        orbit.pan_sensitivity = config.camera.pan_sensitivity;
        orbit.zoom_sensitivity = config.camera.zoom_sensitivity;
        orbit.min_distance = config.camera.min_distance;
        orbit.max_distance = config.camera.max_distance;

        let animator = FlyToAnimator::new(
            config.camera.approach_scale,
            config.camera.approach_floor,
            config.camera.fly_to_duration,
        );

        let (width, height) = (config.window.width, config.window.height);
        let mut app = Self {
            window: None,
            gpu: None,
            scene: None,
            surface_width: width,
            surface_height: height,
            surface_ready: width > 0 && height > 0,
            frame_loop: FrameLoop::new(),
            config,
            catalog,
            camera: Camera::default(),
            orbit,
            animator,
            selected: None,
            selection_dirty: false,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
        };
        app.frame_initial_view();
        app
    }

    /// Place the camera so the whole catalog box is in view.
    fn frame_initial_view(&mut self) {
        let extent = self.config.catalog.box_size;
        self.orbit.set_target(glam::Vec3::ZERO);
        self.orbit
            .set_position(glam::Vec3::new(0.0, extent * 0.6, extent * 1.1));
    }

    /// Change the selection signal. A change is consumed on the next frame.
    pub fn set_selection(&mut self, selected: Option<u64>) {
        if self.selected != selected {
            self.selected = selected;
            self.selection_dirty = true;
        }
    }

    /// The currently selected halo id, if any.
    pub fn selected(&self) -> Option<u64> {
        self.selected
    }

    /// Move the selection forward or backward through the catalog order.
    fn cycle_selection(&mut self, step: i64) {
        let records = self.catalog.records();
        if records.is_empty() {
            return;
        }
        let len = records.len() as i64;
        let next = match self
            .selected
            .and_then(|id| records.iter().position(|h| h.id == id))
        {
            Some(index) => (index as i64 + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        let id = records[next as usize].id;
        self.set_selection(Some(id));
    }

    /// Consume a pending selection change: start a fly-to for a resolvable
    /// id, cancel on deselection, and silently ignore unknown ids (selection
    /// racing a catalog update is an expected transient).
    fn apply_selection(&mut self) {
        if !self.selection_dirty {
            return;
        }
        self.selection_dirty = false;

        match self.selected {
            None => self.animator.cancel(),
            Some(id) => match self.catalog.find(id) {
                Some(halo) => {
                    info!(
                        "flying to halo {id} at {:?} (outer radius {} Mpc)",
                        halo.position, halo.outer_radius
                    );
                    self.animator.start(
                        self.orbit.position(),
                        self.orbit.target(),
                        halo.position,
                        halo.outer_radius,
                    );
                }
                None => debug!("selection {id} not present in catalog, ignoring"),
            },
        }
    }

    /// Demo bindings standing in for the external selector: Tab / Shift-Tab
    /// cycle through halos, Escape clears the selection.
    fn handle_selection_keys(&mut self) {
        let tab = PhysicalKey::Code(KeyCode::Tab);
        if self.keyboard.just_pressed(tab) {
            let backward = self
                .keyboard
                .is_pressed(PhysicalKey::Code(KeyCode::ShiftLeft))
                || self
                    .keyboard
                    .is_pressed(PhysicalKey::Code(KeyCode::ShiftRight));
            self.cycle_selection(if backward { -1 } else { 1 });
        }
        if self
            .keyboard
            .just_pressed(PhysicalKey::Code(KeyCode::Escape))
        {
            self.set_selection(None);
        }
    }

    /// Apply a new surface size: surface, depth buffer, and camera aspect
    /// together, before the next frame reads any of them.
    fn handle_resize(&mut self, width: u32, height: u32) {
        self.surface_ready = width > 0 && height > 0;
        if !self.surface_ready {
            debug!("zero-sized surface, deferring frame work");
            return;
        }
        self.surface_width = width;
        self.surface_height = height;

        self.camera.set_aspect_ratio(width as f32, height as f32);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
        }
        if let (Some(scene), Some(gpu)) = (&mut self.scene, &self.gpu) {
            scene.depth_buffer.resize(&gpu.device, width, height);
        }
        info!("surface resized to {width}x{height}");
    }

    fn initialize_scene(&mut self, gpu: &RenderContext) {
        let mut scene =
            SceneResources::new(gpu, &self.config, self.surface_width, self.surface_height);

        // Catalog records were validated upstream; a failure here is a
        // boundary violation and is surfaced loudly, leaving an empty scene.
        if let Err(e) = scene.geometry.rebuild(&gpu.device, self.catalog.records()) {
            error!("halo geometry rejected catalog data: {e}");
        }

        self.camera
            .set_aspect_ratio(self.surface_width as f32, self.surface_height as f32);
        self.scene = Some(scene);
    }

    /// Run one frame: selection, input, fixed-rate updates, render.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if !self.surface_ready {
            return;
        }

        self.handle_selection_keys();
        self.apply_selection();
        self.orbit.handle_input(&self.mouse);

        let animator = &mut self.animator;
        let orbit = &mut self.orbit;
        self.frame_loop.tick(|dt| {
            // Order matters: advance the fly-to first so damping this tick
            // sees the target it just moved.
            animator.advance(dt as f32, orbit);
            orbit.update();
        });

        self.render(event_loop);

        self.keyboard.clear_transients();
        self.mouse.clear_transients();
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let Some(scene) = &self.scene else {
            return;
        };

        self.orbit.apply_to(&mut self.camera);
        let uniform = self
            .camera
            .to_scene_uniform(self.config.render.point_color);
        scene.scene_binding.update(&gpu.queue, &uniform);

        match gpu.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    gpu.device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("frame-encoder"),
                        });

                {
                    let bg = self.config.render.background;
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("viewer-pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: bg[0] as f64,
                                    g: bg[1] as f64,
                                    b: bg[2] as f64,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &scene.depth_buffer.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                        multiview_mask: None,
                    });

                    scene.line_pipeline.draw(
                        &mut pass,
                        &scene.scene_binding,
                        &[&scene.grid_mesh, &scene.axes_mesh],
                    );
                    scene
                        .halo_pipeline
                        .draw(&mut pass, &scene.scene_binding, &scene.geometry);
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                surface_texture.present();
            }
            Err(SurfaceError::Lost) => {
                gpu.resize(self.surface_width, self.surface_height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }
    }

    /// Teardown: cancel any in-flight animation synchronously, then release
    /// GPU geometry. Safe to call more than once.
    fn shutdown(&mut self) {
        self.animator.cancel();
        if let Some(scene) = &mut self.scene {
            scene.geometry.release_instances();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = match event_loop.create_window(attrs) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    error!("Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let inner_size = window.inner_size();
            self.surface_width = inner_size.width.max(1);
            self.surface_height = inner_size.height.max(1);
            self.surface_ready = inner_size.width > 0 && inner_size.height > 0;

            match init_render_context_blocking(window.clone()) {
                Ok(ctx) => {
                    self.initialize_scene(&ctx);
                    self.gpu = Some(ctx);
                }
                Err(e) => {
                    error!("GPU initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            }

            window.request_redraw();
            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    self.handle_resize(new_inner.width, new_inner.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer with the given config.
///
/// This function blocks until the window is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = ViewerApp::with_config(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
