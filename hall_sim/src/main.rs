//! Hall Effect Visualization
//!
//! A carrier crosses a conductor in a magnetic field; wall strikes build up
//! edge charge whose Hall voltage pushes back on the next carrier.
//!
//! Controls:
//! - Up/Down: Adjust magnetic field
//! - Left/Right: Adjust drive current
//! - S: Switch between electrons and holes
//! - R: Reset accumulated charge
//! - Space: Pause/resume
//! - Escape: Quit

use common::{Camera2D, GraphicsContext};
use glam::Vec2;
use hall_sim::controller::{Command, SimulationController};
use hall_sim::equations_ui::{draw_equations_sidebar, draw_hud, HALL_EQUATIONS, HALL_VARIABLES};
use hall_sim::renderer::{HallRenderer, Scene, SceneViewport};
use hall_sim::SimulationConfig;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const WINDOW_WIDTH: u32 = 1200;
const WINDOW_HEIGHT: u32 = 800;

const FIELD_STEP: f64 = 0.2;
const CURRENT_STEP: f64 = 0.1;

/// Longest frame the physics is allowed to see
const MAX_FRAME_DT: f32 = 0.1;

/// Padding around the conductor, as a fraction of its half extents
const VIEW_MARGIN: f32 = 1.1;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: HallRenderer,
    simulation: SimulationController,
    camera: Camera2D,
    viewport: SceneViewport,
    pending: Vec<Command>,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, simulation: SimulationController) -> Self {
        let renderer = HallRenderer::new(&ctx, 16, 128);

        // Whole window until egui has laid out its panels
        let viewport = SceneViewport::full(ctx.size.width, ctx.size.height);
        let camera = frame_conductor(&simulation, ctx.aspect_ratio());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            simulation,
            camera,
            viewport,
            pending: Vec::new(),
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.viewport = SceneViewport::full(self.ctx.size.width, self.ctx.size.height);
        self.camera = frame_conductor(&self.simulation, self.ctx.aspect_ratio());
    }

    /// Commands first, then physics
    fn update(&mut self, dt: f32) {
        for command in self.pending.drain(..) {
            self.simulation.apply(command);
        }
        self.simulation.step(dt as f64);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let snapshot = self.simulation.snapshot();

        // Panels first, so the scene can be fitted to what they leave free
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let mut free = egui::Rect::NOTHING;
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_equations_sidebar(ctx, "Hall Effect", HALL_EQUATIONS, HALL_VARIABLES);
            draw_hud(ctx, &snapshot);
            free = ctx.available_rect();
        });

        self.viewport = SceneViewport::from_points(
            Vec2::new(free.min.x, free.min.y),
            Vec2::new(free.max.x, free.max.y),
            full_output.pixels_per_point,
            self.ctx.size.width,
            self.ctx.size.height,
        );
        self.camera = frame_conductor(&self.simulation, self.viewport.aspect_ratio());
        self.renderer.update_camera(&self.ctx.queue, &self.camera);

        let geometry = self.simulation.geometry();
        let mut scene = Scene::default();
        scene.add_conductor(geometry);
        scene.add_carrier(
            self.simulation.carrier(),
            self.simulation.params().polarity,
            geometry,
        );
        let counts = self.renderer.upload(&self.ctx.queue, &scene);

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, self.viewport, counts);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Map a key press to a command; `false` asks to quit
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return true;
        }

        let command = match key {
            KeyCode::Escape => return false,
            KeyCode::ArrowUp => Command::AdjustField(FIELD_STEP),
            KeyCode::ArrowDown => Command::AdjustField(-FIELD_STEP),
            KeyCode::ArrowRight => Command::AdjustCurrent(CURRENT_STEP),
            KeyCode::ArrowLeft => Command::AdjustCurrent(-CURRENT_STEP),
            KeyCode::Space => Command::TogglePause,
            KeyCode::KeyS => Command::TogglePolarity,
            KeyCode::KeyR => Command::Reset,
            _ => return true,
        };
        self.pending.push(command);
        true
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

/// Camera showing the whole conductor at the given viewport aspect ratio
fn frame_conductor(simulation: &SimulationController, aspect_ratio: f32) -> Camera2D {
    let geometry = simulation.geometry();
    let center = Vec2::new(
        (geometry.left() + geometry.width() / 2.0) as f32,
        geometry.vertical_center() as f32,
    );
    let half_extents = Vec2::new(geometry.width() as f32, geometry.height() as f32) / 2.0;
    Camera2D::framing(center, half_extents, VIEW_MARGIN, aspect_ratio)
}

fn main() {
    let (ctx, event_loop) = match pollster::block_on(GraphicsContext::new(
        "Hall Effect Simulation",
        WINDOW_WIDTH,
        WINDOW_HEIGHT,
    )) {
        Ok(pair) => pair,
        Err(err) => {
            log::error!("Failed to start graphics: {err}");
            std::process::exit(1);
        }
    };

    let simulation = match SimulationController::new(SimulationConfig::default()) {
        Ok(simulation) => simulation,
        Err(err) => {
            log::error!("Invalid simulation configuration: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::new(ctx, simulation);
    let mut last_time = std::time::Instant::now();

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    ..
                                },
                            ..
                        } => {
                            if !app.handle_key(*key, *state) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32().min(MAX_FRAME_DT);
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    log::error!("Out of GPU memory");
                                    elwt.exit();
                                }
                                Err(e) => log::error!("Render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    });

    if let Err(err) = result {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
}
