use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use glam::Vec2;

use surfmorph3d::config::ViewerConfig;
use surfmorph3d::playback::{Playback, scaled_duration};
use surfmorph3d::renderer::{GpuState, GpuSurfaceMesh, OrbitCamera};
use surfmorph3d::surface::{
    CoordinateTransform, KeyframeSampler, SampleRequest, SampleResult, ScaleTransform,
    SurfaceMeshController,
};
use surfmorph3d::ui::{PanelStats, UiActions, UiState, apply_theme, draw_help_overlay, draw_side_panel};

type Controller = SurfaceMeshController<ScaleTransform, GpuSurfaceMesh>;

#[derive(Default)]
struct InputState {
    dragging: bool,
    drag_delta: Vec2,
}

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,
    camera: OrbitCamera,
    controller: Option<Controller>,
    sampler: KeyframeSampler,
    playback: Playback,
    ui_state: UiState,
    input: InputState,
    labels: Vec<String>,
    pending: usize,
    last_error: Option<String>,
    frame_count: u32,
    fps_timer: Instant,
    fps: f32,
    last_vsync_state: bool,
    last_frame_time: Instant,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        let sampler = KeyframeSampler::new();
        for keyframe in &config.keyframes {
            sampler.request(keyframe.to_request());
        }

        Self {
            ui_state: UiState::from_config(&config),
            last_vsync_state: config.window.vsync,
            pending: config.keyframes.len(),
            config,
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),
            camera: OrbitCamera::default(),
            controller: None,
            sampler,
            playback: Playback::new(),
            input: InputState::default(),
            labels: Vec::new(),
            last_error: None,
            frame_count: 0,
            fps_timer: Instant::now(),
            fps: 0.0,
            last_frame_time: Instant::now(),
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> surfmorph3d::SurfaceResult<()> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), self.config.window.vsync))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);
        apply_theme(&self.egui_ctx);

        let mesh = GpuSurfaceMesh::new(gpu.device.clone(), gpu.queue.clone(), &gpu.material_layout);
        let mut controller = SurfaceMeshController::new(ScaleTransform::default(), mesh)
            .with_boundary_normals(self.config.surface.boundary_normals);
        controller.set_color(self.config.surface.color);

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);
        self.camera.frame(self.config.surface.half_extent, (0.0, 0.0));

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        self.controller = Some(controller);
        Ok(())
    }

    fn seconds_per_state(&self) -> f32 {
        self.ui_state.transition_secs
    }

    fn update(&mut self) {
        self.frame_count += 1;
        if self.fps_timer.elapsed().as_secs_f32() >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer.elapsed().as_secs_f32();
            self.frame_count = 0;
            self.fps_timer = Instant::now();
        }

        if self.input.dragging {
            self.camera.process_drag(self.input.drag_delta);
        }
        self.input.drag_delta = Vec2::ZERO;

        self.receive_keyframes();

        let Some(controller) = &mut self.controller else {
            return;
        };
        if let Some(progress) = self.playback.tick() {
            controller.set_progress(progress);
        }
    }

    fn receive_keyframes(&mut self) {
        let Some(controller) = &mut self.controller else {
            return;
        };

        let mut appended = false;
        while let Some(result) = self.sampler.try_recv_result() {
            self.pending = self.pending.saturating_sub(1);
            match result {
                SampleResult::Keyframe { label, grid } => {
                    if controller.store().is_empty() {
                        let (min, max) = (grid.get(0, 0), grid.get(grid.width() - 1, grid.depth() - 1));
                        controller.set_transform(ScaleTransform::fit(
                            (min.x, max.x),
                            (min.z, max.z),
                            self.config.surface.half_extent,
                            self.config.surface.height_scale,
                        ));
                    }
                    let index = controller.add_state(grid);
                    log::info!("keyframe {} '{}' appended", index + 1, label);
                    self.labels.push(label);
                    self.last_error = None;
                    appended = true;
                }
                SampleResult::Error(e) => {
                    self.last_error = Some(e);
                }
            }
        }

        if appended && self.ui_state.autoplay {
            let distance = controller.store().len() as f32 - controller.progress();
            let duration = scaled_duration(distance, self.ui_state.transition_secs);
            self.playback.start(controller.advance_to_next_state(duration));
        }
    }

    fn surface_y_range(&self) -> (f32, f32) {
        let Some(controller) = &self.controller else {
            return (0.0, 0.0);
        };
        controller
            .store()
            .iter()
            .map(|grid| grid.y_range())
            .fold(None, |acc: Option<(f32, f32)>, (lo, hi)| {
                let lo = controller.transform().apply(glam::Vec3::new(0.0, lo, 0.0)).y;
                let hi = controller.transform().apply(glam::Vec3::new(0.0, hi, 0.0)).y;
                Some(match acc {
                    Some((a, b)) => (a.min(lo), b.max(hi)),
                    None => (lo, hi),
                })
            })
            .unwrap_or((0.0, 0.0))
    }

    fn next_state(&mut self) {
        let secs = self.seconds_per_state();
        let Some(controller) = &self.controller else {
            return;
        };
        let target = controller.store().len() as f32;
        let duration = scaled_duration(target - controller.progress(), secs);
        self.playback.start(controller.advance_to_next_state(duration));
    }

    fn jump_to(&mut self, index: usize) {
        let secs = self.seconds_per_state();
        let Some(controller) = &self.controller else {
            return;
        };
        let distance = (index + 1) as f32 - controller.progress();
        if let Some(transition) = controller.jump_to_state(index, scaled_duration(distance, secs)) {
            self.playback.start(transition);
        }
    }

    fn replay(&mut self) {
        if let Some(controller) = &mut self.controller {
            self.playback.stop();
            controller.set_progress(0.0);
        }
        self.next_state();
    }

    fn render(&mut self) {
        if self.ui_state.fps_cap_enabled {
            let frame_duration = Duration::from_secs_f64(1.0 / self.ui_state.fps_cap.max(1) as f64);
            let elapsed = self.last_frame_time.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
        self.last_frame_time = Instant::now();

        let (Some(window), Some(egui_state), Some(controller)) =
            (&self.window, &mut self.egui_state, &self.controller)
        else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);
        let last_error = self.last_error.clone().or_else(|| self.sampler.last_error());
        let stats = PanelStats {
            fps: self.fps,
            progress: controller.progress(),
            phase: controller.phase(),
            keyframes: &self.labels,
            pending: self.pending,
            vertex_count: controller.backend().vertex_count(),
            triangle_count: controller.backend().triangle_count(),
            topology_generation: controller.topology().generation(),
            playing: self.playback.is_playing(),
        };
        let distance = self.camera.distance;

        let mut ui_actions = UiActions::default();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui_actions = draw_side_panel(ctx, &mut self.ui_state, &stats, &last_error);
            draw_help_overlay(ctx, distance);
        });

        self.handle_ui_actions(ui_actions);

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };
        let Some(controller) = &self.controller else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        if self.ui_state.vsync_enabled != self.last_vsync_state {
            gpu.set_vsync(self.ui_state.vsync_enabled);
            self.last_vsync_state = self.ui_state.vsync_enabled;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, skipping frame");
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_camera(&self.camera);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_scene(&view, &mut encoder, controller.backend(), self.ui_state.show_grid);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
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

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }

    fn request_keyframe(&mut self, request: SampleRequest) {
        log::info!("sampling keyframe '{}'", request.label);
        self.pending += 1;
        self.sampler.request(request);
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if let Some(request) = actions.add_keyframe {
            self.request_keyframe(request);
        }
        if actions.stop_playback {
            self.playback.stop();
        }
        if let Some(progress) = actions.scrub_to {
            self.playback.stop();
            if let Some(controller) = &mut self.controller {
                controller.set_progress(progress);
            }
        }
        if actions.next_state {
            self.next_state();
        }
        if let Some(index) = actions.jump_to {
            self.jump_to(index);
        }
        if actions.replay {
            self.replay();
        }
        if let Some(controller) = &mut self.controller {
            if actions.color_changed {
                controller.set_color(self.ui_state.color);
            }
            if actions.boundary_changed {
                controller.set_boundary_normals(self.ui_state.boundary_normals);
            }
        }
        if actions.frame_camera {
            self.frame_camera();
        }
    }

    fn frame_camera(&mut self) {
        let y_range = self.surface_y_range();
        self.camera.frame(self.config.surface.half_extent, y_range);
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyN => self.next_state(),
            KeyCode::KeyR => self.replay(),
            KeyCode::KeyF => self.frame_camera(),
            KeyCode::Space => self.playback.stop(),
            KeyCode::Digit1 => self.jump_to(0),
            KeyCode::Digit2 => self.jump_to(1),
            KeyCode::Digit3 => self.jump_to(2),
            KeyCode::Digit4 => self.jump_to(3),
            KeyCode::Digit5 => self.jump_to(4),
            KeyCode::Digit6 => self.jump_to(5),
            KeyCode::Digit7 => self.jump_to(6),
            KeyCode::Digit8 => self.jump_to(7),
            KeyCode::Digit9 => self.jump_to(8),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.init_gpu(window) {
            log::error!("failed to initialise renderer: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.sampler.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.camera.set_aspect(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        self.handle_key(key);
                    }
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.input.dragging = state == ElementState::Pressed;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                self.render();
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.input.dragging {
                self.input.drag_delta.x += delta.0 as f32;
                self.input.drag_delta.y += delta.1 as f32;
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<(), winit::error::EventLoopError> {
    env_logger::init();

    let config = ViewerConfig::from_env_or_args();
    log::info!(
        "starting with {} keyframe(s), boundary normals {:?}",
        config.keyframes.len(),
        config.surface.boundary_normals
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)
}
