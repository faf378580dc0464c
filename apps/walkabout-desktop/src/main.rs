use anyhow::Result;
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec3;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkabout_assets::{AssetId, MapImage, TextureStore};
use walkabout_camera::{Camera, CameraLoop, CameraMode};
use walkabout_common::{AppConfig, ConfigError};
use walkabout_console::{Command, Console};
use walkabout_input::{HostAction, InputState, action_for_key};
use walkabout_render_wgpu::SceneRenderer;
use walkabout_scene::{MeshData, Scene, build_cubicmap};
use walkabout_tools::{CameraReport, FrameStats};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowId};

/// Where the cubicmap model sits in the world, clear of the arena walls.
const MAP_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -24.0);
/// Longest frame delta fed to the camera loop; hitches beyond this are
/// dropped rather than replayed as a burst of movement.
const MAX_FRAME_DELTA: f32 = 0.1;
/// Scrollback lines visible in the console overlay.
const CONSOLE_VISIBLE_LINES: usize = 10;

#[derive(Parser)]
#[command(name = "walkabout-desktop", about = "First-person camera walkthrough demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(long, default_value = "walkabout.yaml")]
    config: PathBuf,

    /// Override the map image path from the config
    #[arg(long)]
    map: Option<PathBuf>,
}

/// Host-level mode. Pause, console, and fullscreen are layered here, outside
/// the camera-loop core; the loop only ever runs in `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppMode {
    Running,
    Paused,
    Console,
}

/// Application state independent of the GPU surface.
struct AppState {
    config: AppConfig,
    camera: Camera,
    camera_mode: CameraMode,
    cam_loop: CameraLoop,
    scene: Scene,
    map_mesh: MeshData,
    textures: TextureStore,
    map_id: AssetId,
    input: InputState,
    console: Console,
    frame_stats: FrameStats,
    mode: AppMode,
    fullscreen: bool,
    quit_requested: bool,
    /// Mode switch requested from inside the egui pass, applied after it.
    pending_mode: Option<AppMode>,
    last_frame: Instant,
}

impl AppState {
    fn new(config: AppConfig, map_override: Option<PathBuf>) -> Self {
        let map_path = map_override.unwrap_or_else(|| config.map_path.clone());
        let mut map_image = match MapImage::load(&map_path) {
            Ok(image) => image,
            Err(error) => {
                tracing::warn!(path = %map_path.display(), %error, "using builtin map");
                MapImage::builtin()
            }
        };
        map_image.flip_vertical();

        let mut textures = TextureStore::new();
        let map_id = textures.register("map", map_image);
        let map_mesh = build_cubicmap(
            textures.get(map_id).expect("map texture just registered"),
            Vec3::ONE,
        );

        let camera = Camera {
            fovy: config.fovy,
            ..Camera::default()
        };
        let scene = Scene::generate(config.seed, config.columns);
        let fullscreen = config.fullscreen;

        Self {
            config,
            camera,
            camera_mode: CameraMode::FirstPerson,
            cam_loop: CameraLoop::new(),
            scene,
            map_mesh,
            textures,
            map_id,
            input: InputState::new(),
            console: Console::new(),
            frame_stats: FrameStats::default(),
            mode: AppMode::Running,
            fullscreen,
            quit_requested: false,
            pending_mode: None,
            last_frame: Instant::now(),
        }
    }

    fn update(&mut self, dt: f32) {
        if self.mode == AppMode::Running {
            let snapshot = self.input.take_snapshot();
            self.cam_loop.tick(&mut self.camera, f64::from(dt), &snapshot);
        } else {
            // Paused and console frames drop their deltas so stale motion
            // doesn't land on resume.
            self.input.discard_deltas();
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Help => self.console.println(Command::HELP_TEXT),
            Command::Clear => self.console.clear_log(),
            Command::Fov(degrees) => {
                self.camera.fovy = degrees.clamp(1.0, 179.0);
                self.console.println(format!("fovy = {}", self.camera.fovy));
            }
            Command::Teleport(position) => {
                // Keep the view direction, move the eye.
                let delta = position - self.camera.position;
                self.camera.position = position;
                self.camera.target += delta;
                self.console.println(format!(
                    "teleported to ({:.2}, {:.2}, {:.2})",
                    position.x, position.y, position.z
                ));
            }
            Command::Mode(mode) => {
                self.camera_mode = mode;
                self.console.println(format!("mode = {}", mode.label()));
            }
            Command::Projection(projection) => {
                self.camera.projection = projection;
                self.console
                    .println(format!("projection = {}", projection.label()));
            }
            Command::Seed(seed) => {
                self.scene = Scene::generate(seed, self.config.columns);
                self.console.println(format!("scene regenerated, seed = {seed}"));
            }
            Command::Quit => self.quit_requested = true,
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let hud_frame = egui::Frame::new()
            .fill(egui::Color32::from_rgba_unmultiplied(102, 191, 255, 128))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 121, 241)))
            .inner_margin(egui::Margin::same(8));

        egui::Window::new("controls")
            .title_bar(false)
            .resizable(false)
            .frame(hud_frame)
            .anchor(egui::Align2::LEFT_TOP, [5.0, 5.0])
            .show(ctx, |ui| {
                ui.label("Camera controls:");
                ui.label("- Move keys: W, A, S, D or arrows");
                ui.label("- Look around: mouse");
                ui.label("- Camera mode keys: 1, 2, 3, 4");
                ui.label("- Zoom: mouse scroll");
                ui.label("- Camera projection key: P");
                ui.label("- Pause: Esc, console: `, fullscreen: F11");
                ui.label(
                    egui::RichText::new(format!("{:.0} FPS", self.frame_stats.fps()))
                        .size(24.0)
                        .strong(),
                );
            });

        let report = CameraReport::capture(&self.camera, self.camera_mode);
        egui::Window::new("status")
            .title_bar(false)
            .resizable(false)
            .frame(hud_frame)
            .anchor(egui::Align2::RIGHT_TOP, [-5.0, 5.0])
            .show(ctx, |ui| {
                ui.label("Camera status:");
                for line in report.lines() {
                    ui.label(line);
                }
            });

        if self.mode == AppMode::Paused {
            egui::Window::new("paused")
                .title_bar(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.heading("Paused");
                    ui.separator();
                    if ui.button("Resume").clicked() {
                        self.pending_mode = Some(AppMode::Running);
                    }
                    if ui.button("Quit").clicked() {
                        self.quit_requested = true;
                    }
                });
        }

        if self.mode == AppMode::Console {
            egui::TopBottomPanel::bottom("console").show(ctx, |ui| {
                let start = self.console.log().len().saturating_sub(CONSOLE_VISIBLE_LINES);
                for line in &self.console.log()[start..] {
                    ui.label(egui::RichText::new(line).monospace());
                }
                ui.label(
                    egui::RichText::new(format!("> {}_", self.console.input())).monospace(),
                );
            });
        }
    }
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn enter_mode(&mut self, mode: AppMode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        if mode != AppMode::Running {
            self.state.input.clear_held();
        }
        if let Some(window) = &self.window {
            set_cursor_captured(window, mode == AppMode::Running);
        }
        tracing::info!(?mode, "app mode changed");
    }

    fn handle_action(&mut self, action: HostAction) {
        match action {
            HostAction::TogglePause => match self.state.mode {
                AppMode::Running => self.enter_mode(AppMode::Paused),
                // Esc also closes the console.
                AppMode::Paused | AppMode::Console => self.enter_mode(AppMode::Running),
            },
            HostAction::ToggleConsole => match self.state.mode {
                AppMode::Console => self.enter_mode(AppMode::Running),
                _ => self.enter_mode(AppMode::Console),
            },
            HostAction::ToggleFullscreen => {
                self.state.fullscreen = !self.state.fullscreen;
                if let Some(window) = &self.window {
                    apply_fullscreen(window, self.state.fullscreen);
                }
            }
            HostAction::SetMode(mode) => {
                self.state.camera_mode = mode;
                tracing::info!(mode = mode.label(), "camera mode");
            }
            HostAction::ToggleProjection => {
                self.state.camera.projection = self.state.camera.projection.toggled();
            }
            HostAction::Quit => self.state.quit_requested = true,
        }
    }

    /// Key handling while the console is open: line editing first, with the
    /// toggle keys still working to leave.
    fn handle_console_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        match key {
            KeyCode::Escape | KeyCode::Backquote => self.enter_mode(AppMode::Running),
            KeyCode::Enter | KeyCode::NumpadEnter => {
                if let Some(Ok(command)) = self.state.console.submit() {
                    self.state.apply_command(command);
                }
            }
            KeyCode::Backspace => self.state.console.backspace(),
            KeyCode::ArrowUp => self.state.console.history_prev(),
            KeyCode::ArrowDown => self.state.console.history_next(),
            _ => {
                if let Some(text) = &event.text {
                    for ch in text.chars() {
                        self.state.console.insert_char(ch);
                    }
                }
            }
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.state.config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.state.config.window_width,
                self.state.config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));
        apply_fullscreen(&window, self.state.fullscreen);
        set_cursor_captured(&window, self.state.mode == AppMode::Running);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("walkabout_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let map_image = self
            .state
            .textures
            .get(self.state.map_id)
            .expect("map texture registered at startup");
        let renderer = SceneRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.state.scene,
            &self.state.map_mesh,
            map_image,
            MAP_OFFSET,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        self.state.last_frame = Instant::now();
        self.state.cam_loop.reset();

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear_held();
                if self.state.mode == AppMode::Running {
                    self.enter_mode(AppMode::Paused);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if self.state.mode == AppMode::Console {
                    if event.state == ElementState::Pressed {
                        self.handle_console_key(&event);
                    }
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    self.state.input.key_event(key, pressed);
                    if pressed && !event.repeat {
                        if let Some(action) = action_for_key(key, self.state.input.ctrl_held()) {
                            self.handle_action(action);
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.state.input.accumulate_wheel(lines);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let frame_time = now - self.state.last_frame;
                self.state.last_frame = now;
                self.state.frame_stats.record(frame_time);

                let dt = frame_time.as_secs_f32().min(MAX_FRAME_DELTA);
                self.state.update(dt);

                if self.state.quit_requested {
                    event_loop.exit();
                    return;
                }

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
                        return;
                    }
                    Err(e) => {
                        tracing::error!("surface error: {e}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let config = self.config.as_ref().unwrap();
                let aspect = config.width as f32 / config.height.max(1) as f32;
                let player_marker = (self.state.camera_mode == CameraMode::ThirdPerson)
                    .then_some(self.state.camera.target);

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.camera,
                        aspect,
                        &self.state.scene,
                        player_marker,
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut encoder,
                        &paint_jobs,
                        &screen_descriptor,
                    );
                    {
                        let mut pass = encoder
                            .begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("egui_pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                    view: &view,
                                    resolve_target: None,
                                    ops: wgpu::Operations {
                                        load: wgpu::LoadOp::Load,
                                        store: wgpu::StoreOp::Store,
                                    },
                                })],
                                depth_stencil_attachment: None,
                                ..Default::default()
                            })
                            .forget_lifetime();
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();

                if let Some(mode) = self.state.pending_mode.take() {
                    self.enter_mode(mode);
                }
                if self.state.quit_requested {
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.input.accumulate_mouse(delta);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn set_cursor_captured(window: &Window, captured: bool) {
    if captured {
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
        }
        window.set_cursor_visible(false);
    } else {
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);
    }
}

fn apply_fullscreen(window: &Window, fullscreen: bool) {
    if fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %cli.config.display(), "no config file, using defaults");
            AppConfig::default()
        }
        Err(error) => return Err(error.into()),
    };

    tracing::info!("walkabout-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config, cli.map));
    event_loop.run_app(&mut app)?;

    Ok(())
}
