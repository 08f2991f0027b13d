//! Rainscape - historical rainfall as a living field of rain
//!
//! Each column follows one month of the selected year: wetter months fall
//! denser and faster, and an ambient rain loop swells with the month's total.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use rainscape::audio::{AmbientTrack, AudioSource, AudioSystem};
use rainscape::chart::{self, ChartCache};
use rainscape::cli::Args;
use rainscape::data::RainfallSource;
use rainscape::params::*;
use rainscape::rendering::{self, RenderSystem};
use rainscape::scene::{FrameInput, RainScene};
use rainscape::ui::{ControlKey, Controls, UiAction};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    instances: Vec<rendering::QuadInstance>,

    // Simulation
    scene: RainScene,
    controls: Controls,
    source: RainfallSource,
    charts: ChartCache,
    chart_year: Option<i32>,
    audio: Option<AudioSystem>,

    // Configuration
    render_config: RenderConfig,

    // Time tracking
    last_frame: Instant,
}

impl App {
    fn new(
        scene: RainScene,
        controls: Controls,
        source: RainfallSource,
        charts: ChartCache,
        audio: Option<AudioSystem>,
        render_config: RenderConfig,
    ) -> Self {
        Self {
            window: None,
            render_system: None,
            instances: Vec::new(),
            scene,
            controls,
            source,
            charts,
            chart_year: None,
            audio,
            render_config,
            last_frame: Instant::now(),
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let state = self.controls.state();
            let mode = if state.running { "running" } else { "paused" };
            window.set_title(&format!("Rainscape - {} ({mode})", state.selected_year));
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: UiAction) {
        match action {
            UiAction::Quit => event_loop.exit(),
            UiAction::Started | UiAction::Stopped | UiAction::YearChanged(_) => self.update_title(),
            other => self.scene.apply(other),
        }
    }
}

/// Overlay key bindings
fn control_key(code: KeyCode) -> Option<ControlKey> {
    let key = match code {
        KeyCode::Space => ControlKey::Space,
        KeyCode::KeyR => ControlKey::Reload,
        KeyCode::ArrowLeft => ControlKey::Left,
        KeyCode::ArrowRight => ControlKey::Right,
        KeyCode::ArrowUp => ControlKey::Up,
        KeyCode::ArrowDown => ControlKey::Down,
        KeyCode::BracketLeft => ControlKey::BracketLeft,
        KeyCode::BracketRight => ControlKey::BracketRight,
        KeyCode::KeyW => ControlKey::TopWhitenUp,
        KeyCode::KeyS => ControlKey::TopWhitenDown,
        KeyCode::KeyE => ControlKey::BottomWhitenUp,
        KeyCode::KeyD => ControlKey::BottomWhitenDown,
        KeyCode::Escape => ControlKey::Escape,
        _ => return None,
    };
    Some(key)
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Rainscape")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system =
            match pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.render_config)) {
                Ok(render_system) => render_system,
                Err(e) => {
                    log::error!("Failed to initialize renderer: {e}");
                    event_loop.exit();
                    return;
                }
            };

        let (width, height) = render_system.size();
        self.controls.resize(width as f32, height as f32);

        log::info!("Rainscape is running! Space start/stop, arrows year/speed, ESC quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.last_frame = Instant::now();
        self.update_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                self.controls.resize(size.width as f32, size.height as f32);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => {
                if let Some(action) = control_key(code).and_then(|key| self.controls.key(key)) {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                if let Some(action) = self.controls.pointer_moved(pos) {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let action = match state {
                    ElementState::Pressed => self.controls.pointer_pressed(),
                    ElementState::Released => self.controls.pointer_released(),
                };
                if let Some(action) = action {
                    self.handle_action(event_loop, action);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Advance the scene and render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        let now = Instant::now();
        let dt_s = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        self.controls.tick(dt_s as f32);
        let input = FrameInput {
            dt_s,
            interaction: self.controls.state(),
        };
        let frame = self.scene.tick(&input, &self.source);

        if let Some(audio) = &self.audio {
            audio.set_volume(frame.volume);
        }

        // Swap the chart texture when the year changes
        if self.chart_year != Some(frame.year) {
            render_system.set_chart(self.charts.get(frame.year, &self.source));
            self.chart_year = Some(frame.year);
        }
        let padding = self.render_config.padding_px;
        render_system.update_chart_rect(self.controls.layout().chart_panel.inset(padding));

        let (width, height) = render_system.size();
        self.instances.clear();
        rendering::cell_instances(
            &frame,
            rendering::grid_area(width as f32, height as f32, padding),
            &mut self.instances,
        );
        rendering::overlay_instances(&self.controls, &mut self.instances);
        render_system.update_instances(&self.instances);

        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }
    }
}

/// Open the audio device; any failure means running silently
fn start_audio(args: &Args, params: &AudioParams) -> Option<AudioSystem> {
    if args.no_audio {
        log::info!("Audio disabled (--no-audio)");
        return None;
    }

    let source = match &args.ambient {
        Some(path) => match AmbientTrack::load(path) {
            Ok(track) => AudioSource::Track(track),
            Err(e) => {
                log::warn!("{e}; using synthesized rain");
                AudioSource::Synth
            }
        },
        None => AudioSource::Synth,
    };

    match AudioSystem::start(params, source) {
        Ok(audio) => Some(audio),
        Err(e) => {
            log::warn!("Audio unavailable ({e}), running without sound");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let field_params = args.field_params().context("invalid field parameters")?;
    let palette_params = PaletteParams::default();
    let audio_params = AudioParams::default();
    let ui_params = UiParams::default();
    let render_config = RenderConfig::default();
    palette_params.validate()?;
    audio_params.validate()?;
    ui_params.validate()?;
    render_config.validate()?;

    let source = args.rainfall_source();
    log::info!("Rainfall source: {}", source.describe());

    if args.render_charts {
        let written = chart::render_all(&args.charts, &source)
            .with_context(|| format!("rendering charts into {}", args.charts.display()))?;
        log::info!("Wrote {written} charts to {}", args.charts.display());
        return Ok(());
    }

    let mut controls = Controls::new(
        ui_params,
        render_config.window_width as f32,
        render_config.window_height as f32,
    );
    if let Some(year) = args.year {
        controls.select_year(year);
    }
    let mut scene = RainScene::new(field_params, palette_params, audio_params.clone());

    if let Some(time_s) = args.snapshot {
        let frame = scene.tick(
            &FrameInput {
                dt_s: time_s,
                interaction: controls.state(),
            },
            &source,
        );
        print!("{}", frame.to_ansi_string());
        return Ok(());
    }

    let audio = start_audio(&args, &audio_params);
    let charts = ChartCache::new(&args.charts);

    let mut app = App::new(scene, controls, source, charts, audio, render_config);
    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.run_app(&mut app).context("event loop")?;
    Ok(())
}
