//! Virtual pet -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. One
//! simulation tick runs per `RedrawRequested`, paced by `FrameClock`:
//!
//!   1. `about_to_wait()` -- request a redraw once the next tick is due,
//!      otherwise sleep with `ControlFlow::WaitUntil`
//!   2. `FrameDriver::tick()` -- latch input, apply quit/step/selection,
//!      update behavior and scrolling, composite and present
//!   3. Overlay buttons are turned into actions for the following tick
//!
//! `--headless <ticks>` runs the same driver against an in-memory framebuffer
//! instead of a window.

mod config;
mod driver;
mod manifest;
mod placeholder;
mod replay;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::{load_config_or_default, PetConfig, DEFAULT_CONFIG_PATH};
use driver::{build_sim, FrameDriver, TickOutcome};
use manifest::ManifestAssets;
use placeholder::PlaceholderAssets;
use replay::{load_replay_from_path, ReplayInput};
use vpet_core::{Action, AssetProvider, FrameClock, InputState, Key, PetSim};
use vpet_devtools::{DebugOverlay, OverlayStats};
use vpet_platform::PlatformError;
use vpet_render::{FrameBuffer, WindowDisplay};

#[derive(Parser, Debug)]
#[command(name = "vpet_game")]
#[command(version)]
#[command(about = "A virtual pet walking over a parallax landscape", long_about = None)]
struct Cli {
    /// Pet config JSON (defaults are used if the file does not exist)
    #[arg(short, long, value_name = "PATH", env = "VPET_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Asset manifest, overriding the one named in the config
    #[arg(short, long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Run this many ticks without opening a window
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Scripted input for a headless run
    #[arg(long, value_name = "PATH", requires = "headless")]
    replay: Option<PathBuf>,

    /// Pace headless ticks with the wall clock instead of simulated time
    #[arg(long, requires = "headless")]
    realtime: bool,
}

type WindowDriver = FrameDriver<WindowDisplay<DebugOverlay>, InputState>;

/// Everything that exists only while the window does. Constructed lazily in
/// `ApplicationHandler::resumed`.
struct PetState {
    window: Arc<Window>,
    clock: FrameClock,
    driver: WindowDriver,
}

impl PetState {
    fn new(window: Arc<Window>, config: &PetConfig, sim: PetSim) -> Result<Self, String> {
        let overlay_window = window.clone();
        let mut display = WindowDisplay::init(window.clone(), config.width, config.height, |gpu| {
            DebugOverlay::new(gpu, overlay_window)
        })
        .map_err(|e| e.to_string())?;
        display.overlay_mut().visible = config.show_overlay;

        Ok(Self {
            window,
            clock: FrameClock::new(config.tick_interval()),
            driver: FrameDriver::new(sim, display, InputState::new(), config.clear_color),
        })
    }

    /// Feed overlay clicks and F3 into this tick, then run it.
    fn tick(&mut self) -> Result<TickOutcome, String> {
        let overlay = self.driver.display_mut().overlay_mut();
        let actions = overlay.take_actions();
        if self.driver.input_mut().is_just_pressed(Key::F3) {
            self.driver.display_mut().overlay_mut().toggle();
        }
        if actions.step {
            self.driver.input_mut().trigger(Action::Step);
        }
        if actions.next_character {
            let next = self.driver.sim().behavior().character().next();
            self.driver
                .input_mut()
                .trigger(Action::SelectCharacter(next));
        }

        let now_ms = self.clock.begin_frame();
        let stats = OverlayStats::new(&self.clock, self.driver.sim().snapshot());
        self.driver.display_mut().overlay_mut().set_stats(stats);

        self.driver.tick(now_ms).map_err(|e| e.to_string())
    }
}

struct App {
    config: PetConfig,
    sim: Option<PetSim>,
    state: Option<PetState>,
    fatal: Option<String>,
}

impl App {
    fn new(config: PetConfig, sim: PetSim) -> Self {
        Self {
            config,
            sim: Some(sim),
            state: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        log::error!("{message}");
        if let Some(state) = self.state.as_mut() {
            state.driver.shutdown();
        }
        self.fatal = Some(message);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(sim) = self.sim.take() else {
            return;
        };

        let window =
            match vpet_platform::create_window(event_loop, &self.config.platform_config()) {
                Ok(window) => window,
                Err(e) => return self.fail(event_loop, e.to_string()),
            };
        match PetState::new(window, &self.config, sim) {
            Ok(state) => {
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, format!("Display init failed: {e}")),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.clock.is_due(Instant::now()) {
                state.window.request_redraw();
            }
            event_loop.set_control_flow(ControlFlow::WaitUntil(state.clock.next_deadline()));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .driver
            .display_mut()
            .overlay_mut()
            .handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, quitting on the next tick.");
                state.driver.request_quit();
                state.window.request_redraw();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.driver.display_mut().resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(pet_key) = map_key(key_code) {
                        let input = state.driver.input_mut();
                        match event.state {
                            ElementState::Pressed => input.key_down(pet_key),
                            ElementState::Released => input.key_up(pet_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                // Expose/resize redraws between deadlines do not tick.
                if !state.clock.is_due(Instant::now()) && !state.driver.quit_pending() {
                    return;
                }
                match state.tick() {
                    Ok(TickOutcome::Continue) => {}
                    Ok(TickOutcome::Quit) => {
                        log::info!("Exiting after {} ticks.", state.driver.ticks());
                        state.driver.shutdown();
                        event_loop.exit();
                    }
                    Err(e) => self.fail(event_loop, format!("Frame failed: {e}")),
                }
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Digit1 | KeyCode::Numpad1 => Some(Key::Digit1),
        KeyCode::Digit2 | KeyCode::Numpad2 => Some(Key::Digit2),
        KeyCode::Digit3 | KeyCode::Numpad3 => Some(Key::Digit3),
        KeyCode::Digit4 | KeyCode::Numpad4 => Some(Key::Digit4),
        KeyCode::Digit5 | KeyCode::Numpad5 => Some(Key::Digit5),
        KeyCode::Digit6 | KeyCode::Numpad6 => Some(Key::Digit6),
        KeyCode::Digit7 | KeyCode::Numpad7 => Some(Key::Digit7),
        KeyCode::Digit8 | KeyCode::Numpad8 => Some(Key::Digit8),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

/// The manifest's art if it exists, placeholder art otherwise.
fn load_assets(config: &PetConfig) -> Result<Box<dyn AssetProvider>, String> {
    if config.manifest.exists() {
        return Ok(Box::new(ManifestAssets::load(&config.manifest)?));
    }
    log::warn!(
        "Asset manifest {} not found. Falling back to placeholder art.",
        config.manifest.display()
    );
    Ok(Box::new(PlaceholderAssets::new(config.width, config.height)))
}

fn run_headless(
    config: &PetConfig,
    ticks: u64,
    replay: Option<&Path>,
    realtime: bool,
) -> Result<(), String> {
    let assets = load_assets(config)?;
    let sim = build_sim(assets.as_ref(), config.sim_config(), 0)?;
    let input = match replay {
        Some(path) => ReplayInput::new(&load_replay_from_path(path)?),
        None => ReplayInput::idle(),
    };
    let display = FrameBuffer::new(config.width, config.height);

    let mut driver = FrameDriver::new(sim, display, input, config.clear_color);
    let summary = driver
        .run_headless(ticks, config.tick_interval(), realtime)
        .map_err(|e| format!("Headless run failed: {e}"))?;
    if !summary.quit_requested {
        log::info!("Tick budget of {} exhausted before a quit was requested", ticks);
    }
    Ok(())
}

fn run_windowed(config: PetConfig) -> Result<(), String> {
    let assets = load_assets(&config)?;
    let sim = build_sim(assets.as_ref(), config.sim_config(), 0)?;

    let event_loop = EventLoop::new().map_err(|e| PlatformError::from(e).to_string())?;
    let mut app = App::new(config, sim);
    event_loop
        .run_app(&mut app)
        .map_err(|e| PlatformError::from(e).to_string())?;

    match app.fatal {
        Some(message) => Err(message),
        None => Ok(()),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = load_config_or_default(&cli.config)?;
    if let Some(manifest) = cli.manifest {
        config.manifest = manifest;
    }

    match cli.headless {
        Some(ticks) => run_headless(&config, ticks, cli.replay.as_deref(), cli.realtime),
        None => run_windowed(config),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Virtual pet starting...");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {
            log::info!("Virtual pet exited cleanly.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
