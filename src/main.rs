//! Emberglow - animated ember-toned backgrounds
//!
//! Shows one of three full-window backgrounds: a glowing topographic
//! surface, a cluster of orbiting chrome spheres, or soft painted waves.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;
use emberglow::background::{BackgroundConfig, MountedBackground};
use emberglow::error::Error;
use emberglow::frame::{FixedStepClock, FrameClock};
use emberglow::params::RecordingConfig;
use emberglow::rendering::RenderSystem;

/// Main application state
struct App {
    config: BackgroundConfig,

    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    background: Option<MountedBackground<FrameClock>>,

    // First fatal error, reported once the event loop returns
    error: Option<Error>,
}

impl App {
    fn new(config: BackgroundConfig) -> Self {
        Self {
            config,
            window: None,
            render_system: None,
            background: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Error> {
        let window_attributes = Window::default_attributes()
            .with_title("Emberglow")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.render.window_width,
                self.config.render.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let render_system = pollster::block_on(RenderSystem::new_windowed(Arc::clone(&window)))?;
        let background = MountedBackground::mount(&self.config, &render_system, FrameClock::new())?;

        log::info!("Emberglow is running, press ESC to quit");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.background = Some(background);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(background) = self.background.take() {
            background.unmount();
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self.shutdown(event_loop);
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_system), Some(background)) =
            (self.render_system.as_mut(), self.background.as_mut())
        else {
            return;
        };

        if let Err(e) = background.render_frame(render_system) {
            self.fail(event_loop, e.into());
        }
    }
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
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                    if let Some(background) = self.background.as_mut() {
                        let (width, height) = render_system.size();
                        background.resize(render_system, width, height);
                    }
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Render a fixed-clock sequence offscreen and save every frame as PNG
fn record(config: &BackgroundConfig, recording: &RecordingConfig) -> Result<(), Error> {
    let (width, height) = (config.render.window_width, config.render.window_height);
    let mut render_system = pollster::block_on(RenderSystem::new_headless(width, height))?;
    let clock = FixedStepClock::new(recording.frame_dt());
    let mut background = MountedBackground::mount(config, &render_system, clock)?;

    let total = recording.total_frames();
    log::info!(
        "Recording {total} frames ({}s at {} fps) to {}",
        recording.duration_secs,
        recording.fps,
        recording.frames_dir()
    );

    for frame in 0..total as u64 {
        if background.render_frame(&mut render_system)? {
            render_system.capture_frame(&recording.frame_path(frame));
        }
        if frame % recording.fps.max(1) as u64 == 0 {
            log::info!("Frame {frame}/{total}");
        }
    }

    background.unmount();
    log::info!("Recording complete");
    Ok(())
}

fn run(args: &Args) -> Result<(), Error> {
    let config = args.background_config()?;

    if let Some(recording) = args.recording_config()? {
        return record(&config, &recording);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
