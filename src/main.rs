//! Seaswell - an animated ocean-wave surface with a live tuning panel
//!
//! Drag to orbit, right-drag to pan, scroll to dolly. Esc quits.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use seaswell::animation::{AnimationDriver, FrameStatus};
use seaswell::cli::Args;
use seaswell::panel::{DebugOverlay, PanelStats};
use seaswell::rendering::RenderSystem;
use seaswell::session::Session;

/// Pixels of smooth-scroll travel per wheel notch
const PIXELS_PER_NOTCH: f32 = 50.0;

#[derive(Clone, Copy)]
enum Drag {
    Rotate,
    Pan,
}

/// Window-bound state, created once the event loop is running
struct Gpu {
    window: Arc<Window>,
    renderer: RenderSystem,
    overlay: DebugOverlay,
}

/// Main application state
struct App {
    session: Session,
    driver: AnimationDriver,
    gpu: Option<Gpu>,
    title: String,
    drag: Option<Drag>,
    cursor: Option<PhysicalPosition<f64>>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(session: Session) -> Self {
        let title = format!("Seaswell - {} waves", session.variant);
        Self {
            session,
            driver: AnimationDriver::new(),
            gpu: None,
            title,
            drag: None,
            cursor: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error = Some(error);
        self.driver.stop();
        event_loop.exit();
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Gpu> {
        let (width, height) = self.session.viewport.size();
        let window_attributes = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        self.session
            .resize_native(size.width, size.height, window.scale_factor());

        let render_config = self.session.render.clone();
        let renderer = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.session,
            &render_config,
        ))
        .context("failed to initialise rendering")?;
        let overlay = DebugOverlay::new(&window, render_config.panel_width);

        log::info!(
            "Window {}x{} (scale {})",
            size.width,
            size.height,
            window.scale_factor()
        );
        Ok(Gpu {
            window,
            renderer,
            overlay,
        })
    }

    fn pointer_moved(&mut self, position: PhysicalPosition<f64>, scale_factor: f64) {
        let previous = self.cursor.replace(position);
        let (Some(drag), Some(previous)) = (self.drag, previous) else {
            return;
        };
        let dx = ((position.x - previous.x) / scale_factor) as f32;
        let dy = ((position.y - previous.y) / scale_factor) as f32;
        let height = self.session.viewport.height() as f32;

        match drag {
            Drag::Rotate => self.session.controls.rotate(dx, dy, height),
            Drag::Pan => self
                .session
                .controls
                .pan(dx, dy, height, &self.session.camera),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        if !self.driver.is_running() {
            return;
        }

        let stats = PanelStats {
            fps: self.driver.fps(),
            frames: self.driver.frames(),
        };
        let (frame, actions) = gpu.overlay.prepare(&gpu.window, &mut self.session, stats);
        if actions.save_preset {
            if let Err(e) = self.session.save_preset() {
                log::error!("{}", e);
            }
        }
        gpu.renderer.stage_overlay(frame);

        match self.driver.tick(&mut self.session, &mut gpu.renderer) {
            Ok(FrameStatus::Continue | FrameStatus::Stopped) => {}
            Err(e) => self.fail(event_loop, anyhow::Error::new(e).context("render failed")),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            if self.driver.is_running() {
                gpu.window.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return; // Already initialized
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => {
                log::info!("Seaswell is running, press Esc to quit");
                self.gpu = Some(gpu);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let consumed = gpu.overlay.handle_window_event(&gpu.window, &event);
        let scale_factor = gpu.window.scale_factor();

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                self.driver.stop();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.driver.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if self
                    .session
                    .resize_native(size.width, size.height, scale_factor)
                {
                    let (width, height) = self.session.viewport.drawing_buffer_size();
                    gpu.renderer.resize(width, height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = gpu.window.inner_size();
                if self
                    .session
                    .resize_native(size.width, size.height, scale_factor)
                {
                    let (width, height) = self.session.viewport.drawing_buffer_size();
                    gpu.renderer.resize(width, height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (state, button) {
                    (ElementState::Pressed, _) if consumed => None,
                    (ElementState::Pressed, MouseButton::Left) => Some(Drag::Rotate),
                    (ElementState::Pressed, MouseButton::Right) => Some(Drag::Pan),
                    (ElementState::Released, _) => None,
                    (ElementState::Pressed, _) => self.drag,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position, scale_factor);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_NOTCH,
                };
                self.session.controls.dolly(notches);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.scene_config().context("failed to load preset")?;
    let session = Session::new(&config).context("failed to set up scene")?;

    let mut app = App::new(session);
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
