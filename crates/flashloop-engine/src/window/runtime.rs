use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use pixels::{Pixels, SurfaceTexture};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::canvas::Canvas;
use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::time::Wake;

use super::translate::InputTracker;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// TrueType/OpenType bytes for canvas text. Without a font, text is not drawn.
    pub font: Option<Vec<u8>>,
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.initial_size = LogicalSize::new(width, height);
        self
    }

    pub fn with_font(mut self, bytes: Vec<u8>) -> Self {
        self.font = Some(bytes);
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "flashloop".to_string(),
            initial_size: LogicalSize::new(800.0, 450.0),
            font: None,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it exits or the window closes.
    ///
    /// Returns the app so callers can read its final state.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<A>
    where
        A: 'static + CoreApp,
    {
        let mut canvas = Canvas::new(1, 1);
        if let Some(bytes) = config.font.as_deref() {
            canvas.load_font(bytes).context("failed to load font")?;
        }

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, canvas, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.failure.take() {
            return Err(err);
        }
        Ok(state.app)
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    pixels: Pixels<'this>,
}

struct HostState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    app: A,
    canvas: Canvas,
    input: InputTracker,

    window: Option<WindowEntry>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> HostState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, canvas: Canvas, app: A) -> Self {
        Self {
            config,
            app,
            canvas,
            input: InputTracker::default(),
            window: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let entry = WindowEntryTryBuilder {
            window,
            pixels_builder: |w| {
                let surface = SurfaceTexture::new(width, height, w);
                Pixels::new(width, height, surface)
            },
        }
        .try_build()
        .context("failed to create pixel surface")?;

        self.canvas.resize(width, height);
        log::debug!("window created ({width}x{height})");

        self.window = Some(entry);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        // Minimized windows report a zero size; keep the last surface.
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        let Some(entry) = self.window.as_mut() else {
            return Ok(());
        };

        entry
            .with_pixels_mut(|pixels| {
                pixels.resize_surface(size.width, size.height)?;
                pixels.resize_buffer(size.width, size.height)
            })
            .context("failed to resize pixel surface")?;
        self.canvas.resize(size.width, size.height);
        entry.with_window(|w| w.request_redraw());
        Ok(())
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let control = {
            let mut ctx = FrameCtx::new(Instant::now(), &mut self.canvas);
            self.app.on_frame(&mut ctx)
        };

        let Some(entry) = self.window.as_mut() else {
            return Ok(control);
        };

        let canvas = &self.canvas;
        entry
            .with_pixels_mut(|pixels| {
                if !canvas.copy_to(pixels.frame_mut()) {
                    log::warn!("canvas and pixel buffer sizes differ; skipping copy");
                }
                pixels.render()
            })
            .context("failed to present frame")?;

        Ok(control)
    }

    /// Turns the app's wake requirement into winit scheduling.
    fn schedule(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.window.as_ref() else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        match self.app.wake() {
            Wake::Idle => event_loop.set_control_flow(ControlFlow::Wait),
            Wake::Refresh => {
                event_loop.set_control_flow(ControlFlow::Wait);
                entry.with_window(|w| w.request_redraw());
            }
            Wake::At(deadline) => {
                if deadline <= Instant::now() {
                    event_loop.set_control_flow(ControlFlow::Wait);
                    entry.with_window(|w| w.request_redraw());
                } else {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
                }
            }
        }
    }
}

impl<A> ApplicationHandler for HostState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            self.fail(event_loop, e.context("failed to create initial window"));
            return;
        }

        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }
        self.schedule(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        for input in self.input.translate(&event) {
            if self.app.on_input(&input) == AppControl::Exit {
                self.exit_requested = true;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.window = None;
                self.exit_requested = true;
            }

            WindowEvent::Resized(size) => {
                if let Err(e) = self.resize(size) {
                    self.fail(event_loop, e);
                    return;
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size()));
                if let Some(size) = size {
                    if let Err(e) = self.resize(size) {
                        self.fail(event_loop, e);
                        return;
                    }
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Exit) => self.exit_requested = true,
                Ok(AppControl::Continue) => {}
                Err(e) => {
                    self.fail(event_loop, e);
                    return;
                }
            },

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
