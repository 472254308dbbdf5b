use std::time::Duration;

use crate::input::{KeyEvent, PointerEvent};
use crate::time::Flow;

use super::controller::LoopHandle;

pub(crate) type TickFn = Box<dyn FnMut(Duration, Duration) -> Flow>;
pub(crate) type RenderFn<C> = Box<dyn FnMut(&mut C) -> Flow>;
pub(crate) type HookFn = Box<dyn FnMut()>;
pub(crate) type KeyFn = Box<dyn FnMut(&KeyEvent, &LoopHandle)>;
pub(crate) type MouseFn = Box<dyn FnMut(&PointerEvent, &LoopHandle)>;

/// Callbacks and cadence for a [`LoopController`](super::LoopController).
///
/// Every callback is optional; unset ones behave as no-ops that continue.
///
/// ```rust,ignore
/// let config = LoopConfig::new()
///     .interval(Duration::from_millis(100))
///     .on_tick(|t, _dt| if t >= limit { Flow::Stop } else { Flow::Continue })
///     .on_render(|canvas: &mut Canvas| { canvas.clear(Color::WHITE); Flow::Continue })
///     .on_key(|ev, handle| if ev.key == Key::Space { handle.pause(); });
/// ```
pub struct LoopConfig<C> {
    pub(crate) interval: Option<Duration>,
    pub(crate) on_tick: Option<TickFn>,
    pub(crate) on_render: Option<RenderFn<C>>,
    pub(crate) on_start: Option<HookFn>,
    pub(crate) on_pause: Option<HookFn>,
    pub(crate) on_stop: Option<HookFn>,
    pub(crate) on_key: Option<KeyFn>,
    pub(crate) on_mouse: Option<MouseFn>,
}

impl<C> LoopConfig<C> {
    pub fn new() -> Self {
        Self {
            interval: None,
            on_tick: None,
            on_render: None,
            on_start: None,
            on_pause: None,
            on_stop: None,
            on_key: None,
            on_mouse: None,
        }
    }

    /// Minimum accumulated time between two `on_tick` calls.
    ///
    /// Zero means every frame ticks. Intervals of 50 ms or more also switch the
    /// frame cadence from display refresh to a wall-clock timer.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Update phase: `f(elapsed, dt)`. Returning `Flow::Stop` stops the loop
    /// before rendering.
    pub fn on_tick(mut self, f: impl FnMut(Duration, Duration) -> Flow + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    /// Render phase, once per delivered frame.
    pub fn on_render(mut self, f: impl FnMut(&mut C) -> Flow + 'static) -> Self {
        self.on_render = Some(Box::new(f));
        self
    }

    /// Called on every transition into the running state, including resume.
    pub fn on_start(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_pause(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_pause = Some(Box::new(f));
        self
    }

    /// Called exactly once, when the loop stops for good.
    pub fn on_stop(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_stop = Some(Box::new(f));
        self
    }

    /// Keyboard listener, registered for press/down/up while the loop is alive.
    pub fn on_key(mut self, f: impl FnMut(&KeyEvent, &LoopHandle) + 'static) -> Self {
        self.on_key = Some(Box::new(f));
        self
    }

    /// Pointer listener, registered for down/up/move while the loop is alive.
    pub fn on_mouse(mut self, f: impl FnMut(&PointerEvent, &LoopHandle) + 'static) -> Self {
        self.on_mouse = Some(Box::new(f));
        self
    }
}

impl<C> Default for LoopConfig<C> {
    fn default() -> Self {
        Self::new()
    }
}
