use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::input::{EventKind, EventTarget, InputEvent, Listener, ListenerId};
use crate::time::{Flow, FrameClock, Wake};

use super::config::{HookFn, LoopConfig, RenderFn, TickFn};

/// Externally observable loop state.
///
/// A stopped controller reports `Init`: "never started" and "stopped" are
/// both "not running". Callers that need the difference track it themselves.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Init,
    Run,
    Pause,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Init,
    Run,
    Pause,
    Stop,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Control {
    Start,
    Pause,
    Stop,
}

type ControlQueue = Rc<RefCell<VecDeque<Control>>>;

/// Deferred control surface for code running inside the loop's own callbacks.
///
/// Requests are queued and applied by the controller at its next
/// [`pump`](LoopController::pump): right after the tick phase, after the
/// render phase, and whenever the host pumps after dispatching input.
/// Every method returns `false` once the controller has stopped or been dropped.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    queue: Weak<RefCell<VecDeque<Control>>>,
}

impl LoopHandle {
    pub fn start(&self) -> bool {
        self.push(Control::Start)
    }

    pub fn pause(&self) -> bool {
        self.push(Control::Pause)
    }

    pub fn stop(&self) -> bool {
        self.push(Control::Stop)
    }

    pub fn is_alive(&self) -> bool {
        self.queue.strong_count() > 0
    }

    fn push(&self, control: Control) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(control);
                true
            }
            None => false,
        }
    }
}

struct Hooks<C> {
    on_tick: Option<TickFn>,
    on_render: Option<RenderFn<C>>,
    on_start: Option<HookFn>,
    on_pause: Option<HookFn>,
    on_stop: Option<HookFn>,
}

impl<C> Hooks<C> {
    fn empty() -> Self {
        Self {
            on_tick: None,
            on_render: None,
            on_start: None,
            on_pause: None,
            on_stop: None,
        }
    }
}

fn call(hook: &mut Option<HookFn>) {
    if let Some(f) = hook.as_mut() {
        f();
    }
}

/// Lifecycle-managed frame loop.
///
/// Owns one [`FrameClock`] and splits each delivered frame into a throttled
/// update phase (`on_tick`) and an unthrottled render phase (`on_render`).
///
/// Lifecycle: `init → run ⇄ pause → stop`. `stop` is terminal: the clock is
/// dropped, listeners are removed from the target, callbacks are released,
/// and every later operation returns `false`.
///
/// `C` is the render context handed to `on_render`; the controller never
/// touches it otherwise.
pub struct LoopController<C> {
    phase: Phase,
    clock: Option<FrameClock>,

    interval: Duration,
    elapsed: Duration,
    next_tick: Option<Duration>,

    target: Rc<dyn EventTarget>,
    key_listener: Option<Listener>,
    mouse_listener: Option<Listener>,
    attached: Vec<ListenerId>,
    listeners_attached: bool,

    hooks: Hooks<C>,
    controls: ControlQueue,
}

impl<C> LoopController<C> {
    pub fn new(target: Rc<dyn EventTarget>, config: LoopConfig<C>) -> Self {
        let controls = ControlQueue::default();
        let handle = LoopHandle {
            queue: Rc::downgrade(&controls),
        };

        let key_listener = config.on_key.map(|mut f| {
            let handle = handle.clone();
            let listener: Listener = Rc::new(RefCell::new(move |ev: &InputEvent| {
                if let InputEvent::Key(key) = ev {
                    f(key, &handle);
                }
            }));
            listener
        });

        let mouse_listener = config.on_mouse.map(|mut f| {
            let handle = handle.clone();
            let listener: Listener = Rc::new(RefCell::new(move |ev: &InputEvent| {
                if let InputEvent::Pointer(pointer) = ev {
                    f(pointer, &handle);
                }
            }));
            listener
        });

        Self {
            phase: Phase::Init,
            clock: Some(FrameClock::new(config.interval)),
            interval: config.interval.unwrap_or(Duration::ZERO),
            elapsed: Duration::ZERO,
            next_tick: None,
            target,
            key_listener,
            mouse_listener,
            attached: Vec::new(),
            listeners_attached: false,
            hooks: Hooks {
                on_tick: config.on_tick,
                on_render: config.on_render,
                on_start: config.on_start,
                on_pause: config.on_pause,
                on_stop: config.on_stop,
            },
            controls,
        }
    }

    /// A handle taken after [`stop`](Self::stop) is already dead.
    pub fn handle(&self) -> LoopHandle {
        let queue = match self.phase {
            Phase::Stop => Weak::new(),
            _ => Rc::downgrade(&self.controls),
        };
        LoopHandle { queue }
    }

    pub fn state(&self) -> LoopState {
        match self.phase {
            Phase::Run => LoopState::Run,
            Phase::Pause => LoopState::Pause,
            Phase::Init | Phase::Stop => LoopState::Init,
        }
    }

    /// Accumulated (clamped) frame time since the first frame.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// What the host must wait for before the next [`frame`](Self::frame).
    pub fn wake(&self) -> Wake {
        self.clock.as_ref().map_or(Wake::Idle, FrameClock::wake)
    }

    pub fn start(&mut self) -> bool {
        self.start_at(Instant::now())
    }

    /// `init → run` or `pause → run`.
    ///
    /// Listeners are attached on the first start only. `on_start` runs on
    /// every successful transition. Starting a running loop is a no-op.
    pub fn start_at(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Stop => {
                log::trace!("start ignored: loop already stopped");
                return false;
            }
            Phase::Run => return true,
            Phase::Init => self.attach_listeners(),
            Phase::Pause => {}
        }

        self.phase = Phase::Run;
        log::debug!("loop running (elapsed {:?})", self.elapsed);
        call(&mut self.hooks.on_start);

        if let Some(clock) = self.clock.as_mut() {
            clock.start(now);
        }
        true
    }

    /// `run → pause`. Frames stop being scheduled; listeners stay attached.
    pub fn pause(&mut self) -> bool {
        match self.phase {
            Phase::Run => {}
            Phase::Pause => return true,
            Phase::Init | Phase::Stop => {
                log::trace!("pause ignored in {:?}", self.phase);
                return false;
            }
        }

        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        self.phase = Phase::Pause;
        log::debug!("loop paused (elapsed {:?})", self.elapsed);
        call(&mut self.hooks.on_pause);
        true
    }

    /// `run | pause → stop` (terminal).
    ///
    /// Returns `false` for a loop that was never started or is already stopped.
    pub fn stop(&mut self) -> bool {
        match self.phase {
            Phase::Run | Phase::Pause => {}
            Phase::Init | Phase::Stop => {
                log::trace!("stop ignored in {:?}", self.phase);
                return false;
            }
        }

        if let Some(mut clock) = self.clock.take() {
            clock.stop();
        }
        self.phase = Phase::Stop;
        self.detach_listeners();
        log::debug!("loop stopped (elapsed {:?})", self.elapsed);

        let mut hooks = std::mem::replace(&mut self.hooks, Hooks::empty());
        call(&mut hooks.on_stop);

        // Invalidate outstanding handles and release captured state.
        self.controls = ControlQueue::default();
        self.key_listener = None;
        self.mouse_listener = None;
        true
    }

    /// Applies control requests queued through [`LoopHandle`]s.
    ///
    /// Returns how many requests were processed.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        loop {
            let next = self.controls.borrow_mut().pop_front();
            let Some(control) = next else {
                break;
            };
            match control {
                Control::Start => self.start_at(now),
                Control::Pause => self.pause(),
                Control::Stop => self.stop(),
            };
            applied += 1;
        }
        applied
    }

    /// Delivers one frame if the owned clock has one due at `now`.
    ///
    /// Returns `true` when a frame ran.
    pub fn frame(&mut self, now: Instant, ctx: &mut C) -> bool {
        self.pump(now);

        let Some(ft) = self.clock.as_mut().and_then(|clock| clock.begin(now)) else {
            return false;
        };

        let flow = self.step(ft.dt, now, ctx);
        if flow.is_stop() {
            self.stop();
        } else if let Some(clock) = self.clock.as_mut() {
            clock.end(flow);
        }
        true
    }

    /// One frame's worth of work for a delta of `dt`.
    fn step(&mut self, dt: Duration, now: Instant, ctx: &mut C) -> Flow {
        self.elapsed += dt;

        // The first frame is always an update boundary.
        let deadline = *self.next_tick.get_or_insert(self.elapsed);

        if self.interval.is_zero() || self.elapsed >= deadline {
            self.next_tick = Some(deadline + self.interval);
            if let Some(tick) = self.hooks.on_tick.as_mut() {
                if tick(self.elapsed, dt).is_stop() {
                    return Flow::Stop;
                }
            }

            self.pump(now);
            if self.phase != Phase::Run {
                return Flow::Continue;
            }
        }

        if let Some(render) = self.hooks.on_render.as_mut() {
            if render(ctx).is_stop() {
                return Flow::Stop;
            }
        }

        self.pump(now);
        Flow::Continue
    }

    fn attach_listeners(&mut self) {
        if self.listeners_attached {
            return;
        }

        if let Some(listener) = &self.mouse_listener {
            for kind in EventKind::POINTER {
                self.attached
                    .push(self.target.add_listener(kind, listener.clone()));
            }
        }
        if let Some(listener) = &self.key_listener {
            for kind in EventKind::KEYS {
                self.attached
                    .push(self.target.add_listener(kind, listener.clone()));
            }
        }

        self.listeners_attached = true;
    }

    fn detach_listeners(&mut self) {
        for id in self.attached.drain(..) {
            if !self.target.remove_listener(id) {
                log::warn!("listener {id:?} was already removed from its target");
            }
        }
        self.listeners_attached = false;
    }
}

impl<C> Drop for LoopController<C> {
    fn drop(&mut self) {
        if self.listeners_attached {
            self.detach_listeners();
        }
    }
}
