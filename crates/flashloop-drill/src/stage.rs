use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Instant;

use flashloop_engine::canvas::Canvas;
use flashloop_engine::core::{App, AppControl, FrameCtx};
use flashloop_engine::input::{EventTarget, InputEvent, ListenerRegistry};
use flashloop_engine::looping::{LoopController, LoopState};
use flashloop_engine::time::Wake;

/// A screen is one loop controller drawing into the window canvas.
pub type Screen = LoopController<Canvas>;

/// Builds a screen when its turn comes.
pub type ScreenFactory = Box<dyn FnOnce(Rc<dyn EventTarget>, StageHandle) -> Screen>;

type Spawned = Rc<RefCell<Vec<Screen>>>;

/// Lets screens hand extra screens (overlays) to the stage that runs them.
#[derive(Clone)]
pub struct StageHandle {
    spawned: Weak<RefCell<Vec<Screen>>>,
}

impl StageHandle {
    /// Queues `screen` to be started alongside the current one.
    ///
    /// Returns `false` when the stage no longer exists.
    pub fn spawn(&self, screen: Screen) -> bool {
        match self.spawned.upgrade() {
            Some(spawned) => {
                spawned.borrow_mut().push(screen);
                true
            }
            None => false,
        }
    }
}

/// Runs screens one after another, plus any overlays they spawn.
///
/// A screen counts as finished once it reports `LoopState::Init` after the
/// stage has started it; the next factory is then built and started in the
/// same call. Implements [`App`] so it can be hosted by the window runtime.
pub struct Stage {
    registry: Rc<ListenerRegistry>,
    queue: VecDeque<ScreenFactory>,
    current: Option<Screen>,
    overlays: Vec<Screen>,
    spawned: Spawned,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(ListenerRegistry::new()),
            queue: VecDeque::new(),
            current: None,
            overlays: Vec::new(),
            spawned: Spawned::default(),
        }
    }

    /// The event target every screen registers its listeners on.
    pub fn registry(&self) -> Rc<ListenerRegistry> {
        self.registry.clone()
    }

    pub fn handle(&self) -> StageHandle {
        StageHandle {
            spawned: Rc::downgrade(&self.spawned),
        }
    }

    pub fn push(&mut self, factory: impl FnOnce(Rc<dyn EventTarget>, StageHandle) -> Screen + 'static) {
        self.queue.push_back(Box::new(factory));
    }

    /// State of the screen currently in front, if any.
    pub fn current_state(&self) -> Option<LoopState> {
        self.current.as_ref().map(Screen::state)
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Overlays spawned but not yet started.
    pub fn pending_overlays(&self) -> usize {
        self.spawned.borrow().len()
    }

    /// True once every queued screen has run to completion.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
            && self.current.is_none()
            && self.overlays.is_empty()
            && self.spawned.borrow().is_empty()
    }

    /// Starts the first screen if nothing is running yet.
    pub fn start(&mut self, now: Instant) {
        self.settle(now);
    }

    /// Delivers an input event, then applies whatever it requested.
    pub fn dispatch(&mut self, event: &InputEvent, now: Instant) -> usize {
        let delivered = self.registry.dispatch(event);
        self.pump(now);
        self.settle(now);
        delivered
    }

    /// Runs every due screen for one host frame. Overlays draw after the
    /// screen they cover.
    pub fn frame(&mut self, now: Instant, canvas: &mut Canvas) {
        self.settle(now);

        if let Some(screen) = self.current.as_mut() {
            screen.frame(now, canvas);
        }
        for overlay in &mut self.overlays {
            overlay.frame(now, canvas);
        }

        self.settle(now);
    }

    pub fn wake(&self) -> Wake {
        if !self.spawned.borrow().is_empty() {
            return Wake::Refresh;
        }
        self.overlays
            .iter()
            .chain(self.current.as_ref())
            .fold(Wake::Idle, |wake, screen| wake.merge(screen.wake()))
    }

    fn pump(&mut self, now: Instant) {
        if let Some(screen) = self.current.as_mut() {
            screen.pump(now);
        }
        for overlay in &mut self.overlays {
            overlay.pump(now);
        }
    }

    /// Adopts spawned overlays, retires finished screens and starts the next.
    fn settle(&mut self, now: Instant) {
        let fresh = std::mem::take(&mut *self.spawned.borrow_mut());
        for mut overlay in fresh {
            overlay.start_at(now);
            self.overlays.push(overlay);
        }
        self.overlays.retain(|o| o.state() != LoopState::Init);

        loop {
            if let Some(screen) = self.current.as_ref() {
                if screen.state() != LoopState::Init {
                    return;
                }
                log::debug!("screen finished, {} left", self.queue.len());
                self.current = None;
            }

            let Some(factory) = self.queue.pop_front() else {
                return;
            };
            let target: Rc<dyn EventTarget> = self.registry.clone();
            let mut screen = factory(target, self.handle());
            screen.start_at(now);
            self.current = Some(screen);
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Stage {
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        self.dispatch(event, Instant::now());
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        self.frame(ctx.now, ctx.canvas);
        AppControl::Continue
    }

    fn wake(&self) -> Wake {
        Stage::wake(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashloop_engine::input::{Key, KeyEvent, KeyEventKind};
    use flashloop_engine::looping::{Flow, LoopConfig};
    use std::cell::Cell;
    use std::time::Duration;

    use crate::problems::Problem;
    use crate::screens::queue_session;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn one_shot(
        log: Log,
        name: &'static str,
    ) -> impl FnOnce(Rc<dyn EventTarget>, StageHandle) -> Screen {
        move |target, _| {
            let config = LoopConfig::new()
                .on_start({
                    let log = log.clone();
                    move || log.borrow_mut().push(name)
                })
                .on_render(|_: &mut Canvas| Flow::Stop);
            LoopController::new(target, config)
        }
    }

    fn press(key: Key, text: char) -> InputEvent {
        InputEvent::Key(KeyEvent::new(KeyEventKind::Press, key).with_text(text))
    }

    // ── sequencing ──

    #[test]
    fn screens_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stage = Stage::new();
        stage.push(one_shot(log.clone(), "a"));
        stage.push(one_shot(log.clone(), "b"));
        let mut canvas = Canvas::new(4, 4);
        let t0 = Instant::now();

        stage.start(t0);
        assert_eq!(*log.borrow(), ["a"]);
        assert_eq!(stage.wake(), Wake::Refresh);

        stage.frame(t0, &mut canvas);
        assert_eq!(*log.borrow(), ["a", "b"]);
        assert_eq!(stage.remaining(), 0);

        stage.frame(t0 + Duration::from_millis(16), &mut canvas);
        assert!(stage.is_finished());
        assert_eq!(stage.wake(), Wake::Idle);
    }

    #[test]
    fn empty_stage_is_finished() {
        let mut stage = Stage::new();
        stage.start(Instant::now());
        assert!(stage.is_finished());
        assert_eq!(stage.current_state(), None);
    }

    // ── overlays ──

    #[test]
    fn spawned_overlay_runs_alongside() {
        let drawn = Rc::new(Cell::new(0));
        let mut stage = Stage::new();
        stage.push(|target, _| {
            LoopController::new(target, LoopConfig::new().on_render(|_: &mut Canvas| Flow::Continue))
        });
        let mut canvas = Canvas::new(4, 4);
        let t0 = Instant::now();
        stage.start(t0);

        let counter = drawn.clone();
        let overlay = LoopController::new(
            stage.registry(),
            LoopConfig::new().on_render(move |_: &mut Canvas| {
                counter.set(counter.get() + 1);
                Flow::Stop
            }),
        );
        assert!(stage.handle().spawn(overlay));
        assert_eq!(stage.wake(), Wake::Refresh);

        stage.frame(t0, &mut canvas);
        assert_eq!(drawn.get(), 1);
        assert_eq!(stage.overlay_count(), 0);
        assert_eq!(stage.current_state(), Some(LoopState::Run));
    }

    #[test]
    fn handle_outliving_stage_is_inert() {
        let stage = Stage::new();
        let handle = stage.handle();
        let registry = stage.registry();
        drop(stage);

        let screen = LoopController::new(registry, LoopConfig::<Canvas>::new());
        assert!(!handle.spawn(screen));
    }

    // ── full session ──

    #[test]
    fn session_reaches_the_stats_banner() {
        let mut stage = Stage::new();
        let report = queue_session(&mut stage, vec![Problem::new(2, 3)]);
        let mut canvas = Canvas::new(32, 32);

        let t0 = Instant::now();
        let mut now = t0;
        stage.start(now);

        // Countdown ticks on a 100 ms timer.
        let mut guard = 0;
        while stage.remaining() == 2 && guard < 100 {
            now += Duration::from_millis(101);
            stage.frame(now, &mut canvas);
            guard += 1;
        }
        assert_eq!(stage.remaining(), 1, "drill should be in front");
        assert!(stage.registry().len() > 0);

        stage.dispatch(&press(Key::Space, ' '), now);
        assert_eq!(stage.current_state(), Some(LoopState::Pause));
        assert_eq!(stage.overlay_count(), 1);
        now += Duration::from_millis(16);
        stage.frame(now, &mut canvas);
        assert_eq!(stage.overlay_count(), 0);

        stage.dispatch(&press(Key::Space, ' '), now);
        stage.dispatch(&press(Key::Digit6, '6'), now);
        stage.dispatch(&press(Key::Enter, '\r'), now);
        now += Duration::from_millis(16);
        stage.frame(now, &mut canvas);

        assert_eq!(stage.remaining(), 0, "stats banner should be in front");
        let graded = report.borrow().clone().expect("drill report");
        assert_eq!(graded.correct.len(), 1);
        assert_eq!(graded.pauses, 1);

        while !stage.is_finished() && guard < 500 {
            now += Duration::from_millis(16);
            stage.frame(now, &mut canvas);
            guard += 1;
        }
        assert!(stage.is_finished());
        assert!(stage.registry().is_empty());
    }
}
