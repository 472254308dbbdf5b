use std::time::{Duration, Instant};

/// Intervals below this are served by the refresh-driven cadence.
pub const INTERVAL_THRESHOLD: Duration = Duration::from_millis(50);

/// Delta ceiling for the refresh-driven cadence.
pub const REFRESH_CLAMP: Duration = Duration::from_millis(35);

/// Added to every timer interval so the measured delta never lands below it.
pub const TIMER_SLACK: Duration = Duration::from_millis(1);

/// Result of a frame callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Stop,
}

impl Flow {
    #[inline]
    pub fn is_stop(self) -> bool {
        self == Flow::Stop
    }
}

/// How frames are delivered to a clock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cadence {
    /// One frame per display refresh.
    Refresh,

    /// One frame per wall-clock interval (plus [`TIMER_SLACK`]).
    Interval(Duration),
}

impl Cadence {
    /// Picks the cadence for an optional minimum spacing.
    ///
    /// `None`, zero and anything under [`INTERVAL_THRESHOLD`] select `Refresh`.
    pub fn from_interval(interval: Option<Duration>) -> Self {
        match interval {
            Some(i) if i >= INTERVAL_THRESHOLD => Cadence::Interval(i),
            _ => Cadence::Refresh,
        }
    }

    /// Maximum delta ever reported for this cadence.
    pub fn clamp(self) -> Duration {
        match self {
            Cadence::Refresh => REFRESH_CLAMP,
            Cadence::Interval(i) => i.saturating_mul(2),
        }
    }
}

/// What a clock needs from its host before the next frame can run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Wake {
    /// Nothing scheduled.
    Idle,

    /// Run on the next display refresh.
    Refresh,

    /// Run once `Instant` has been reached.
    At(Instant),
}

impl Wake {
    /// Combines two requirements: any refresh wins, otherwise the earliest deadline.
    pub fn merge(self, other: Wake) -> Wake {
        match (self, other) {
            (Wake::Refresh, _) | (_, Wake::Refresh) => Wake::Refresh,
            (Wake::At(a), Wake::At(b)) => Wake::At(a.min(b)),
            (Wake::At(a), Wake::Idle) | (Wake::Idle, Wake::At(a)) => Wake::At(a),
            (Wake::Idle, Wake::Idle) => Wake::Idle,
        }
    }

    pub fn is_idle(self) -> bool {
        self == Wake::Idle
    }
}

/// Frame timing snapshot handed to the frame callback.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous frame.
    pub dt: Duration,

    /// Monotonic timestamp the frame was delivered at.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Pull-driven frame scheduler.
///
/// The clock never sleeps or spawns anything; a host asks [`wake`](Self::wake)
/// what it is waiting for and calls [`begin`](Self::begin) / [`end`](Self::end)
/// (or [`fire`](Self::fire)) once a frame is due.
///
/// `start()` after `stop()` keeps the previous timestamp, so the first delta
/// after a restart is measured against the last delivered frame (and clamped).
/// Create a fresh clock when a clean delta is needed.
#[derive(Debug, Clone)]
pub struct FrameClock {
    cadence: Cadence,
    clamp: Duration,
    last: Option<Instant>,
    repeat: bool,
    pending: Wake,
    in_frame: bool,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(interval: Option<Duration>) -> Self {
        let cadence = Cadence::from_interval(interval);
        Self {
            cadence,
            clamp: cadence.clamp(),
            last: None,
            repeat: false,
            pending: Wake::Idle,
            in_frame: false,
            frame_index: 0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn clamp(&self) -> Duration {
        self.clamp
    }

    pub fn is_running(&self) -> bool {
        self.repeat
    }

    /// Enables repetition and requests the next frame.
    pub fn start(&mut self, now: Instant) {
        self.repeat = true;
        self.request(now);
    }

    /// Disables repetition and drops any pending request, so
    /// [`wake`](Self::wake) reports `Idle` right away.
    ///
    /// A frame the host had already decided to deliver is swallowed by
    /// [`begin`](Self::begin) and nothing is rescheduled.
    pub fn stop(&mut self) {
        self.repeat = false;
        self.pending = Wake::Idle;
    }

    /// What the host must wait for before calling `begin`.
    pub fn wake(&self) -> Wake {
        self.pending
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.pending {
            Wake::Idle => false,
            Wake::Refresh => true,
            Wake::At(deadline) => now >= deadline,
        }
    }

    /// Consumes a due frame request and measures the delta.
    ///
    /// Returns `None` when nothing is due or the clock was stopped while the
    /// request was in flight. Every `Some` must be paired with [`end`](Self::end).
    pub fn begin(&mut self, now: Instant) -> Option<FrameTime> {
        if !self.is_due(now) {
            return None;
        }
        self.pending = Wake::Idle;

        let last = *self.last.get_or_insert(now);
        if !self.repeat {
            return None;
        }

        let dt = now.saturating_duration_since(last).min(self.clamp);
        // Clamping only affects the reported delta, never the timebase.
        self.last = Some(now);
        self.in_frame = true;

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);

        Some(ft)
    }

    /// Finishes the frame opened by `begin`, scheduling the next one unless
    /// the callback asked to stop or the clock was stopped meanwhile.
    pub fn end(&mut self, flow: Flow) {
        if !std::mem::take(&mut self.in_frame) {
            return;
        }
        match flow {
            Flow::Continue if self.repeat => {
                if let Some(now) = self.last {
                    self.request(now);
                }
            }
            Flow::Continue => {}
            Flow::Stop => self.repeat = false,
        }
    }

    /// Runs `callback` for a due frame and reschedules according to its result.
    ///
    /// Returns the callback's result, or `None` if no frame was delivered.
    pub fn fire<F>(&mut self, now: Instant, callback: F) -> Option<Flow>
    where
        F: FnOnce(FrameTime) -> Flow,
    {
        let ft = self.begin(now)?;
        let flow = callback(ft);
        self.end(flow);
        Some(flow)
    }

    fn request(&mut self, now: Instant) {
        self.pending = match self.cadence {
            Cadence::Refresh => Wake::Refresh,
            Cadence::Interval(i) => Wake::At(now + i + TIMER_SLACK),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── cadence ───────────────────────────────────────────────────────────

    #[test]
    fn short_or_missing_interval_uses_refresh() {
        assert_eq!(Cadence::from_interval(None), Cadence::Refresh);
        assert_eq!(Cadence::from_interval(Some(Duration::ZERO)), Cadence::Refresh);
        assert_eq!(Cadence::from_interval(Some(ms(49))), Cadence::Refresh);
    }

    #[test]
    fn threshold_interval_uses_timer() {
        assert_eq!(Cadence::from_interval(Some(ms(50))), Cadence::Interval(ms(50)));
        assert_eq!(Cadence::from_interval(Some(ms(1000))), Cadence::Interval(ms(1000)));
    }

    #[test]
    fn clamp_depends_on_cadence() {
        assert_eq!(FrameClock::new(None).clamp(), ms(35));
        assert_eq!(FrameClock::new(Some(ms(100))).clamp(), ms(200));
    }

    // ── scheduling ────────────────────────────────────────────────────────

    #[test]
    fn idle_until_started() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        assert_eq!(clock.wake(), Wake::Idle);
        assert!(clock.fire(t0, |_| Flow::Continue).is_none());
    }

    #[test]
    fn first_frame_reports_zero_delta() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        clock.start(t0);

        let ft = clock.begin(t0 + ms(16)).unwrap();
        assert_eq!(ft.dt, Duration::ZERO);
        assert_eq!(ft.frame_index, 0);
        clock.end(Flow::Continue);

        let ft = clock.begin(t0 + ms(32)).unwrap();
        assert_eq!(ft.dt, ms(16));
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn refresh_delta_is_clamped_but_timebase_is_not() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        clock.start(t0);
        clock.fire(t0, |_| Flow::Continue);

        let dt = clock.fire(t0 + ms(500), |ft| {
            assert_eq!(ft.dt, ms(35));
            Flow::Continue
        });
        assert_eq!(dt, Some(Flow::Continue));

        // Measured from 500, not from 35.
        clock.fire(t0 + ms(510), |ft| {
            assert_eq!(ft.dt, ms(10));
            Flow::Continue
        });
    }

    #[test]
    fn interval_frames_wait_for_deadline() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(Some(ms(100)));
        clock.start(t0);

        assert_eq!(clock.wake(), Wake::At(t0 + ms(101)));
        assert!(clock.fire(t0 + ms(100), |_| Flow::Continue).is_none());
        assert!(clock.fire(t0 + ms(101), |_| Flow::Continue).is_some());
        assert_eq!(clock.wake(), Wake::At(t0 + ms(202)));
    }

    #[test]
    fn stop_flow_halts_scheduling() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        clock.start(t0);
        clock.fire(t0, |_| Flow::Stop);

        assert_eq!(clock.wake(), Wake::Idle);
        assert!(!clock.is_running());
    }

    #[test]
    fn in_flight_frame_after_stop_is_swallowed() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        clock.start(t0);
        clock.stop();

        let mut called = false;
        assert!(clock.fire(t0, |_| { called = true; Flow::Continue }).is_none());
        assert!(!called);
        assert_eq!(clock.wake(), Wake::Idle);
    }

    #[test]
    fn stopped_interval_clock_drops_its_deadline() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(Some(ms(1000)));
        clock.start(t0);
        assert_eq!(clock.wake(), Wake::At(t0 + ms(1001)));

        clock.stop();
        assert_eq!(clock.wake(), Wake::Idle);
        assert!(!clock.is_due(t0 + ms(2000)));

        clock.start(t0 + ms(1500));
        assert_eq!(clock.wake(), Wake::At(t0 + ms(2501)));
    }

    #[test]
    fn restart_measures_against_last_frame() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(Some(ms(100)));
        clock.start(t0);
        clock.fire(t0 + ms(101), |_| Flow::Continue);
        clock.stop();

        clock.start(t0 + ms(150));
        let dt = clock.begin(t0 + ms(251)).map(|ft| ft.dt);
        assert_eq!(dt, Some(ms(150)));
    }

    #[test]
    fn repeated_start_keeps_one_pending_frame() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(None);
        clock.start(t0);
        clock.start(t0);

        assert!(clock.fire(t0, |_| Flow::Continue).is_some());
        clock.stop();
        assert!(clock.fire(t0 + ms(16), |_| Flow::Continue).is_none());
        assert!(clock.fire(t0 + ms(32), |_| Flow::Continue).is_none());
    }

    // ── wake ──────────────────────────────────────────────────────────────

    #[test]
    fn wake_merge_prefers_refresh_then_earliest() {
        let t0 = Instant::now();
        let a = Wake::At(t0 + ms(5));
        let b = Wake::At(t0 + ms(9));
        assert_eq!(a.merge(b), a);
        assert_eq!(b.merge(Wake::Refresh), Wake::Refresh);
        assert_eq!(Wake::Idle.merge(b), b);
        assert!(Wake::Idle.merge(Wake::Idle).is_idle());
    }

    // ── invariants ────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn reported_delta_never_exceeds_clamp(
            interval in prop::option::of(0u64..400),
            gaps in prop::collection::vec(0u64..2_000, 1..64),
        ) {
            let t0 = Instant::now();
            let mut clock = FrameClock::new(interval.map(Duration::from_millis));
            let clamp = clock.clamp();
            clock.start(t0);

            let mut now = t0;
            for gap in gaps {
                now += Duration::from_millis(gap);
                if let Some(ft) = clock.begin(now) {
                    prop_assert!(ft.dt <= clamp);
                    clock.end(Flow::Continue);
                }
            }
        }

        #[test]
        fn interval_frames_are_spaced_at_least_interval(
            interval in 50u64..500,
            gaps in prop::collection::vec(0u64..1_000, 1..64),
        ) {
            let t0 = Instant::now();
            let interval = Duration::from_millis(interval);
            let mut clock = FrameClock::new(Some(interval));
            clock.start(t0);

            let mut now = t0;
            let mut previous: Option<Instant> = None;
            for gap in gaps {
                now += Duration::from_millis(gap);
                if let Some(ft) = clock.begin(now) {
                    if let Some(p) = previous {
                        prop_assert!(ft.now - p >= interval);
                    }
                    previous = Some(ft.now);
                    clock.end(Flow::Continue);
                }
            }
        }
    }
}
