use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use flashloop_engine::canvas::Canvas;
use flashloop_engine::input::EventTarget;
use flashloop_engine::looping::{Flow, LoopConfig, LoopController};
use flashloop_engine::paint::Color;

/// Fade-in duration of the score banner.
pub const FADE_IN: Duration = Duration::from_millis(1000);

const SCORE_SIZE: f32 = 40.0;

/// Final score, fading in from white.
#[derive(Debug, Clone)]
pub struct StatsBanner {
    duration: Duration,
    remaining: Duration,
    correct: usize,
    total: usize,
}

impl StatsBanner {
    pub fn new(duration: Duration, correct: usize, total: usize) -> Self {
        Self {
            duration,
            remaining: duration,
            correct,
            total,
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_zero()
    }

    /// 0 at the start of the fade, 1 once it has completed.
    pub fn opacity(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining.as_secs_f32() / self.duration.as_secs_f32()
    }

    pub fn text(&self) -> String {
        format!("{} / {}", self.correct, self.total)
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.clear(Color::WHITE);
        let center = canvas.bounds().center();
        let color = Color::BLACK.with_opacity(self.opacity());
        canvas.draw_text_centered(&self.text(), center, SCORE_SIZE, color);
    }
}

/// Score banner loop. Stops after drawing the fully opaque frame, which the
/// window then keeps showing.
pub fn stats_screen(target: Rc<dyn EventTarget>, correct: usize, total: usize) -> LoopController<Canvas> {
    let banner = Rc::new(RefCell::new(StatsBanner::new(FADE_IN, correct, total)));
    let ticker = banner.clone();

    let config = LoopConfig::new()
        .on_tick(move |_, dt| {
            ticker.borrow_mut().tick(dt);
            Flow::Continue
        })
        .on_render(move |canvas: &mut Canvas| {
            let banner = banner.borrow();
            banner.draw(canvas);
            if banner.is_complete() { Flow::Stop } else { Flow::Continue }
        });

    LoopController::new(target, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashloop_engine::input::ListenerRegistry;
    use flashloop_engine::looping::LoopState;
    use std::time::Instant;

    #[test]
    fn opacity_ramps_linearly() {
        let mut banner = StatsBanner::new(FADE_IN, 7, 10);
        assert_eq!(banner.opacity(), 0.0);

        banner.tick(Duration::from_millis(250));
        assert!((banner.opacity() - 0.25).abs() < 1e-6);

        banner.tick(Duration::from_secs(5));
        assert_eq!(banner.opacity(), 1.0);
        assert!(banner.is_complete());
        assert_eq!(banner.text(), "7 / 10");
    }

    #[test]
    fn zero_duration_is_opaque() {
        assert_eq!(StatsBanner::new(Duration::ZERO, 0, 1).opacity(), 1.0);
    }

    #[test]
    fn screen_stops_once_faded_in() {
        let target: Rc<dyn EventTarget> = Rc::new(ListenerRegistry::new());
        let mut screen = stats_screen(target, 3, 4);
        let mut canvas = Canvas::new(8, 8);
        let t0 = Instant::now();
        screen.start_at(t0);

        // Refresh deltas are clamped at 35 ms.
        let mut now = t0;
        let mut frames = 0;
        while screen.state() == LoopState::Run && frames < 200 {
            screen.frame(now, &mut canvas);
            now += Duration::from_millis(20);
            frames += 1;
        }

        assert_eq!(screen.state(), LoopState::Init);
        assert!(screen.elapsed() >= FADE_IN);
        assert!(frames > 50);
    }
}
