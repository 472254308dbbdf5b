use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use flashloop_engine::canvas::Canvas;
use flashloop_engine::input::EventTarget;
use flashloop_engine::looping::{Flow, LoopConfig, LoopController};
use flashloop_engine::paint::Color;

/// First number shown.
pub const COUNTDOWN_FROM: u32 = 3;

const STEP: Duration = Duration::from_millis(1000);
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// "3, 2, 1" banner shown before the drill starts.
#[derive(Debug, Clone)]
pub struct Countdown {
    count: u32,
    elapsed: Duration,
    next_step: Duration,
}

impl Countdown {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            elapsed: Duration::ZERO,
            next_step: STEP,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Advances by `dt`; stops once the count reaches zero.
    pub fn tick(&mut self, dt: Duration) -> Flow {
        if self.count == 0 {
            return Flow::Stop;
        }

        self.elapsed += dt;
        if self.elapsed >= self.next_step {
            self.count -= 1;
            if self.count == 0 {
                return Flow::Stop;
            }
            self.next_step += STEP;
        }
        Flow::Continue
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.clear(Color::WHITE);
        let size = canvas.height() as f32 / 4.0;
        let center = canvas.bounds().center();
        canvas.draw_text_centered(&self.count.to_string(), center, size, Color::BLACK);
    }
}

/// Countdown loop: ticks every 100 ms, redraws the current number each frame.
pub fn countdown_screen(target: Rc<dyn EventTarget>) -> LoopController<Canvas> {
    let banner = Rc::new(RefCell::new(Countdown::new(COUNTDOWN_FROM)));
    let ticker = banner.clone();

    let config = LoopConfig::new()
        .interval(TICK_INTERVAL)
        .on_tick(move |_, dt| ticker.borrow_mut().tick(dt))
        .on_render(move |canvas: &mut Canvas| {
            banner.borrow().draw(canvas);
            Flow::Continue
        })
        .on_stop(|| log::debug!("countdown finished"));

    LoopController::new(target, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashloop_engine::input::ListenerRegistry;
    use flashloop_engine::looping::LoopState;
    use std::time::Instant;

    const DT: Duration = Duration::from_millis(100);

    // ── banner ──

    #[test]
    fn counts_down_one_step_per_second() {
        let mut banner = Countdown::new(3);
        for _ in 0..9 {
            assert_eq!(banner.tick(DT), Flow::Continue);
        }
        assert_eq!(banner.count(), 3);

        assert_eq!(banner.tick(DT), Flow::Continue);
        assert_eq!(banner.count(), 2);

        for _ in 0..10 {
            banner.tick(DT);
        }
        assert_eq!(banner.count(), 1);
    }

    #[test]
    fn stops_when_count_reaches_zero() {
        let mut banner = Countdown::new(3);
        let ticks = std::iter::repeat_with(|| banner.tick(DT))
            .take_while(|f| *f == Flow::Continue)
            .count();
        assert_eq!(ticks, 29);
        assert_eq!(banner.count(), 0);
        assert_eq!(banner.tick(DT), Flow::Stop);
    }

    #[test]
    fn draws_on_white() {
        let mut canvas = Canvas::new(8, 8);
        canvas.clear(Color::BLACK);
        Countdown::new(3).draw(&mut canvas);
        assert_eq!(canvas.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    // ── screen ──

    #[test]
    fn screen_finishes_after_three_seconds() {
        let target: Rc<dyn EventTarget> = Rc::new(ListenerRegistry::new());
        let mut screen = countdown_screen(target);
        let mut canvas = Canvas::new(4, 4);
        let t0 = Instant::now();

        assert!(screen.start_at(t0));
        let mut now = t0;
        let mut frames = 0;
        while screen.state() == LoopState::Run && frames < 100 {
            now += Duration::from_millis(101);
            screen.frame(now, &mut canvas);
            frames += 1;
        }

        assert_eq!(screen.state(), LoopState::Init);
        assert!(screen.elapsed() >= Duration::from_millis(3000));
        assert!(screen.elapsed() < Duration::from_millis(3200));
    }
}
