use std::rc::Rc;

use flashloop_engine::canvas::Canvas;
use flashloop_engine::coords::{Rect, Vec2};
use flashloop_engine::input::EventTarget;
use flashloop_engine::looping::{Flow, LoopConfig, LoopController};
use flashloop_engine::paint::Color;

const BAND_OPACITY: f32 = 0.9;
const RULE_WIDTH: f32 = 2.0;

/// Draws the "Paused" band across the middle third of the canvas.
pub fn draw_pause_band(canvas: &mut Canvas) {
    let w = canvas.width() as f32;
    let h = (canvas.height() / 3) as f32;
    let top = (canvas.height() as f32 - h) / 2.0;

    let band = Rect::new(0.0, top, w, h);
    canvas.fill_rect(band, Color::LIGHT_BLUE.with_opacity(BAND_OPACITY));

    let rule = Color::BLACK.with_opacity(BAND_OPACITY);
    canvas.fill_rect(Rect::new(0.0, top - RULE_WIDTH / 2.0, w, RULE_WIDTH), rule);
    canvas.fill_rect(Rect::new(0.0, top + h - RULE_WIDTH / 2.0, w, RULE_WIDTH), rule);

    let center = Vec2::new(w / 2.0, top + h / 2.0);
    canvas.draw_text_centered("Paused", center, (h / 2.0).ceil(), Color::BLACK);
}

/// One-shot overlay: draws the band on its first frame and stops.
pub fn pause_screen(target: Rc<dyn EventTarget>) -> LoopController<Canvas> {
    let config = LoopConfig::new().on_render(|canvas: &mut Canvas| {
        draw_pause_band(canvas);
        Flow::Stop
    });
    LoopController::new(target, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashloop_engine::input::ListenerRegistry;
    use flashloop_engine::looping::LoopState;
    use std::time::{Duration, Instant};

    #[test]
    fn band_covers_middle_third() {
        let mut canvas = Canvas::new(30, 30);
        draw_pause_band(&mut canvas);

        assert_eq!(canvas.pixel(15, 2), Some([255, 255, 255, 255]));
        let [r, g, b, _] = canvas.pixel(15, 15).unwrap_or_default();
        assert!(b > r && g > r, "light blue expected, got {r},{g},{b}");
        assert_eq!(canvas.pixel(15, 28), Some([255, 255, 255, 255]));
    }

    #[test]
    fn overlay_draws_once() {
        let target: Rc<dyn EventTarget> = Rc::new(ListenerRegistry::new());
        let mut overlay = pause_screen(target);
        let mut canvas = Canvas::new(9, 9);
        let t0 = Instant::now();

        assert!(overlay.start_at(t0));
        assert!(overlay.frame(t0, &mut canvas));
        assert_eq!(overlay.state(), LoopState::Init);
        assert!(!overlay.frame(t0 + Duration::from_millis(16), &mut canvas));
    }
}
