use super::Vec2;

/// Axis-aligned rectangle in surface pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of `size` centered on `center`.
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: Vec2::new(center.x - size.x / 2.0, center.y - size.y / 2.0),
            size,
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x / 2.0, self.origin.y + self.size.y / 2.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Integer pixel span `[x0, x1) × [y0, y1)` covered by this rect, clipped
    /// to a `width × height` surface.
    pub fn pixel_span(self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        if self.is_empty() {
            return None;
        }
        let max = self.max();
        let x0 = self.origin.x.round().clamp(0.0, width as f32) as u32;
        let y0 = self.origin.y.round().clamp(0.0, height as f32) as u32;
        let x1 = max.x.round().clamp(0.0, width as f32) as u32;
        let y1 = max.y.round().clamp(0.0, height as f32) as u32;
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── pixel_span ────────────────────────────────────────────────────────

    #[test]
    fn span_inside_surface() {
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0).pixel_span(10, 10), Some((1, 2, 4, 6)));
    }

    #[test]
    fn span_is_clipped() {
        assert_eq!(Rect::new(-5.0, 8.0, 10.0, 10.0).pixel_span(10, 10), Some((0, 8, 5, 10)));
    }

    #[test]
    fn span_outside_is_none() {
        assert_eq!(Rect::new(20.0, 0.0, 5.0, 5.0).pixel_span(10, 10), None);
        assert_eq!(Rect::new(0.0, 0.0, 0.0, 5.0).pixel_span(10, 10), None);
    }

    // ── centered ──────────────────────────────────────────────────────────

    #[test]
    fn centered_round_trips_center() {
        let r = Rect::centered(Vec2::new(50.0, 20.0), Vec2::new(10.0, 4.0));
        assert_eq!(r.origin, Vec2::new(45.0, 18.0));
        assert_eq!(r.center(), Vec2::new(50.0, 20.0));
    }
}
