use crate::coords::{Rect, Vec2};
use crate::paint::Color;

use super::font::{FontLoadError, Typeface};

/// Average advance used to estimate text width when no font is loaded.
const FALLBACK_ADVANCE: f32 = 0.6;

/// CPU RGBA8 drawing surface.
///
/// This is the render context screens draw into; the window host copies it
/// to the presentation surface after every frame. Pixels persist between
/// frames until something draws over them.
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    typeface: Option<Typeface>,
}

impl Canvas {
    /// Creates an opaque white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            typeface: None,
        };
        canvas.clear(Color::WHITE);
        canvas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Resizes the surface, keeping the overlapping top-left region.
    ///
    /// Newly exposed pixels are white.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }

        let mut next = Canvas::new(width, height);
        let cols = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) {
            let src = self.index(0, y);
            let dst = next.index(0, y);
            next.pixels[dst..dst + cols].copy_from_slice(&self.pixels[src..src + cols]);
        }

        self.width = width;
        self.height = height;
        self.pixels = next.pixels;
    }

    pub fn load_font(&mut self, bytes: &[u8]) -> Result<(), FontLoadError> {
        self.typeface = Some(Typeface::from_bytes(bytes)?);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.typeface.is_some()
    }

    /// Fills the whole surface with `color` (alpha ignored).
    pub fn clear(&mut self, color: Color) {
        let [r, g, b, _] = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = rect.pixel_span(self.width, self.height) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.index(x, y);
                color.blend_over(&mut self.pixels[i..i + 4], 1.0);
            }
        }
    }

    /// Draws one line of text with its top-left corner at `origin`.
    ///
    /// Without a loaded font this draws nothing.
    pub fn draw_text(&mut self, text: &str, origin: Vec2, size: f32, color: Color) {
        let Some(typeface) = self.typeface.as_ref() else {
            return;
        };

        for glyph in typeface.layout(text, size) {
            if !glyph.char_data.rasterize() || glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, coverage) = typeface.font().rasterize_config(glyph.key);
            let gx = (origin.x + glyph.x).round() as i64;
            let gy = (origin.y + glyph.y).round() as i64;

            for row in 0..metrics.height {
                let y = gy + row as i64;
                if y < 0 || y >= self.height as i64 {
                    continue;
                }
                for col in 0..metrics.width {
                    let x = gx + col as i64;
                    if x < 0 || x >= self.width as i64 {
                        continue;
                    }
                    let a = coverage[row * metrics.width + col];
                    if a == 0 {
                        continue;
                    }
                    let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
                    color.blend_over(&mut self.pixels[i..i + 4], a as f32 / 255.0);
                }
            }
        }
    }

    /// Draws `text` centered on `center`.
    pub fn draw_text_centered(&mut self, text: &str, center: Vec2, size: f32, color: Color) {
        let extent = self.measure_text(text, size);
        let origin = Rect::centered(center, extent).origin;
        self.draw_text(text, origin, size, color);
    }

    /// Width and height of `text` at `size` pixels.
    ///
    /// Without a font the result is an estimate based on character count.
    pub fn measure_text(&self, text: &str, size: f32) -> Vec2 {
        match self.typeface.as_ref() {
            Some(typeface) => typeface.measure(text, size),
            None => Vec2::new(
                text.chars().count() as f32 * size * FALLBACK_ADVANCE,
                size * 1.2,
            ),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Copies the canvas into an RGBA8 frame of the same dimensions.
    ///
    /// Returns `false` (and copies nothing) when the sizes differ.
    pub fn copy_to(&self, frame: &mut [u8]) -> bool {
        if frame.len() != self.pixels.len() {
            return false;
        }
        frame.copy_from_slice(&self.pixels);
        true
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_white() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.pixel(3, 2), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(Rect::new(2.0, 2.0, 10.0, 10.0), Color::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn translucent_fill_blends() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill_rect(canvas.bounds(), Color::BLACK.with_opacity(0.5));
        assert_eq!(canvas.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn text_without_font_is_estimated_and_not_drawn() {
        let mut canvas = Canvas::new(8, 8);
        assert!(!canvas.has_font());
        let size = canvas.measure_text("12", 10.0);
        assert!((size.x - 12.0).abs() < 1e-4 && (size.y - 12.0).abs() < 1e-4);

        canvas.draw_text("12", Vec2::zero(), 10.0, Color::BLACK);
        assert!(canvas.as_bytes().iter().all(|&b| b == 255));
    }

    #[test]
    fn bad_font_bytes_are_rejected() {
        let mut canvas = Canvas::new(1, 1);
        assert!(canvas.load_font(b"not a font").is_err());
        assert!(!canvas.has_font());
    }

    #[test]
    fn copy_requires_matching_size() {
        let mut canvas = Canvas::new(2, 2);
        canvas.clear(Color::BLACK);
        let mut frame = vec![7u8; 16];
        assert!(canvas.copy_to(&mut frame));
        assert_eq!(&frame[..4], &[0, 0, 0, 255]);
        assert!(!canvas.copy_to(&mut [0u8; 3]));
    }

    #[test]
    fn resize_keeps_overlap() {
        let mut canvas = Canvas::new(2, 2);
        canvas.clear(Color::BLACK);
        canvas.resize(3, 1);
        assert_eq!(canvas.as_bytes().len(), 12);
        assert_eq!(canvas.pixel(1, 0), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(2, 0), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 1), None);
    }
}
