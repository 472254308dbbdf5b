/// Straight-alpha sRGB color with `f32` channels in `[0, 1]`.
///
/// The canvas blends in sRGB space, which is what the drill's flat shapes
/// and text need; there is no linear-light pipeline behind it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    /// `#add8e6`
    pub const LIGHT_BLUE: Color = Color::rgba(0.678, 0.847, 0.902, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Same color with alpha multiplied by `opacity`.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps all channels to `[0, 1]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Packs into RGBA8, rounding to nearest.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Source-over blends `self` onto an opaque RGBA8 destination pixel,
    /// scaling the source alpha by `coverage`.
    #[inline]
    pub fn blend_over(self, dst: &mut [u8], coverage: f32) {
        let c = self.clamped();
        let alpha = c.a * coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        for (channel, src) in dst.iter_mut().take(3).zip([c.r, c.g, c.b]) {
            let d = *channel as f32 / 255.0;
            *channel = ((src * alpha + d * (1.0 - alpha)) * 255.0).round() as u8;
        }
        dst[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_blend_replaces_destination() {
        let mut px = [10, 20, 30, 255];
        Color::WHITE.blend_over(&mut px, 1.0);
        assert_eq!(px, [255, 255, 255, 255]);
    }

    #[test]
    fn half_coverage_mixes() {
        let mut px = [0, 0, 0, 255];
        Color::WHITE.blend_over(&mut px, 0.5);
        assert_eq!(px, [128, 128, 128, 255]);
    }

    #[test]
    fn zero_alpha_is_a_noop() {
        let mut px = [1, 2, 3, 255];
        Color::BLACK.with_opacity(0.0).blend_over(&mut px, 1.0);
        assert_eq!(px, [1, 2, 3, 255]);
    }

    #[test]
    fn light_blue_packs_to_its_hex() {
        assert_eq!(Color::LIGHT_BLUE.to_rgba8(), [0xad, 0xd8, 0xe6, 0xff]);
    }
}
