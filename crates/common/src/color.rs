use serde::{Deserialize, Serialize};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const BLUE: Color = Color::rgb(0, 121, 241);
    pub const LIME: Color = Color::rgb(0, 158, 47);
    pub const GOLD: Color = Color::rgb(255, 203, 0);
    pub const SKY_BLUE: Color = Color::rgb(102, 191, 255);
    pub const PURPLE: Color = Color::rgb(200, 122, 255);
    pub const DARK_PURPLE: Color = Color::rgb(112, 31, 126);
    /// Off-white clear color used for the 3D background.
    pub const BACKGROUND: Color = Color::rgb(245, 245, 245);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Scale the alpha channel by `alpha` in [0, 1].
    pub fn fade(self, alpha: f32) -> Self {
        let a = (f32::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Normalized float components for GPU upload.
    pub fn as_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
    }

    #[test]
    fn fade_scales_alpha_only() {
        let c = Color::SKY_BLUE.fade(0.5);
        assert_eq!(c.r, Color::SKY_BLUE.r);
        assert_eq!(c.a, 128);
    }

    #[test]
    fn fade_clamps() {
        assert_eq!(Color::WHITE.fade(2.0).a, 255);
        assert_eq!(Color::WHITE.fade(-1.0).a, 0);
    }

    #[test]
    fn as_f32_normalizes() {
        let [r, g, b, a] = Color::WHITE.as_f32();
        assert_eq!((r, g, b, a), (1.0, 1.0, 1.0, 1.0));
        let [r, ..] = Color::BLACK.as_f32();
        assert_eq!(r, 0.0);
    }
}
