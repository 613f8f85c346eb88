//! RGBA colors

use serde::{Deserialize, Serialize};

/// 8-bit per channel RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Normalized `[r, g, b, a]` in `0.0..=1.0`
    pub fn to_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }

    /// Build a color from normalized channels, clamping out-of-range values
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(channel(r), channel(g), channel(b), channel(a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
