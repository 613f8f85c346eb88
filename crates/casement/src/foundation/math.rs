//! Math utilities and types
//!
//! Provides the small set of 2D math types used by windows, renderers and shapes.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D integer vector type (window positions, sizes)
pub type Vec2i = Vector2<i32>;

/// Axis-aligned rectangle with floating point coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }
}

/// Axis-aligned rectangle with integer coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RectInt {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl RectInt {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Whether the rectangle has no area
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Whether the point lies inside the rectangle (right and bottom edges excluded)
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

impl From<RectInt> for Rect {
    #[allow(clippy::cast_precision_loss)]
    fn from(r: RectInt) -> Self {
        Self::new(r.x as f32, r.y as f32, r.w as f32, r.h as f32)
    }
}
