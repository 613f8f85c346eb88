//! Vertex layout submitted to the renderer's geometry call

use super::color::Color;
use super::math::Vec2;

/// A single vertex: position in render coordinates, color, texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in render coordinates
    pub position: Vec2,
    /// Vertex color
    pub color: Color,
    /// Normalized texture coordinate (unused without a texture)
    pub tex_coord: Vec2,
}

impl Vertex {
    /// Create a colored vertex at a position
    pub fn new(position: Vec2, color: Color) -> Self {
        Self {
            position,
            color,
            tex_coord: Vec2::zeros(),
        }
    }

    /// Create a vertex at the origin with the given color
    pub fn with_color(color: Color) -> Self {
        Self::new(Vec2::zeros(), color)
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vec2::zeros(), Color::WHITE)
    }
}
