//! Display related value types

use serde::{Deserialize, Serialize};

/// Pixel layout of a window surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Unknown or not yet queried
    #[default]
    Unknown,
    /// 32-bit packed RGBA
    Rgba8888,
    /// 32-bit packed ARGB
    Argb8888,
    /// 32-bit packed XRGB
    Xrgb8888,
    /// 32-bit packed BGRA
    Bgra8888,
}

/// A fullscreen display mode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayMode {
    /// Display the mode belongs to
    pub display_id: u32,
    /// Pixel format of the mode
    pub format: PixelFormat,
    /// Width in screen coordinates
    pub width: i32,
    /// Height in screen coordinates
    pub height: i32,
    /// Scale converting screen coordinates to pixels
    pub pixel_density: f32,
    /// Refresh rate in Hz, 0.0 when unspecified
    pub refresh_rate: f32,
}
