//! Per-draw renderer settings
//!
//! A [`RenderState`] lists the settings a draw wants changed. Fields left unset
//! keep whatever the renderer last used, so partial states accumulate across
//! draws:
//!
//! ```text
//! draw(a, blend = Add)          renderer: blend Add, scale 1.0
//! draw(b, scale = 2.0)          renderer: blend Add, scale 2.0
//! draw(c, none)                 renderer: blend Add, scale 2.0
//! ```

use crate::backend::{Backend, RawHandle};
use crate::error::{ensure, ensure_finite_non_negative, Error, Result};
use crate::foundation::math::{RectInt, Vec2};
use serde::{Deserialize, Serialize};

/// How drawn pixels combine with the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Overwrite the destination
    #[default]
    None,
    /// Alpha blending
    Blend,
    /// Alpha blending with premultiplied source
    BlendPremultiplied,
    /// Additive
    Add,
    /// Additive with premultiplied source
    AddPremultiplied,
    /// Color modulate
    Mod,
    /// Color multiply
    Mul,
    /// Backend code returned by [`BlendFunction::compose`]
    Custom(u32),
}

/// Multiplier applied to a source or destination term of a blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    /// `0, 0, 0, 0`
    Zero = 1,
    /// `1, 1, 1, 1`
    One = 2,
    /// `srcR, srcG, srcB, srcA`
    SrcColor = 3,
    /// `1 - srcR, 1 - srcG, 1 - srcB, 1 - srcA`
    OneMinusSrcColor = 4,
    /// `srcA, srcA, srcA, srcA`
    SrcAlpha = 5,
    /// `1 - srcA` for every channel
    OneMinusSrcAlpha = 6,
    /// `dstR, dstG, dstB, dstA`
    DstColor = 7,
    /// `1 - dstR, 1 - dstG, 1 - dstB, 1 - dstA`
    OneMinusDstColor = 8,
    /// `dstA, dstA, dstA, dstA`
    DstAlpha = 9,
    /// `1 - dstA` for every channel
    OneMinusDstAlpha = 10,
}

/// How the weighted source and destination terms are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendOperation {
    /// `dst + src`
    Add = 1,
    /// `src - dst`
    Subtract = 2,
    /// `dst - src`
    ReverseSubtract = 3,
    /// `min(dst, src)`
    Minimum = 4,
    /// `max(dst, src)`
    Maximum = 5,
}

/// A full blend equation, separately for color and alpha channels
///
/// ```text
/// color = color_operation(src.rgb * src_color, dst.rgb * dst_color)
/// alpha = alpha_operation(src.a * src_alpha, dst.a * dst_alpha)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendFunction {
    /// Source color factor
    pub src_color: BlendFactor,
    /// Destination color factor
    pub dst_color: BlendFactor,
    /// Color operation
    pub color_operation: BlendOperation,
    /// Source alpha factor
    pub src_alpha: BlendFactor,
    /// Destination alpha factor
    pub dst_alpha: BlendFactor,
    /// Alpha operation
    pub alpha_operation: BlendOperation,
}

impl BlendFunction {
    /// Register the equation with the backend and get a mode usable in a [`RenderState`]
    ///
    /// Not every render driver supports every combination. An unsupported mode is
    /// reported when a draw tries to use it.
    ///
    /// # Errors
    ///
    /// [`crate::Error::Backend`] if the backend cannot express the equation.
    pub fn compose(&self, backend: &dyn Backend) -> Result<BlendMode> {
        let code = backend.compose_custom_blend_mode(self);
        if code == 0 {
            return Err(Error::from_backend(backend));
        }
        log::debug!("Composed blend mode {code:#x} from {self:?}");
        Ok(BlendMode::Custom(code))
    }
}

/// Clipping applied to draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipRegion {
    /// Draw everywhere
    Disabled,
    /// Draw only inside the rectangle, in render coordinates
    Rect(RectInt),
}

impl ClipRegion {
    fn as_rect(self) -> Option<RectInt> {
        match self {
            Self::Disabled => None,
            Self::Rect(rect) => Some(rect),
        }
    }
}

/// Optional settings merged onto the renderer before a draw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    blend_mode: Option<BlendMode>,
    scale: Option<Vec2>,
    color_scale: Option<f32>,
    clip: Option<ClipRegion>,
}

impl RenderState {
    /// A state that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `mode` for this and later draws
    #[must_use]
    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = Some(mode);
        self
    }

    /// Scale render coordinates
    #[must_use]
    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.scale = Some(Vec2::new(x, y));
        self
    }

    /// Multiply vertex colors by `scale`
    ///
    /// # Errors
    ///
    /// [`crate::Error::ArgumentRange`] for a negative or non-finite scale.
    pub fn with_color_scale(mut self, scale: f32) -> Result<Self> {
        ensure_finite_non_negative("color_scale", scale)?;
        self.color_scale = Some(scale);
        Ok(self)
    }

    /// Restrict drawing
    #[must_use]
    pub fn with_clip(mut self, clip: ClipRegion) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Requested blend mode
    pub fn blend_mode(&self) -> Option<BlendMode> {
        self.blend_mode
    }

    /// Requested coordinate scale
    pub fn scale(&self) -> Option<Vec2> {
        self.scale
    }

    /// Requested color scale
    pub fn color_scale(&self) -> Option<f32> {
        self.color_scale
    }

    /// Requested clip region
    pub fn clip(&self) -> Option<ClipRegion> {
        self.clip
    }

    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self.blend_mode.is_none() && self.scale.is_none() && self.color_scale.is_none() && self.clip.is_none()
    }

    /// Push the set fields to the renderer in a fixed order: blend, scale, color scale, clip
    pub(crate) fn apply(&self, backend: &dyn Backend, renderer: RawHandle) -> Result<()> {
        if let Some(mode) = self.blend_mode {
            ensure(backend, backend.set_render_draw_blend_mode(renderer, mode))?;
        }
        if let Some(scale) = self.scale {
            ensure(backend, backend.set_render_scale(renderer, scale.x, scale.y))?;
        }
        if let Some(scale) = self.color_scale {
            ensure(backend, backend.set_render_color_scale(renderer, scale))?;
        }
        if let Some(clip) = self.clip {
            ensure(backend, backend.set_render_clip_rect(renderer, clip.as_rect()))?;
        }
        log::trace!("Applied render state {self:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::window::WindowFlags;

    fn renderer(backend: &HeadlessBackend) -> RawHandle {
        let window = backend.create_window("t", 100, 100, WindowFlags::empty());
        let renderer = backend.create_renderer(window, None);
        backend.clear_calls();
        renderer
    }

    #[test]
    fn test_empty_state_makes_no_calls() {
        let backend = HeadlessBackend::new();
        let renderer = renderer(&backend);

        let state = RenderState::new();
        assert!(state.is_empty());
        state.apply(&backend, renderer).unwrap();
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_apply_order_and_values() {
        let backend = HeadlessBackend::new();
        let renderer = renderer(&backend);

        let state = RenderState::new()
            .with_clip(ClipRegion::Rect(RectInt::new(0, 0, 10, 10)))
            .with_color_scale(0.5)
            .unwrap()
            .with_scale(2.0, 3.0)
            .with_blend_mode(BlendMode::Add);
        state.apply(&backend, renderer).unwrap();

        assert_eq!(
            backend.calls(),
            vec!["set-blend-mode", "set-scale", "set-color-scale", "set-clip-rect"]
        );
        let snapshot = backend.renderer_snapshot(renderer).unwrap();
        assert_eq!(snapshot.blend_mode, BlendMode::Add);
        assert_eq!(snapshot.scale, (2.0, 3.0));
        assert_eq!(snapshot.clip, Some(RectInt::new(0, 0, 10, 10)));
    }

    #[test]
    fn test_disabled_clip_clears_rect() {
        let backend = HeadlessBackend::new();
        let renderer = renderer(&backend);

        RenderState::new()
            .with_clip(ClipRegion::Rect(RectInt::new(1, 1, 5, 5)))
            .apply(&backend, renderer)
            .unwrap();
        RenderState::new()
            .with_clip(ClipRegion::Disabled)
            .apply(&backend, renderer)
            .unwrap();
        assert_eq!(backend.renderer_snapshot(renderer).unwrap().clip, None);
    }

    #[test]
    fn test_negative_color_scale_rejected() {
        assert!(RenderState::new().with_color_scale(-1.0).is_err());
        assert!(RenderState::new().with_color_scale(f32::NAN).is_err());
    }

    #[test]
    fn test_composed_mode_reaches_renderer() {
        let backend = HeadlessBackend::new();
        let renderer = renderer(&backend);

        let subtract = BlendFunction {
            src_color: BlendFactor::One,
            dst_color: BlendFactor::One,
            color_operation: BlendOperation::ReverseSubtract,
            src_alpha: BlendFactor::Zero,
            dst_alpha: BlendFactor::One,
            alpha_operation: BlendOperation::Add,
        };
        let mode = subtract.compose(&backend).unwrap();
        assert!(matches!(mode, BlendMode::Custom(code) if code != 0));

        RenderState::new().with_blend_mode(mode).apply(&backend, renderer).unwrap();
        assert_eq!(backend.calls(), vec!["compose-blend-mode", "set-blend-mode"]);
        assert_eq!(backend.renderer_snapshot(renderer).unwrap().blend_mode, mode);
    }

    #[test]
    fn test_compose_failure_is_reported() {
        let backend = HeadlessBackend::new();
        backend.fail_next("compose-blend-mode", "Unsupported blend equation");

        let function = BlendFunction {
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::OneMinusSrcAlpha,
            color_operation: BlendOperation::Add,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            alpha_operation: BlendOperation::Maximum,
        };
        assert_eq!(
            function.compose(&backend).unwrap_err(),
            Error::Backend("Unsupported blend equation".to_string())
        );
    }

    #[test]
    fn test_unknown_custom_mode_is_rejected() {
        let backend = HeadlessBackend::new();
        let renderer = renderer(&backend);

        let result = RenderState::new()
            .with_blend_mode(BlendMode::Custom(0xFFFF_FFFF))
            .apply(&backend, renderer);
        assert!(result.is_err());
        assert_eq!(backend.renderer_snapshot(renderer).unwrap().blend_mode, BlendMode::None);
    }
}
