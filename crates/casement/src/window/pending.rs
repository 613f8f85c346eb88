//! Configuration buffered before the native window exists

use crate::backend::{Backend, RawHandle};
use crate::error::{ensure, Result};
use crate::foundation::display::DisplayMode;
use crate::foundation::math::{RectInt, Vec2i};

/// Attributes set while the window had no handle
///
/// Each field is `Some` only when the matching setter ran before creation.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct PendingConfig {
    pub(crate) position: Option<Vec2i>,
    pub(crate) aspect_ratio: Option<(f32, f32)>,
    pub(crate) fullscreen_mode: Option<Option<DisplayMode>>,
    pub(crate) max_size: Option<(i32, i32)>,
    pub(crate) min_size: Option<(i32, i32)>,
    pub(crate) mouse_clip: Option<Option<RectInt>>,
    pub(crate) opacity: Option<f32>,
}

impl PendingConfig {
    /// Apply the buffered attributes to a freshly created window
    ///
    /// Order: aspect ratio, fullscreen mode, max size, min size, mouse clip, opacity.
    /// Position is handled by window creation itself.
    pub(crate) fn replay(&self, backend: &dyn Backend, window: RawHandle) -> Result<()> {
        if let Some((min, max)) = self.aspect_ratio {
            log::debug!("Replaying aspect ratio {min}..{max}");
            ensure(backend, backend.set_window_aspect_ratio(window, min, max))?;
        }
        if let Some(mode) = self.fullscreen_mode {
            log::debug!("Replaying fullscreen mode {mode:?}");
            ensure(backend, backend.set_window_fullscreen_mode(window, mode.as_ref()))?;
        }
        if let Some((width, height)) = self.max_size {
            log::debug!("Replaying maximum size {width}x{height}");
            ensure(backend, backend.set_window_maximum_size(window, width, height))?;
        }
        if let Some((width, height)) = self.min_size {
            log::debug!("Replaying minimum size {width}x{height}");
            ensure(backend, backend.set_window_minimum_size(window, width, height))?;
        }
        if let Some(rect) = self.mouse_clip {
            log::debug!("Replaying mouse clip {rect:?}");
            ensure(backend, backend.set_window_mouse_rect(window, rect))?;
        }
        if let Some(opacity) = self.opacity {
            log::debug!("Replaying opacity {opacity}");
            ensure(backend, backend.set_window_opacity(window, opacity))?;
        }
        Ok(())
    }
}
