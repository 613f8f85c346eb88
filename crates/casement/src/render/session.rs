//! A renderer bound to one window
//!
//! A [`RenderSession`] owns its [`Window`] and the renderer created for it. The
//! renderer is always destroyed before the window.
//!
//! ```text
//!   RenderSession::new(window)
//!     create-renderer ─► set-vsync ─► set-logical-presentation
//!
//!   per frame
//!     clear(color) ─► draw(...)* ─► present()
//!
//!   dispose / drop
//!     destroy-renderer ─► destroy-window
//! ```

use super::presentation::{Presentation, VSync};
use super::state::RenderState;
use super::RenderTarget;
use crate::backend::{Backend, HandleKind, RawHandle, ResourceHandle};
use crate::core::config::RendererConfig;
use crate::error::{ensure, Error, Result};
use crate::events::Event;
use crate::foundation::color::Color;
use crate::foundation::math::{Rect, Vec2};
use crate::foundation::vertex::Vertex;
use crate::window::Window;
use std::cell::OnceCell;
use std::sync::Arc;

/// A window plus the renderer drawing into it
pub struct RenderSession {
    renderer: ResourceHandle,
    window: Window,
    vsync: VSync,
    presentation: Presentation,
    driver_name: OnceCell<Option<String>>,
}

impl RenderSession {
    /// Bind a renderer to `window` with default settings
    ///
    /// # Errors
    ///
    /// [`Error::HandleCreation`] if the backend cannot create a renderer for the
    /// window. The window is destroyed in that case.
    pub fn new(window: Window) -> Result<Self> {
        Self::with_settings(window, None, VSync::DISABLED, Presentation::disabled())
    }

    /// Bind a renderer to `window`
    ///
    /// `driver` selects a render driver by name; `None` picks the first available.
    /// The vsync interval and presentation are applied right after creation.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for an invalid presentation, [`Error::HandleCreation`]
    /// if the renderer cannot be created, [`Error::Backend`] if the initial settings
    /// are rejected.
    pub fn with_settings(
        window: Window,
        driver: Option<&str>,
        vsync: VSync,
        presentation: Presentation,
    ) -> Result<Self> {
        presentation.validate()?;
        let backend = Arc::clone(window.backend());

        let raw = backend.create_renderer(window.raw_handle(), driver);
        if raw.is_null() {
            return Err(Error::handle_creation("renderer", backend.as_ref()));
        }
        let session = Self {
            renderer: ResourceHandle::new(Arc::clone(&backend), HandleKind::Renderer, raw),
            window,
            vsync,
            presentation,
            driver_name: OnceCell::new(),
        };

        ensure(backend.as_ref(), backend.set_render_vsync(raw, vsync.interval()))?;
        ensure(
            backend.as_ref(),
            backend.set_render_logical_presentation(raw, presentation.width, presentation.height, presentation.mode),
        )?;

        log::info!(
            "Created renderer for window {} (vsync {}, presentation {:?})",
            session.window.id(),
            vsync.interval(),
            presentation.mode
        );
        Ok(session)
    }

    /// Bind a renderer configured by `config`
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for out of range values, otherwise see
    /// [`RenderSession::with_settings`].
    pub fn from_config(window: Window, config: &RendererConfig) -> Result<Self> {
        let vsync = VSync::new(config.vsync)?;
        Self::with_settings(window, config.driver.as_deref(), vsync, config.presentation)
    }

    fn backend(&self) -> &dyn Backend {
        self.window.backend().as_ref()
    }

    /// The window being rendered to
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Mutable access to the window, for events and window properties
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    /// The native renderer handle, for read-only use by collaborators
    pub fn raw_handle(&self) -> RawHandle {
        self.renderer.raw()
    }

    /// Whether the renderer is still alive
    pub fn is_valid(&self) -> bool {
        !self.renderer.is_invalid()
    }

    // ------------------------------------------------------------ settings

    /// Current vsync interval
    pub fn vsync(&self) -> VSync {
        self.vsync
    }

    /// Change the vsync interval; a no-op when unchanged
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for intervals below `-1`, [`Error::Backend`] if the
    /// backend rejects the interval.
    pub fn set_vsync(&mut self, interval: i32) -> Result<()> {
        let vsync = VSync::new(interval)?;
        if vsync == self.vsync {
            return Ok(());
        }
        self.vsync = vsync;
        if !self.is_valid() {
            return Ok(());
        }
        ensure(
            self.backend(),
            self.backend().set_render_vsync(self.renderer.raw(), interval),
        )
    }

    /// Current logical presentation
    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    /// Change the logical presentation
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative size or an enabled mode without a
    /// size, [`Error::Backend`] on failure.
    pub fn set_presentation(&mut self, presentation: Presentation) -> Result<()> {
        presentation.validate()?;
        self.presentation = presentation;
        if !self.is_valid() {
            return Ok(());
        }
        ensure(
            self.backend(),
            self.backend().set_render_logical_presentation(
                self.renderer.raw(),
                presentation.width,
                presentation.height,
                presentation.mode,
            ),
        )
    }

    // ------------------------------------------------------------- drawing

    /// Fill the whole target with `color`
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if setting the draw color or clearing fails.
    pub fn clear(&mut self, color: Color) -> Result<()> {
        let raw = self.renderer.raw();
        ensure(self.backend(), self.backend().set_render_draw_color(raw, color))?;
        ensure(self.backend(), self.backend().render_clear(raw))
    }

    /// Draw triangles
    ///
    /// `state` is merged onto the renderer first; unset fields keep their last
    /// value. An empty `indices` slice draws `vertices` as a plain triangle list.
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if a state setter or the draw fails, for example when an
    /// index is out of range.
    pub fn draw(&mut self, vertices: &[Vertex], indices: &[i32], state: Option<&RenderState>) -> Result<()> {
        let raw = self.renderer.raw();
        if let Some(state) = state {
            state.apply(self.backend(), raw)?;
        }
        ensure(self.backend(), self.backend().render_geometry(raw, vertices, indices))
    }

    /// Show everything drawn since the last present
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn present(&mut self) -> Result<()> {
        ensure(self.backend(), self.backend().render_present(self.renderer.raw()))
    }

    // ------------------------------------------------------------- mapping

    /// Convert a point in window coordinates to render coordinates
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer cannot map the point.
    pub fn map_pixels_to_coordinates(&self, point: Vec2) -> Result<Vec2> {
        self.backend()
            .render_coordinates_from_window(self.renderer.raw(), point.x, point.y)
            .map(|(x, y)| Vec2::new(x, y))
            .ok_or_else(|| Error::from_backend(self.backend()))
    }

    /// Convert a point in render coordinates to window coordinates
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer cannot map the point.
    pub fn map_coordinates_to_pixels(&self, point: Vec2) -> Result<Vec2> {
        self.backend()
            .render_coordinates_to_window(self.renderer.raw(), point.x, point.y)
            .map(|(x, y)| Vec2::new(x, y))
            .ok_or_else(|| Error::from_backend(self.backend()))
    }

    /// Rewrite the pointer position of `event` into render coordinates
    ///
    /// Events without a pointer position are left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer is invalid.
    pub fn map_event_to_coordinates(&self, event: &mut Event) -> Result<()> {
        ensure(
            self.backend(),
            self.backend()
                .convert_event_to_render_coordinates(self.renderer.raw(), event),
        )
    }

    // ------------------------------------------------------------- queries

    /// Output size in pixels
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer is invalid.
    pub fn output_size(&self) -> Result<(i32, i32)> {
        self.backend()
            .render_output_size(self.renderer.raw())
            .ok_or_else(|| Error::from_backend(self.backend()))
    }

    /// Size of the current target, the logical size when a presentation is active
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer is invalid.
    pub fn current_output_size(&self) -> Result<(i32, i32)> {
        self.backend()
            .current_render_output_size(self.renderer.raw())
            .ok_or_else(|| Error::from_backend(self.backend()))
    }

    /// Area of the output the logical presentation is drawn into, in pixels
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the renderer is invalid.
    pub fn presentation_rect(&self) -> Result<Rect> {
        self.backend()
            .render_logical_presentation_rect(self.renderer.raw())
            .ok_or_else(|| Error::from_backend(self.backend()))
    }

    /// Name of the render driver in use
    ///
    /// Queried once and cached.
    pub fn driver_name(&self) -> Option<&str> {
        self.driver_name
            .get_or_init(|| self.backend().renderer_name(self.renderer.raw()))
            .as_deref()
    }

    /// Names of every render driver the backend offers
    pub fn drivers(&self) -> Vec<String> {
        self.backend().render_drivers()
    }

    // ----------------------------------------------------------- lifecycle

    /// Close the window; the renderer stays alive until disposal
    pub fn close(&mut self) {
        self.window.close();
    }

    /// Destroy the renderer, then the window
    ///
    /// Idempotent. Dropping the session has the same effect.
    pub fn dispose(&mut self) {
        if self.is_valid() {
            log::info!("Destroying renderer for window {}", self.window.id());
        }
        self.renderer.release();
        self.window.dispose();
    }
}

impl RenderTarget for RenderSession {
    fn clear(&mut self, color: Color) -> Result<()> {
        RenderSession::clear(self, color)
    }

    fn draw_geometry(&mut self, vertices: &[Vertex], indices: &[i32], state: Option<&RenderState>) -> Result<()> {
        self.draw(vertices, indices, state)
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for RenderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("renderer", &self.renderer)
            .field("window", &self.window)
            .field("vsync", &self.vsync)
            .field("presentation", &self.presentation)
            .finish()
    }
}
