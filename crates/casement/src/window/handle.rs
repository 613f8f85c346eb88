//! The window entity
//!
//! A window is created either empty ([`Window::new`], creation deferred to
//! [`Window::create`]) or immediately ([`Window::open`]). While it has no native
//! handle every setter only updates the cache; attributes that cannot be passed to
//! window creation are buffered and replayed right after the handle exists.
//!
//! Setter contract, in order:
//!
//! 1. validate the argument, failing with [`Error::ArgumentRange`] before any mutation
//! 2. update the cached value
//! 3. return if the window is not open
//! 4. call the backend, failing with [`Error::Backend`]
//!
//! After a backend failure the cache already holds the new value. Re-read the state
//! through the backend queries or the event stream to recover.

use super::pending::PendingConfig;
use super::{BordersSize, FlashOperation, WindowFlags};
use crate::backend::{Backend, HandleKind, RawHandle, ResourceHandle};
use crate::core::config::WindowConfig;
use crate::core::subsystems::Subsystems;
use crate::error::{
    ensure, ensure_finite_non_negative, ensure_non_negative, ensure_positive, ensure_within, Error, Result,
};
use crate::events::{Event, WindowEvent};
use crate::foundation::display::{DisplayMode, PixelFormat};
use crate::foundation::math::{RectInt, Vec2i};
use std::sync::Arc;
use std::time::Duration;

type FlagSetter = fn(&dyn Backend, RawHandle, bool) -> bool;

/// A native window with cached state
pub struct Window {
    backend: Arc<dyn Backend>,
    handle: ResourceHandle,
    id: u32,
    title: String,
    position: Vec2i,
    width: i32,
    height: i32,
    pixel_width: i32,
    pixel_height: i32,
    flags: WindowFlags,
    open: bool,
    closed: bool,
    opacity: f32,
    aspect_ratio: (f32, f32),
    min_size: (i32, i32),
    max_size: (i32, i32),
    fullscreen_mode: Option<DisplayMode>,
    mouse_clip: Option<RectInt>,
    pending: PendingConfig,
}

impl Window {
    /// Create an empty window; the native window is made by [`Window::create`]
    ///
    /// The video capability must already be initialized.
    pub fn new(subsystems: &Subsystems) -> Self {
        let backend = subsystems.backend();
        Self {
            handle: ResourceHandle::invalid(Arc::clone(&backend), HandleKind::Window),
            backend,
            id: 0,
            title: String::new(),
            position: Vec2i::zeros(),
            width: 0,
            height: 0,
            pixel_width: 0,
            pixel_height: 0,
            flags: WindowFlags::empty(),
            open: false,
            closed: false,
            opacity: 1.0,
            aspect_ratio: (0.0, 0.0),
            min_size: (0, 0),
            max_size: (0, 0),
            fullscreen_mode: None,
            mouse_clip: None,
            pending: PendingConfig::default(),
        }
    }

    /// Create and open a window in one step
    ///
    /// # Errors
    ///
    /// See [`Window::create`].
    pub fn open(subsystems: &Subsystems, title: &str, width: i32, height: i32, flags: WindowFlags) -> Result<Self> {
        let mut window = Self::new(subsystems);
        window.create(title, width, height, flags)?;
        Ok(window)
    }

    /// Create and open a window from a configuration record
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for out of range values, otherwise see [`Window::create`].
    pub fn from_config(subsystems: &Subsystems, config: &WindowConfig) -> Result<Self> {
        let mut window = Self::new(subsystems);
        window.set_opacity(config.opacity)?;
        if let Some((width, height)) = config.min_size {
            window.set_min_size(width, height)?;
        }
        if let Some((width, height)) = config.max_size {
            window.set_max_size(width, height)?;
        }
        window.create(&config.title, config.width, config.height, config.flags())?;
        Ok(window)
    }

    /// Create the native window and replay buffered configuration
    ///
    /// Requestable flags set on the empty window are merged into `flags`. A no-op if
    /// the window already has a handle or was closed.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a non-positive size, [`Error::HandleCreation`] when
    /// the backend returns an invalid handle or a zero id, [`Error::Backend`] when a
    /// buffered attribute fails to apply.
    pub fn create(&mut self, title: &str, width: i32, height: i32, flags: WindowFlags) -> Result<()> {
        if !self.handle.is_invalid() || self.closed {
            return Ok(());
        }
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;

        let flags = flags | (self.flags & WindowFlags::REQUESTABLE);
        let raw = self.backend.create_window(title, width, height, flags);
        if raw.is_null() {
            return Err(Error::handle_creation("window", self.backend.as_ref()));
        }
        let handle = ResourceHandle::new(Arc::clone(&self.backend), HandleKind::Window, raw);

        let id = self.backend.window_id(raw);
        if id == 0 {
            return Err(Error::handle_creation("window", self.backend.as_ref()));
        }

        // Dropping `handle` on failure destroys the native window; the buffered
        // configuration stays in place for the next attempt.
        let position = match self.pending.position {
            Some(position) => {
                ensure(
                    self.backend.as_ref(),
                    self.backend.set_window_position(raw, position.x, position.y),
                )?;
                position
            }
            None => self
                .backend
                .window_position(raw)
                .map_or(self.position, |(x, y)| Vec2i::new(x, y)),
        };
        self.pending.replay(self.backend.as_ref(), raw)?;
        self.pending = PendingConfig::default();

        self.handle = handle;
        self.position = position;
        self.id = id;
        self.title = title.to_string();
        self.width = width;
        self.height = height;
        self.flags = flags;
        (self.pixel_width, self.pixel_height) = self.backend.window_size_in_pixels(raw).unwrap_or((width, height));
        self.open = true;
        log::info!("Created window {} '{}' ({}x{})", self.id, self.title, width, height);
        Ok(())
    }

    /// Close the window
    ///
    /// The native window stays alive until the window is disposed or dropped. A
    /// closed window cannot be opened again.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.open = false;
        self.closed = true;
        log::info!("Closed window {}", self.id);
    }

    /// Destroy the native window
    ///
    /// Idempotent. Dropping the window has the same effect.
    pub fn dispose(&mut self) {
        self.open = false;
        self.closed = true;
        self.handle.release();
    }

    /// Whether the window has a native handle and was not closed
    pub fn is_open(&self) -> bool {
        self.open && !self.handle.is_invalid()
    }

    /// The native handle, for read-only use by collaborators
    pub fn raw_handle(&self) -> RawHandle {
        self.handle.raw()
    }

    /// The backend this window talks to
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    // ------------------------------------------------------------- events

    /// Pull one event from the shared queue, reconciling it if it belongs to this window
    ///
    /// Returns `None` without touching the queue when the window is not open.
    /// Events for other windows are returned untouched.
    pub fn poll(&mut self) -> Option<Event> {
        if !self.is_open() {
            return None;
        }
        let event = self.backend.poll_event()?;
        self.reconcile(&event);
        Some(event)
    }

    /// Wait for one event, reconciling it if it belongs to this window
    ///
    /// `None` waits indefinitely. The timeout is best effort.
    pub fn wait(&mut self, timeout: Option<Duration>) -> Option<Event> {
        if !self.is_open() {
            return None;
        }
        let event = self.backend.wait_event(timeout)?;
        self.reconcile(&event);
        Some(event)
    }

    fn reconcile(&mut self, event: &Event) {
        let Event::Window { window_id, event } = *event else {
            return;
        };
        if window_id != self.id {
            return;
        }
        log::trace!("Window {} reconciling {:?}", self.id, event);

        match event {
            WindowEvent::Exposed => self.flags.remove(WindowFlags::OCCLUDED),
            WindowEvent::Occluded => self.flags.insert(WindowFlags::OCCLUDED),
            WindowEvent::Resized { width, height } => {
                self.width = width;
                self.height = height;
            }
            WindowEvent::PixelSizeChanged { width, height } => {
                self.pixel_width = width;
                self.pixel_height = height;
            }
            WindowEvent::Moved { x, y } => self.position = Vec2i::new(x, y),
            WindowEvent::MouseEnter => self.flags.insert(WindowFlags::MOUSE_FOCUS),
            WindowEvent::MouseLeave => self.flags.remove(WindowFlags::MOUSE_FOCUS),
            WindowEvent::FocusGained => self.flags.insert(WindowFlags::INPUT_FOCUS),
            WindowEvent::FocusLost => self.flags.remove(WindowFlags::INPUT_FOCUS),
            WindowEvent::Restored => self.flags.remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED),
            WindowEvent::Minimized => {
                self.flags.remove(WindowFlags::MAXIMIZED);
                self.flags.insert(WindowFlags::MINIMIZED);
            }
            WindowEvent::Maximized => {
                self.flags.remove(WindowFlags::MINIMIZED);
                self.flags.insert(WindowFlags::MAXIMIZED);
            }
            WindowEvent::Shown => self.flags.remove(WindowFlags::HIDDEN),
            WindowEvent::Hidden => self.flags.insert(WindowFlags::HIDDEN),
            WindowEvent::EnterFullscreen => self.flags.insert(WindowFlags::FULLSCREEN),
            WindowEvent::LeaveFullscreen => self.flags.remove(WindowFlags::FULLSCREEN),
            WindowEvent::CloseRequested => {}
        }
    }

    // ---------------------------------------------------------- properties

    /// Backend-assigned id, 0 before creation
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend rejects the title.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.title = title.into();
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_title(self.handle.raw(), &self.title),
        )
    }

    /// Position of the top-left corner
    pub fn position(&self) -> Vec2i {
        self.position
    }

    /// Move the window; ignored while fullscreen or maximized
    ///
    /// Before creation the position is applied when the window is created.
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend rejects the move.
    pub fn set_position(&mut self, position: Vec2i) -> Result<()> {
        if self.is_fullscreen() || self.is_maximized() {
            return Ok(());
        }
        self.position = position;
        if !self.is_open() {
            self.pending.position = Some(position);
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_position(self.handle.raw(), position.x, position.y),
        )
    }

    /// Client area width in screen coordinates
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Client area height in screen coordinates
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Client area size in screen coordinates
    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Change the width; ignored while fullscreen or maximized
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a non-positive width, [`Error::Backend`] on failure.
    pub fn set_width(&mut self, width: i32) -> Result<()> {
        ensure_positive("width", width)?;
        if self.is_fullscreen() || self.is_maximized() {
            return Ok(());
        }
        self.width = width;
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_size(self.handle.raw(), width, self.height),
        )
    }

    /// Change the height; ignored while fullscreen or maximized
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a non-positive height, [`Error::Backend`] on failure.
    pub fn set_height(&mut self, height: i32) -> Result<()> {
        ensure_positive("height", height)?;
        if self.is_fullscreen() || self.is_maximized() {
            return Ok(());
        }
        self.height = height;
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_size(self.handle.raw(), self.width, height),
        )
    }

    /// Change the client area size; ignored while fullscreen or maximized
    ///
    /// The request may be applied asynchronously; the confirmed size arrives
    /// through a resize event.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a non-positive size, [`Error::Backend`] on failure.
    pub fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;
        if self.is_fullscreen() || self.is_maximized() {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_size(self.handle.raw(), width, height),
        )
    }

    /// Client area size in pixels
    pub fn pixel_size(&self) -> (i32, i32) {
        (self.pixel_width, self.pixel_height)
    }

    /// Current flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Opacity in `[0, 1]`
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Change the opacity
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] outside of `[0, 1]`, leaving the cached opacity
    /// untouched. [`Error::Backend`] on failure.
    pub fn set_opacity(&mut self, opacity: f32) -> Result<()> {
        ensure_within("opacity", opacity, 0.0, 1.0)?;
        self.opacity = opacity;
        if !self.is_open() {
            self.pending.opacity = Some(opacity);
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_opacity(self.handle.raw(), opacity),
        )
    }

    /// Aspect ratio bounds; 0.0 means unconstrained
    pub fn aspect_ratio(&self) -> (f32, f32) {
        self.aspect_ratio
    }

    /// Constrain the aspect ratio of the client area
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for negative bounds or `min > max` with a non-zero
    /// `max`. [`Error::Backend`] on failure.
    pub fn set_aspect_ratio(&mut self, min: f32, max: f32) -> Result<()> {
        ensure_finite_non_negative("min", min)?;
        ensure_finite_non_negative("max", max)?;
        if max > 0.0 && min > max {
            return Err(Error::ArgumentRange {
                name: "min",
                reason: format!("{min} is greater than {max}"),
            });
        }
        self.aspect_ratio = (min, max);
        if !self.is_open() {
            self.pending.aspect_ratio = Some((min, max));
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_aspect_ratio(self.handle.raw(), min, max),
        )
    }

    /// Minimum client area size; `(0, 0)` means unconstrained
    pub fn min_size(&self) -> (i32, i32) {
        self.min_size
    }

    /// Set the minimum client area size
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for negative values or values above a set maximum.
    /// [`Error::Backend`] on failure.
    pub fn set_min_size(&mut self, width: i32, height: i32) -> Result<()> {
        ensure_non_negative("width", width)?;
        ensure_non_negative("height", height)?;
        check_size_bounds((width, height), self.max_size)?;
        self.min_size = (width, height);
        if !self.is_open() {
            self.pending.min_size = Some((width, height));
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_minimum_size(self.handle.raw(), width, height),
        )
    }

    /// Maximum client area size; `(0, 0)` means unconstrained
    pub fn max_size(&self) -> (i32, i32) {
        self.max_size
    }

    /// Set the maximum client area size
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for negative values or values below the minimum.
    /// [`Error::Backend`] on failure.
    pub fn set_max_size(&mut self, width: i32, height: i32) -> Result<()> {
        ensure_non_negative("width", width)?;
        ensure_non_negative("height", height)?;
        check_size_bounds(self.min_size, (width, height))?;
        self.max_size = (width, height);
        if !self.is_open() {
            self.pending.max_size = Some((width, height));
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_maximum_size(self.handle.raw(), width, height),
        )
    }

    /// Exclusive fullscreen mode; `None` is borderless desktop fullscreen
    pub fn fullscreen_mode(&self) -> Option<DisplayMode> {
        self.fullscreen_mode
    }

    /// Select the fullscreen display mode
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend rejects the mode.
    pub fn set_fullscreen_mode(&mut self, mode: Option<DisplayMode>) -> Result<()> {
        self.fullscreen_mode = mode;
        if !self.is_open() {
            self.pending.fullscreen_mode = Some(mode);
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_fullscreen_mode(self.handle.raw(), mode.as_ref()),
        )
    }

    /// Rectangle the mouse is confined to
    pub fn mouse_clip(&self) -> Option<RectInt> {
        self.mouse_clip
    }

    /// Confine the mouse to `rect`, relative to the window; `None` releases it
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative size, [`Error::Backend`] on failure.
    pub fn set_mouse_clip(&mut self, rect: Option<RectInt>) -> Result<()> {
        if let Some(rect) = rect {
            ensure_non_negative("width", rect.w)?;
            ensure_non_negative("height", rect.h)?;
        }
        self.mouse_clip = rect;
        if !self.is_open() {
            self.pending.mouse_clip = Some(rect);
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.set_window_mouse_rect(self.handle.raw(), rect),
        )
    }

    fn set_flag(&mut self, flag: WindowFlags, value: bool, apply: FlagSetter) -> Result<()> {
        self.flags.set(flag, value);
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            apply(self.backend.as_ref(), self.handle.raw(), value),
        )
    }

    /// Whether the window is fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.flags.contains(WindowFlags::FULLSCREEN)
    }

    /// Enter or leave fullscreen
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_fullscreen(&mut self, fullscreen: bool) -> Result<()> {
        self.set_flag(WindowFlags::FULLSCREEN, fullscreen, |backend, window, value| {
            backend.set_window_fullscreen(window, value)
        })
    }

    /// Whether the window has no decorations
    pub fn is_borderless(&self) -> bool {
        self.flags.contains(WindowFlags::BORDERLESS)
    }

    /// Remove or restore decorations
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_borderless(&mut self, borderless: bool) -> Result<()> {
        self.set_flag(WindowFlags::BORDERLESS, borderless, |backend, window, value| {
            backend.set_window_bordered(window, !value)
        })
    }

    /// Whether the user may resize the window
    pub fn is_resizable(&self) -> bool {
        self.flags.contains(WindowFlags::RESIZABLE)
    }

    /// Allow or forbid user resizing
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_resizable(&mut self, resizable: bool) -> Result<()> {
        self.set_flag(WindowFlags::RESIZABLE, resizable, |backend, window, value| {
            backend.set_window_resizable(window, value)
        })
    }

    /// Whether the window stays above others
    pub fn is_always_on_top(&self) -> bool {
        self.flags.contains(WindowFlags::ALWAYS_ON_TOP)
    }

    /// Keep the window above others
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_always_on_top(&mut self, on_top: bool) -> Result<()> {
        self.set_flag(WindowFlags::ALWAYS_ON_TOP, on_top, |backend, window, value| {
            backend.set_window_always_on_top(window, value)
        })
    }

    /// Whether the window may take input focus
    pub fn is_focusable(&self) -> bool {
        !self.flags.contains(WindowFlags::NOT_FOCUSABLE)
    }

    /// Allow or forbid the window to take input focus
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_focusable(&mut self, focusable: bool) -> Result<()> {
        self.set_flag(WindowFlags::NOT_FOCUSABLE, !focusable, |backend, window, value| {
            backend.set_window_focusable(window, !value)
        })
    }

    /// Whether the keyboard is grabbed
    pub fn is_keyboard_grabbed(&self) -> bool {
        self.flags.contains(WindowFlags::KEYBOARD_GRABBED)
    }

    /// Grab or release the keyboard
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_keyboard_grab(&mut self, grabbed: bool) -> Result<()> {
        self.set_flag(WindowFlags::KEYBOARD_GRABBED, grabbed, |backend, window, value| {
            backend.set_window_keyboard_grab(window, value)
        })
    }

    /// Whether the mouse is grabbed
    pub fn is_mouse_grabbed(&self) -> bool {
        self.flags.contains(WindowFlags::MOUSE_GRABBED)
    }

    /// Grab or release the mouse
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn set_mouse_grab(&mut self, grabbed: bool) -> Result<()> {
        self.set_flag(WindowFlags::MOUSE_GRABBED, grabbed, |backend, window, value| {
            backend.set_window_mouse_grab(window, value)
        })
    }

    /// Whether the window is minimized
    pub fn is_minimized(&self) -> bool {
        self.flags.contains(WindowFlags::MINIMIZED)
    }

    /// Whether the window is maximized
    pub fn is_maximized(&self) -> bool {
        self.flags.contains(WindowFlags::MAXIMIZED)
    }

    /// Whether the window is hidden
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(WindowFlags::HIDDEN)
    }

    /// Whether the window is covered by other windows
    pub fn is_occluded(&self) -> bool {
        self.flags.contains(WindowFlags::OCCLUDED)
    }

    /// Whether the window has keyboard focus
    pub fn has_input_focus(&self) -> bool {
        self.flags.contains(WindowFlags::INPUT_FOCUS)
    }

    /// Whether the window has mouse focus
    pub fn has_mouse_focus(&self) -> bool {
        self.flags.contains(WindowFlags::MOUSE_FOCUS)
    }

    /// Whether the window uses a high pixel density back buffer
    pub fn is_high_pixel_density(&self) -> bool {
        self.flags.contains(WindowFlags::HIGH_PIXEL_DENSITY)
    }

    /// Whether the mouse is captured
    pub fn is_mouse_captured(&self) -> bool {
        self.flags.contains(WindowFlags::MOUSE_CAPTURE)
    }

    /// Whether relative mouse mode is on
    pub fn is_relative_mouse_mode(&self) -> bool {
        self.flags.contains(WindowFlags::MOUSE_RELATIVE_MODE)
    }

    // ------------------------------------------------------------- queries

    /// Size of the window decorations; zero when not open
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend cannot report the borders.
    pub fn borders_size(&self) -> Result<BordersSize> {
        if !self.is_open() {
            return Ok(BordersSize::default());
        }
        self.backend
            .window_borders_size(self.handle.raw())
            .ok_or_else(|| Error::from_backend(self.backend.as_ref()))
    }

    /// Content scale of the display; 0.0 when not open
    pub fn display_scale(&self) -> f32 {
        if !self.is_open() {
            return 0.0;
        }
        self.backend.window_display_scale(self.handle.raw())
    }

    /// Pixels per screen coordinate; 0.0 when not open
    pub fn pixel_density(&self) -> f32 {
        if !self.is_open() {
            return 0.0;
        }
        self.backend.window_pixel_density(self.handle.raw())
    }

    /// Pixel format of the surface; unknown when not open
    pub fn pixel_format(&self) -> PixelFormat {
        if !self.is_open() {
            return PixelFormat::Unknown;
        }
        self.backend.window_pixel_format(self.handle.raw())
    }

    /// Area not covered by notches or system UI; empty when not open
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend cannot report the area.
    pub fn safe_area(&self) -> Result<RectInt> {
        if !self.is_open() {
            return Ok(RectInt::default());
        }
        self.backend
            .window_safe_area(self.handle.raw())
            .ok_or_else(|| Error::from_backend(self.backend.as_ref()))
    }

    /// Id of the display the window is on; the primary display when not open
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] if the backend cannot tell.
    pub fn display(&self) -> Result<u32> {
        let id = if self.is_open() {
            self.backend.window_display(self.handle.raw())
        } else {
            self.backend.primary_display()
        };
        if id == 0 {
            return Err(Error::from_backend(self.backend.as_ref()));
        }
        Ok(id)
    }

    /// Whether the on-screen keyboard is shown; false when not open
    pub fn is_screen_keyboard_shown(&self) -> bool {
        self.is_open() && self.backend.screen_keyboard_shown(self.handle.raw())
    }

    /// Move the mouse cursor to a point inside the window
    pub fn warp_mouse(&self, x: f32, y: f32) {
        if self.is_open() {
            self.backend.warp_mouse_in_window(self.handle.raw(), x, y);
        }
    }

    // ------------------------------------------------------------- actions

    /// Show the window
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn show(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.show_window(self.handle.raw()))?;
        self.flags.remove(WindowFlags::HIDDEN);
        Ok(())
    }

    /// Hide the window
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn hide(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.hide_window(self.handle.raw()))?;
        self.flags.insert(WindowFlags::HIDDEN);
        Ok(())
    }

    /// Maximize the window
    ///
    /// A no-op if the window is already maximized or not resizable.
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn maximize(&mut self) -> Result<()> {
        if !self.is_open() || self.is_maximized() || !self.is_resizable() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.maximize_window(self.handle.raw()))?;
        self.flags.remove(WindowFlags::MINIMIZED);
        self.flags.insert(WindowFlags::MAXIMIZED);
        Ok(())
    }

    /// Minimize the window
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn minimize(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.minimize_window(self.handle.raw()))?;
        self.flags.remove(WindowFlags::MAXIMIZED);
        self.flags.insert(WindowFlags::MINIMIZED);
        Ok(())
    }

    /// Restore a minimized or maximized window
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn restore(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.restore_window(self.handle.raw()))?;
        self.flags.remove(WindowFlags::MINIMIZED | WindowFlags::MAXIMIZED);
        Ok(())
    }

    /// Raise the window and request input focus
    ///
    /// Subject to window manager policy.
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn raise(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.raise_window(self.handle.raw()))
    }

    /// Request user attention
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure.
    pub fn flash(&mut self, operation: FlashOperation) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(
            self.backend.as_ref(),
            self.backend.flash_window(self.handle.raw(), operation),
        )
    }

    /// Block until pending state requests are applied by the window manager
    ///
    /// # Errors
    ///
    /// [`Error::Backend`] on failure or timeout.
    pub fn sync(&mut self) -> Result<()> {
        if !self.is_open() {
            return Ok(());
        }
        ensure(self.backend.as_ref(), self.backend.sync_window(self.handle.raw()))
    }
}

fn check_size_bounds(min: (i32, i32), max: (i32, i32)) -> Result<()> {
    let width_ok = max.0 == 0 || min.0 <= max.0;
    let height_ok = max.1 == 0 || min.1 <= max.1;
    if width_ok && height_ok {
        return Ok(());
    }
    Err(Error::ArgumentRange {
        name: "size",
        reason: format!("minimum {}x{} exceeds maximum {}x{}", min.0, min.1, max.0, max.1),
    })
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("size", &(self.width, self.height))
            .field("flags", &self.flags)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}
