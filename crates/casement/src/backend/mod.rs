//! Native backend contract
//!
//! This module defines the trait every native windowing + 2D rendering
//! library must implement to drive windows and renderers. The trait mirrors
//! the shape of a C windowing API: calls report success with a `bool` and the
//! diagnostic text is read back through [`Backend::last_error`]. The
//! higher-level types in this crate turn those flags into [`crate::Error`]s.
//!
//! # Module Organization
//!
//! - **`handle`**: exclusively owned native handle with single-shot release
//! - **`headless`**: in-memory backend used by tests and the demo applications
//!
//! # Threading
//!
//! Backends are shared behind an `Arc` by the subsystem manager, so they must be
//! `Send + Sync`. Window and renderer objects themselves are single-threaded.

pub mod handle;
pub mod headless;

pub use handle::{HandleKind, ResourceHandle};
pub use headless::HeadlessBackend;

use crate::core::subsystems::Capabilities;
use crate::events::{Event, EventType};
use crate::foundation::color::Color;
use crate::foundation::display::{DisplayMode, PixelFormat};
use crate::foundation::math::{Rect, RectInt};
use crate::foundation::vertex::Vertex;
use crate::render::presentation::LogicalPresentation;
use crate::render::state::{BlendFunction, BlendMode};
use crate::system::{PowerState, SystemTheme};
use crate::window::{BordersSize, FlashOperation, WindowFlags};
use std::time::Duration;

/// Pointer-sized reference to a native object
///
/// The value zero is the invalid sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawHandle(usize);

impl RawHandle {
    /// The invalid sentinel
    pub const NULL: Self = Self(0);

    /// Wrap a native pointer value
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// The native pointer value
    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether this is the invalid sentinel
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Operations the core consumes from the native windowing and rendering library
pub trait Backend: Send + Sync {
    // ---------------------------------------------------------------- system

    /// Bring up one or more capabilities
    fn init_subsystem(&self, capabilities: Capabilities) -> bool;

    /// Shut down one or more capabilities
    fn quit_subsystem(&self, capabilities: Capabilities);

    /// Release every remaining native resource
    fn quit(&self);

    /// Packed library version: `major * 1_000_000 + minor * 1_000 + patch`
    fn version(&self) -> i32;

    /// Milliseconds since the library was initialized
    fn ticks(&self) -> u64;

    /// Text of the last error raised on this thread
    fn last_error(&self) -> String;

    /// Clear the last error text
    fn clear_error(&self);

    /// Set one application metadata property
    fn set_app_metadata_property(&self, key: &str, value: &str) -> bool;

    // ---------------------------------------------------------------- window

    /// Create a window; returns [`RawHandle::NULL`] on failure
    fn create_window(&self, title: &str, width: i32, height: i32, flags: WindowFlags) -> RawHandle;

    /// Destroy a window
    fn destroy_window(&self, window: RawHandle);

    /// Numeric id of a window, 0 on failure
    fn window_id(&self, window: RawHandle) -> u32;

    /// Position of the window's top-left corner
    fn window_position(&self, window: RawHandle) -> Option<(i32, i32)>;

    /// Request a new window position
    fn set_window_position(&self, window: RawHandle, x: i32, y: i32) -> bool;

    /// Request a new client area size
    fn set_window_size(&self, window: RawHandle, width: i32, height: i32) -> bool;

    /// Client area size in pixels
    fn window_size_in_pixels(&self, window: RawHandle) -> Option<(i32, i32)>;

    /// Set the minimum client area size
    fn set_window_minimum_size(&self, window: RawHandle, width: i32, height: i32) -> bool;

    /// Set the maximum client area size
    fn set_window_maximum_size(&self, window: RawHandle, width: i32, height: i32) -> bool;

    /// Constrain the aspect ratio of the client area; 0.0 means unconstrained
    fn set_window_aspect_ratio(&self, window: RawHandle, min: f32, max: f32) -> bool;

    /// Enter or leave fullscreen
    fn set_window_fullscreen(&self, window: RawHandle, fullscreen: bool) -> bool;

    /// Select the exclusive fullscreen mode; `None` means borderless desktop fullscreen
    fn set_window_fullscreen_mode(&self, window: RawHandle, mode: Option<&DisplayMode>) -> bool;

    /// Add or remove window decorations
    fn set_window_bordered(&self, window: RawHandle, bordered: bool) -> bool;

    /// Allow or forbid user resizing
    fn set_window_resizable(&self, window: RawHandle, resizable: bool) -> bool;

    /// Keep the window above others
    fn set_window_always_on_top(&self, window: RawHandle, on_top: bool) -> bool;

    /// Allow or forbid the window to take input focus
    fn set_window_focusable(&self, window: RawHandle, focusable: bool) -> bool;

    /// Grab or release the keyboard
    fn set_window_keyboard_grab(&self, window: RawHandle, grabbed: bool) -> bool;

    /// Grab or release the mouse
    fn set_window_mouse_grab(&self, window: RawHandle, grabbed: bool) -> bool;

    /// Size of the window decorations
    fn window_borders_size(&self, window: RawHandle) -> Option<BordersSize>;

    /// Content scale of the display the window is on
    fn window_display_scale(&self, window: RawHandle) -> f32;

    /// Ratio of pixels to screen coordinates
    fn window_pixel_density(&self, window: RawHandle) -> f32;

    /// Pixel format of the window surface
    fn window_pixel_format(&self, window: RawHandle) -> PixelFormat;

    /// Area of the window that is not covered by notches or system UI
    fn window_safe_area(&self, window: RawHandle) -> Option<RectInt>;

    /// Id of the display holding the center of the window; 0 on failure
    fn window_display(&self, window: RawHandle) -> u32;

    /// Id of the primary display; 0 on failure
    fn primary_display(&self) -> u32;

    /// Whether the on-screen keyboard is shown for the window
    fn screen_keyboard_shown(&self, window: RawHandle) -> bool;

    /// Show the window
    fn show_window(&self, window: RawHandle) -> bool;

    /// Hide the window
    fn hide_window(&self, window: RawHandle) -> bool;

    /// Request maximization
    fn maximize_window(&self, window: RawHandle) -> bool;

    /// Request minimization
    fn minimize_window(&self, window: RawHandle) -> bool;

    /// Request restoration from minimized/maximized
    fn restore_window(&self, window: RawHandle) -> bool;

    /// Raise the window above others and request input focus
    fn raise_window(&self, window: RawHandle) -> bool;

    /// Request user attention
    fn flash_window(&self, window: RawHandle, operation: FlashOperation) -> bool;

    /// Block until pending window state requests are applied
    fn sync_window(&self, window: RawHandle) -> bool;

    /// Change the window title
    fn set_window_title(&self, window: RawHandle, title: &str) -> bool;

    /// Change the window opacity
    fn set_window_opacity(&self, window: RawHandle, opacity: f32) -> bool;

    /// Confine the mouse to a rectangle; `None` removes the confinement
    fn set_window_mouse_rect(&self, window: RawHandle, rect: Option<RectInt>) -> bool;

    /// Move the mouse cursor inside the window
    fn warp_mouse_in_window(&self, window: RawHandle, x: f32, y: f32);

    // ---------------------------------------------------------------- events

    /// Take the next event off the queue without blocking
    fn poll_event(&self) -> Option<Event>;

    /// Wait for the next event; `None` timeout waits indefinitely
    fn wait_event(&self, timeout: Option<Duration>) -> Option<Event>;

    /// Append an event; false if it was filtered or the queue is full
    fn push_event(&self, event: Event) -> bool;

    /// Copy up to `max` queued events within a type range without removing them
    fn peek_events(&self, max: usize, min_type: EventType, max_type: EventType) -> Vec<Event>;

    /// Remove up to `max` queued events within a type range
    fn retrieve_events(&self, max: usize, min_type: EventType, max_type: EventType) -> Vec<Event>;

    /// Drop every queued event within a type range
    fn flush_events(&self, min_type: EventType, max_type: EventType);

    /// Enable or disable delivery of an event type
    fn set_event_enabled(&self, event_type: EventType, enabled: bool);

    /// Whether an event type is being delivered
    fn event_enabled(&self, event_type: EventType) -> bool;

    /// Whether any queued event falls in a type range
    fn has_events(&self, min_type: EventType, max_type: EventType) -> bool;

    /// Gather pending input from devices into the queue
    fn pump_events(&self);

    // -------------------------------------------------------------- renderer

    /// Create a renderer bound to a window; returns [`RawHandle::NULL`] on failure
    fn create_renderer(&self, window: RawHandle, driver: Option<&str>) -> RawHandle;

    /// Destroy a renderer
    fn destroy_renderer(&self, renderer: RawHandle);

    /// True output size in pixels
    fn render_output_size(&self, renderer: RawHandle) -> Option<(i32, i32)>;

    /// Output size of the current target, honoring logical presentation
    fn current_render_output_size(&self, renderer: RawHandle) -> Option<(i32, i32)>;

    /// Set the device independent resolution
    fn set_render_logical_presentation(
        &self,
        renderer: RawHandle,
        width: i32,
        height: i32,
        mode: LogicalPresentation,
    ) -> bool;

    /// Final presentation rectangle in pixels
    fn render_logical_presentation_rect(&self, renderer: RawHandle) -> Option<Rect>;

    /// Set the vsync interval
    fn set_render_vsync(&self, renderer: RawHandle, interval: i32) -> bool;

    /// Set the color used by clear
    fn set_render_draw_color(&self, renderer: RawHandle, color: Color) -> bool;

    /// Clear the current target with the draw color
    fn render_clear(&self, renderer: RawHandle) -> bool;

    /// Draw a triangle list; empty `indices` means sequential vertices
    fn render_geometry(&self, renderer: RawHandle, vertices: &[Vertex], indices: &[i32]) -> bool;

    /// Make everything drawn since the last present visible
    fn render_present(&self, renderer: RawHandle) -> bool;

    /// Set the blend mode used by draw calls
    fn set_render_draw_blend_mode(&self, renderer: RawHandle, mode: BlendMode) -> bool;

    /// Encode a custom blend equation; 0 when the backend cannot express it
    fn compose_custom_blend_mode(&self, function: &BlendFunction) -> u32;

    /// Set the coordinate scale
    fn set_render_scale(&self, renderer: RawHandle, x: f32, y: f32) -> bool;

    /// Set the color scale
    fn set_render_color_scale(&self, renderer: RawHandle, scale: f32) -> bool;

    /// Set the clip rectangle; `None` disables clipping
    fn set_render_clip_rect(&self, renderer: RawHandle, rect: Option<RectInt>) -> bool;

    /// Window pixels to render coordinates
    fn render_coordinates_from_window(&self, renderer: RawHandle, x: f32, y: f32) -> Option<(f32, f32)>;

    /// Render coordinates to window pixels
    fn render_coordinates_to_window(&self, renderer: RawHandle, x: f32, y: f32) -> Option<(f32, f32)>;

    /// Rewrite the pointer coordinates of an event into render coordinates
    fn convert_event_to_render_coordinates(&self, renderer: RawHandle, event: &mut Event) -> bool;

    /// Name of the driver backing a renderer
    fn renderer_name(&self, renderer: RawHandle) -> Option<String>;

    /// Names of the built-in render drivers
    fn render_drivers(&self) -> Vec<String>;

    // ---------------------------------------------------------------- video

    /// Names of the compiled-in video drivers
    fn video_drivers(&self) -> Vec<String>;

    /// Name of the initialized video driver
    fn current_video_driver(&self) -> Option<String>;

    /// Power state with remaining seconds and percentage (-1 when unknown)
    fn power_info(&self) -> (PowerState, i32, i32);

    /// Current system theme
    fn system_theme(&self) -> SystemTheme;

    /// Whether the screen saver may run
    fn screen_saver_enabled(&self) -> bool;

    /// Enable or disable the screen saver
    fn set_screen_saver_enabled(&self, enabled: bool) -> bool;

    /// Open a URL in an external application
    fn open_url(&self, url: &str) -> bool;
}
