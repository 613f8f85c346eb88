//! Event model and the shared event queue
//!
//! Events are produced by the backend and consumed through one process-wide FIFO
//! queue. Windows pull from the same queue when they reconcile their cached state
//! (see [`crate::window::Window::poll`]); events that belong to another window are
//! handed back to the caller untouched.
//!
//! Only the fields the core consumes are modeled here. Every event carries enough
//! data to be routed to a window by id and to be mapped into render coordinates.

pub mod queue;

pub use queue::EventQueue;

/// Numeric event type, ordered so that ranges can be queried
///
/// The discriminants follow the native backend's numbering, which groups related
/// events into contiguous blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum EventType {
    /// Lower bound of every range
    First = 0,
    /// Application quit requested
    Quit = 0x100,
    /// Window became visible
    WindowShown = 0x202,
    /// Window was hidden
    WindowHidden = 0x203,
    /// Window was exposed and should be redrawn
    WindowExposed = 0x204,
    /// Window moved
    WindowMoved = 0x205,
    /// Window client area resized
    WindowResized = 0x206,
    /// Window pixel size changed
    WindowPixelSizeChanged = 0x207,
    /// Window minimized
    WindowMinimized = 0x209,
    /// Window maximized
    WindowMaximized = 0x20A,
    /// Window restored to normal size and position
    WindowRestored = 0x20B,
    /// Mouse entered the window
    WindowMouseEnter = 0x20C,
    /// Mouse left the window
    WindowMouseLeave = 0x20D,
    /// Window gained keyboard focus
    WindowFocusGained = 0x20E,
    /// Window lost keyboard focus
    WindowFocusLost = 0x20F,
    /// Window manager requested the window be closed
    WindowCloseRequested = 0x210,
    /// Window is fully covered by other windows
    WindowOccluded = 0x216,
    /// Window entered fullscreen
    WindowEnterFullscreen = 0x217,
    /// Window left fullscreen
    WindowLeaveFullscreen = 0x218,
    /// Key pressed
    KeyDown = 0x300,
    /// Key released
    KeyUp = 0x301,
    /// Mouse moved
    MouseMotion = 0x400,
    /// Mouse button pressed
    MouseButtonDown = 0x401,
    /// Mouse button released
    MouseButtonUp = 0x402,
    /// Mouse wheel scrolled
    MouseWheel = 0x403,
    /// Application defined event
    User = 0x8000,
    /// Upper bound of every range
    Last = 0xFFFF,
}

/// State change reported for a single window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// Window became visible
    Shown,
    /// Window was hidden
    Hidden,
    /// Window was exposed and should be redrawn
    Exposed,
    /// Window is fully covered by other windows
    Occluded,
    /// Window moved to a new position
    Moved {
        /// New x position
        x: i32,
        /// New y position
        y: i32,
    },
    /// Client area resized
    Resized {
        /// New width in screen coordinates
        width: i32,
        /// New height in screen coordinates
        height: i32,
    },
    /// Pixel size of the client area changed
    PixelSizeChanged {
        /// New width in pixels
        width: i32,
        /// New height in pixels
        height: i32,
    },
    /// Window minimized
    Minimized,
    /// Window maximized
    Maximized,
    /// Window restored
    Restored,
    /// Mouse entered the window
    MouseEnter,
    /// Mouse left the window
    MouseLeave,
    /// Keyboard focus gained
    FocusGained,
    /// Keyboard focus lost
    FocusLost,
    /// Close requested by the window manager
    CloseRequested,
    /// Entered fullscreen
    EnterFullscreen,
    /// Left fullscreen
    LeaveFullscreen,
}

impl WindowEvent {
    /// The numeric type of this window event
    pub const fn event_type(self) -> EventType {
        match self {
            Self::Shown => EventType::WindowShown,
            Self::Hidden => EventType::WindowHidden,
            Self::Exposed => EventType::WindowExposed,
            Self::Occluded => EventType::WindowOccluded,
            Self::Moved { .. } => EventType::WindowMoved,
            Self::Resized { .. } => EventType::WindowResized,
            Self::PixelSizeChanged { .. } => EventType::WindowPixelSizeChanged,
            Self::Minimized => EventType::WindowMinimized,
            Self::Maximized => EventType::WindowMaximized,
            Self::Restored => EventType::WindowRestored,
            Self::MouseEnter => EventType::WindowMouseEnter,
            Self::MouseLeave => EventType::WindowMouseLeave,
            Self::FocusGained => EventType::WindowFocusGained,
            Self::FocusLost => EventType::WindowFocusLost,
            Self::CloseRequested => EventType::WindowCloseRequested,
            Self::EnterFullscreen => EventType::WindowEnterFullscreen,
            Self::LeaveFullscreen => EventType::WindowLeaveFullscreen,
        }
    }
}

/// Virtual key code as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Return
    pub const RETURN: Self = Self(0x0D);
    /// Escape
    pub const ESCAPE: Self = Self(0x1B);
    /// Space
    pub const SPACE: Self = Self(0x20);
    /// Right arrow
    pub const RIGHT: Self = Self(0x4000_004F);
    /// Left arrow
    pub const LEFT: Self = Self(0x4000_0050);
    /// Down arrow
    pub const DOWN: Self = Self(0x4000_0051);
    /// Up arrow
    pub const UP: Self = Self(0x4000_0052);

    /// Key producing an ASCII character; letters map to their lowercase code
    pub const fn character(c: char) -> Self {
        Self(c.to_ascii_lowercase() as u32)
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Middle mouse button
    Middle,
    /// Right mouse button
    Right,
    /// First extra button
    X1,
    /// Second extra button
    X2,
}

/// One record pulled from the event queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Application quit requested
    Quit,
    /// Window state change
    Window {
        /// Id of the window the event belongs to
        window_id: u32,
        /// What changed
        event: WindowEvent,
    },
    /// Keyboard key pressed or released
    Key {
        /// Window with keyboard focus
        window_id: u32,
        /// Virtual key code
        key: KeyCode,
        /// Pressed (true) or released (false)
        down: bool,
        /// Key repeat
        repeat: bool,
    },
    /// Mouse moved
    MouseMotion {
        /// Window with mouse focus
        window_id: u32,
        /// X position relative to the window
        x: f32,
        /// Y position relative to the window
        y: f32,
        /// Relative motion in x
        dx: f32,
        /// Relative motion in y
        dy: f32,
    },
    /// Mouse button pressed or released
    MouseButton {
        /// Window with mouse focus
        window_id: u32,
        /// Which button
        button: MouseButton,
        /// Pressed (true) or released (false)
        down: bool,
        /// Click count
        clicks: u8,
        /// X position relative to the window
        x: f32,
        /// Y position relative to the window
        y: f32,
    },
    /// Mouse wheel scrolled
    MouseWheel {
        /// Window with mouse focus
        window_id: u32,
        /// Horizontal scroll amount
        dx: f32,
        /// Vertical scroll amount
        dy: f32,
        /// Mouse x position relative to the window
        x: f32,
        /// Mouse y position relative to the window
        y: f32,
    },
    /// Application defined event
    User {
        /// Target window, 0 for none
        window_id: u32,
        /// Application defined code
        code: i32,
    },
}

impl Event {
    /// The numeric type of this event
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Quit => EventType::Quit,
            Self::Window { event, .. } => event.event_type(),
            Self::Key { down: true, .. } => EventType::KeyDown,
            Self::Key { down: false, .. } => EventType::KeyUp,
            Self::MouseMotion { .. } => EventType::MouseMotion,
            Self::MouseButton { down: true, .. } => EventType::MouseButtonDown,
            Self::MouseButton { down: false, .. } => EventType::MouseButtonUp,
            Self::MouseWheel { .. } => EventType::MouseWheel,
            Self::User { .. } => EventType::User,
        }
    }

    /// Id of the window this event is routed to, if any
    pub const fn window_id(&self) -> Option<u32> {
        match *self {
            Self::Quit => None,
            Self::Window { window_id, .. }
            | Self::Key { window_id, .. }
            | Self::MouseMotion { window_id, .. }
            | Self::MouseButton { window_id, .. }
            | Self::MouseWheel { window_id, .. }
            | Self::User { window_id, .. } => Some(window_id),
        }
    }

    /// Whether this is a key press of `key`
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        matches!(*self, Self::Key { key: k, down: true, .. } if k == key)
    }

    /// Whether this is a key release of `key`
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        matches!(*self, Self::Key { key: k, down: false, .. } if k == key)
    }

    /// Whether this is a press of `button`
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        matches!(*self, Self::MouseButton { button: b, down: true, .. } if b == button)
    }

    /// Whether this is a release of `button`
    pub fn is_mouse_button_up(&self, button: MouseButton) -> bool {
        matches!(*self, Self::MouseButton { button: b, down: false, .. } if b == button)
    }

    /// Whether the user asked to quit: a quit event, a window close request or Escape
    pub fn requests_quit(&self) -> bool {
        self.requests_quit_with(KeyCode::ESCAPE)
    }

    /// Like [`Event::requests_quit`], with `key` as the quit key
    pub fn requests_quit_with(&self, key: KeyCode) -> bool {
        self.is_key_down(key)
            || matches!(
                self,
                Self::Quit
                    | Self::Window {
                        event: WindowEvent::CloseRequested,
                        ..
                    }
            )
    }

    /// Pointer position carried by mouse events
    pub fn pointer_position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::MouseMotion { x, y, .. }
            | Self::MouseButton { x, y, .. }
            | Self::MouseWheel { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// Replace the pointer position of a mouse event; other events are left untouched
    pub fn set_pointer_position(&mut self, new_x: f32, new_y: f32) {
        match self {
            Self::MouseMotion { x, y, .. }
            | Self::MouseButton { x, y, .. }
            | Self::MouseWheel { x, y, .. } => {
                *x = new_x;
                *y = new_y;
            }
            _ => {}
        }
    }
}
