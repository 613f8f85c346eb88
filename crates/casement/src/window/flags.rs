//! Window property bitmask

use bitflags::bitflags;

bitflags! {
    /// Boolean window properties
    ///
    /// Values match the native backend's numbering so the mask can be passed to
    /// window creation unchanged.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u64 {
        /// Fullscreen
        const FULLSCREEN = 0x0000_0001;
        /// Fully covered by other windows
        const OCCLUDED = 0x0000_0004;
        /// Not visible
        const HIDDEN = 0x0000_0008;
        /// No decorations
        const BORDERLESS = 0x0000_0010;
        /// User resizable
        const RESIZABLE = 0x0000_0020;
        /// Minimized
        const MINIMIZED = 0x0000_0040;
        /// Maximized
        const MAXIMIZED = 0x0000_0080;
        /// Mouse confined to the window
        const MOUSE_GRABBED = 0x0000_0100;
        /// Has keyboard focus
        const INPUT_FOCUS = 0x0000_0200;
        /// Has mouse focus
        const MOUSE_FOCUS = 0x0000_0400;
        /// Created outside of this library
        const EXTERNAL = 0x0000_0800;
        /// High pixel density back buffer
        const HIGH_PIXEL_DENSITY = 0x0000_2000;
        /// Mouse captured
        const MOUSE_CAPTURE = 0x0000_4000;
        /// Relative mouse mode
        const MOUSE_RELATIVE_MODE = 0x0000_8000;
        /// Above all other windows
        const ALWAYS_ON_TOP = 0x0001_0000;
        /// Keyboard grabbed
        const KEYBOARD_GRABBED = 0x0010_0000;
        /// Cannot take input focus
        const NOT_FOCUSABLE = 0x8000_0000;
    }
}

impl WindowFlags {
    /// Flags an application may request when the window is created
    ///
    /// The rest are reported by the window manager.
    pub const REQUESTABLE: Self = Self::FULLSCREEN
        .union(Self::HIDDEN)
        .union(Self::BORDERLESS)
        .union(Self::RESIZABLE)
        .union(Self::MINIMIZED)
        .union(Self::MAXIMIZED)
        .union(Self::MOUSE_GRABBED)
        .union(Self::KEYBOARD_GRABBED)
        .union(Self::ALWAYS_ON_TOP)
        .union(Self::HIGH_PIXEL_DENSITY)
        .union(Self::NOT_FOCUSABLE);
}
