//! Window management
//!
//! A [`Window`] caches its properties locally and pushes changes to the backend
//! only while it is open. Two data paths write to the same cached fields:
//!
//! ```text
//!   setters / actions ──(request)──► backend
//!          │                            │
//!          ▼                            ▼ (window events, later)
//!     cached state ◄──(reconcile)── Window::poll / Window::wait
//! ```
//!
//! Setters only request state. The events pulled through [`Window::poll`] are
//! authoritative and overwrite whatever a setter cached: last writer wins by
//! call order.
//!
//! # Module Organization
//!
//! - **`handle`**: the [`Window`] type
//! - **`flags`**: [`WindowFlags`] bitmask
//! - **`pending`**: configuration buffered before the native window exists

pub mod flags;
pub mod handle;
mod pending;

pub use flags::WindowFlags;
pub use handle::Window;

/// How to request user attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlashOperation {
    /// Stop flashing
    Cancel,
    /// Flash once
    #[default]
    Briefly,
    /// Flash until the window gains focus
    UntilFocused,
}

/// Size of the decorations around a window's client area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BordersSize {
    /// Title bar height
    pub top: i32,
    /// Left border width
    pub left: i32,
    /// Bottom border height
    pub bottom: i32,
    /// Right border width
    pub right: i32,
}
