//! Exclusively owned native handles
//!
//! A [`ResourceHandle`] wraps one native window or renderer reference and
//! guarantees the matching destroy call is issued exactly once: either through
//! [`ResourceHandle::release`] or when the handle is dropped. The type is
//! deliberately not `Clone`; collaborators that need the native value borrow it
//! through [`ResourceHandle::raw`].

use super::{Backend, RawHandle};
use std::fmt;
use std::sync::Arc;

/// Which destroy primitive releases the handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Released with `destroy_window`
    Window,
    /// Released with `destroy_renderer`
    Renderer,
}

/// Native reference with single-shot release
pub struct ResourceHandle {
    raw: RawHandle,
    kind: HandleKind,
    backend: Arc<dyn Backend>,
}

impl ResourceHandle {
    /// Take ownership of a native reference
    ///
    /// A [`RawHandle::NULL`] value produces an already invalid handle.
    pub fn new(backend: Arc<dyn Backend>, kind: HandleKind, raw: RawHandle) -> Self {
        Self { raw, kind, backend }
    }

    /// An invalid handle that owns nothing
    pub fn invalid(backend: Arc<dyn Backend>, kind: HandleKind) -> Self {
        Self::new(backend, kind, RawHandle::NULL)
    }

    /// Whether the handle holds the invalid sentinel
    pub fn is_invalid(&self) -> bool {
        self.raw.is_null()
    }

    /// The native value, for read-only use by collaborators
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    /// The kind of native object
    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Destroy the native object if it is still valid
    ///
    /// Idempotent: after the first call the handle is invalid and further calls do nothing.
    pub fn release(&mut self) {
        if self.raw.is_null() {
            return;
        }

        match self.kind {
            HandleKind::Window => self.backend.destroy_window(self.raw),
            HandleKind::Renderer => self.backend.destroy_renderer(self.raw),
        }
        log::debug!("Released {:?} handle {:#x}", self.kind, self.raw.get());

        self.raw = RawHandle::NULL;
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("raw", &self.raw)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::window::WindowFlags;

    #[test]
    fn test_release_is_single_shot() {
        let backend = Arc::new(HeadlessBackend::new());
        let raw = backend.create_window("t", 10, 10, WindowFlags::empty());
        let mut handle = ResourceHandle::new(backend.clone(), HandleKind::Window, raw);

        assert!(!handle.is_invalid());
        handle.release();
        handle.release();
        drop(handle);

        assert!(handle_is_gone(&backend, raw));
        assert_eq!(backend.call_count("destroy-window"), 1);
    }

    #[test]
    fn test_drop_releases() {
        let backend = Arc::new(HeadlessBackend::new());
        let raw = backend.create_window("t", 10, 10, WindowFlags::empty());
        drop(ResourceHandle::new(backend.clone(), HandleKind::Window, raw));
        assert_eq!(backend.call_count("destroy-window"), 1);
        assert_eq!(backend.window_count(), 0);
    }

    #[test]
    fn test_invalid_handle_never_destroys() {
        let backend = Arc::new(HeadlessBackend::new());
        let handle = ResourceHandle::invalid(backend.clone(), HandleKind::Renderer);
        assert!(handle.is_invalid());
        drop(handle);
        assert_eq!(backend.call_count("destroy-renderer"), 0);
    }

    fn handle_is_gone(backend: &HeadlessBackend, raw: RawHandle) -> bool {
        backend.window_id(raw) == 0
    }
}
