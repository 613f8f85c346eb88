//! Reference-counted subsystem bring-up and teardown
//!
//! The [`SubsystemManager`] is the only owner of the set of active capabilities.
//! Every [`SubsystemManager::init`] call takes the manager lock for the whole
//! check-then-init-then-count sequence, so independent components can request
//! overlapping capability sets from different threads without racing on native
//! initialization.
//!
//! Each successful `init` returns a [`Subsystems`] guard. Dropping the guard is the
//! matching release. When the last guard goes away every active capability is
//! shut down and the backend is told to quit.
//!
//! ```no_run
//! use casement::prelude::*;
//! use std::sync::Arc;
//!
//! let manager = SubsystemManager::new(Arc::new(HeadlessBackend::new()));
//! let session = manager.init(Capabilities::VIDEO, None)?;
//! assert!(session.has(Capabilities::VIDEO));
//! drop(session); // teardown happens here
//! # Ok::<(), casement::Error>(())
//! ```

use super::metadata::AppMetadata;
use crate::backend::Backend;
use crate::error::{take_last_error, Error, Result};
use bitflags::bitflags;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

bitflags! {
    /// Backend feature areas that must be initialized before use
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Timers
        const TIMER = 0x0000_0001;
        /// Audio output
        const AUDIO = 0x0000_0010;
        /// Windows and rendering
        const VIDEO = 0x0000_0020;
        /// Joysticks
        const JOYSTICK = 0x0000_0200;
        /// Force feedback
        const HAPTIC = 0x0000_1000;
        /// Gamepads
        const GAMEPAD = 0x0000_2000;
        /// Event queue
        const EVENTS = 0x0000_4000;
        /// Sensors
        const SENSOR = 0x0000_8000;
        /// Cameras
        const CAMERA = 0x0001_0000;
    }
}

/// Decoded backend library version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    /// Major version
    pub major: i32,
    /// Minor version
    pub minor: i32,
    /// Patch level
    pub patch: i32,
}

impl Version {
    /// Decode `major * 1_000_000 + minor * 1_000 + patch`
    pub const fn from_packed(packed: i32) -> Self {
        Self {
            major: packed / 1_000_000,
            minor: (packed / 1_000) % 1_000,
            patch: packed % 1_000,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

struct Registry {
    ref_count: usize,
}

/// Process-scoped service owning the active capability set
pub struct SubsystemManager {
    backend: Arc<dyn Backend>,
    registry: Mutex<Registry>,
    active: AtomicU32,
}

static GLOBAL: OnceLock<Arc<SubsystemManager>> = OnceLock::new();

impl SubsystemManager {
    /// Create a manager driving `backend`
    ///
    /// Most applications want exactly one manager per process; see [`SubsystemManager::install`].
    pub fn new(backend: Arc<dyn Backend>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            registry: Mutex::new(Registry { ref_count: 0 }),
            active: AtomicU32::new(0),
        })
    }

    /// Install the process-wide manager, or return the one already installed
    pub fn install(backend: Arc<dyn Backend>) -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Self::new(backend)))
    }

    /// The process-wide manager, if one was installed
    pub fn global() -> Option<Arc<Self>> {
        GLOBAL.get().cloned()
    }

    /// Initialize `capabilities` and acquire a session
    ///
    /// Metadata, when given, is applied on every call (last writer wins). Each
    /// requested capability that is not yet active is initialized on its own; one
    /// that is already active costs nothing but the reference count. The reference
    /// count grows by one per successful call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendInit`] for the first capability that fails to come up.
    /// Capabilities newly initialized by the same call are shut down again, so the
    /// call leaves no partial state. Capabilities that were active before the call are
    /// untouched. A failing metadata property gives [`Error::Backend`].
    pub fn init(self: &Arc<Self>, capabilities: Capabilities, metadata: Option<&AppMetadata>) -> Result<Subsystems> {
        let mut registry = self.registry.lock();

        if let Some(metadata) = metadata {
            metadata.apply(self.backend.as_ref())?;
        }

        self.init_each(capabilities)?;

        registry.ref_count += 1;
        log::debug!("Subsystem reference count is now {}", registry.ref_count);
        if registry.ref_count == 1 {
            log::info!("Subsystems initialized: {:?}", self.active());
        }

        Ok(Subsystems {
            manager: Arc::clone(self),
        })
    }

    /// Initialize additional capabilities on an already initialized manager
    ///
    /// Already active capabilities are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before the first `init`, [`Error::BackendInit`] if the
    /// backend refuses a capability.
    pub fn init_subsystem(&self, capabilities: Capabilities) -> Result<()> {
        let registry = self.registry.lock();
        if registry.ref_count == 0 {
            return Err(Error::NotInitialized);
        }
        self.init_each(capabilities)
    }

    /// Shut down individual capabilities without releasing the session
    ///
    /// Inactive capabilities are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before the first `init`.
    pub fn quit_subsystem(&self, capabilities: Capabilities) -> Result<()> {
        let registry = self.registry.lock();
        if registry.ref_count == 0 {
            return Err(Error::NotInitialized);
        }

        let to_quit = capabilities & self.active();
        if !to_quit.is_empty() {
            self.backend.quit_subsystem(to_quit);
            self.active.fetch_and(!to_quit.bits(), Ordering::AcqRel);
            log::info!("Subsystems shut down: {:?}", to_quit);
        }
        Ok(())
    }

    /// Whether every flag of `capabilities` is active
    ///
    /// Lock-free.
    pub fn has(&self, capabilities: Capabilities) -> bool {
        self.active().contains(capabilities)
    }

    /// The active capability set
    pub fn active(&self) -> Capabilities {
        Capabilities::from_bits_truncate(self.active.load(Ordering::Acquire))
    }

    /// Number of outstanding sessions
    pub fn ref_count(&self) -> usize {
        self.registry.lock().ref_count
    }

    /// The backend this manager drives
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    fn init_each(&self, capabilities: Capabilities) -> Result<()> {
        let mut started = Capabilities::empty();

        for capability in capabilities.iter() {
            if self.has(capability) {
                continue;
            }

            if !self.backend.init_subsystem(capability) {
                let message = take_last_error(self.backend.as_ref());
                if !started.is_empty() {
                    self.backend.quit_subsystem(started);
                    self.active.fetch_and(!started.bits(), Ordering::AcqRel);
                }
                return Err(Error::BackendInit {
                    capabilities: capability,
                    message,
                });
            }

            self.active.fetch_or(capability.bits(), Ordering::AcqRel);
            started |= capability;
        }

        if !started.is_empty() {
            log::debug!("Started capabilities {:?}", started);
        }
        Ok(())
    }

    fn retain(&self) {
        let mut registry = self.registry.lock();
        registry.ref_count += 1;
        log::debug!("Subsystem reference count is now {}", registry.ref_count);
    }

    fn release(&self) {
        let mut registry = self.registry.lock();
        registry.ref_count = registry.ref_count.saturating_sub(1);
        log::debug!("Subsystem reference count is now {}", registry.ref_count);

        if registry.ref_count > 0 {
            return;
        }

        let active = self.active();
        if !active.is_empty() {
            self.backend.quit_subsystem(active);
        }
        self.backend.quit();
        self.active.store(0, Ordering::Release);
        log::info!("Subsystems shut down");
    }
}

impl fmt::Debug for SubsystemManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsystemManager")
            .field("active", &self.active())
            .field("ref_count", &self.ref_count())
            .finish_non_exhaustive()
    }
}

/// One acquisition of the subsystem manager
///
/// Dropping the guard releases the acquisition. The last release shuts every
/// active capability down.
#[must_use = "dropping the session releases the subsystems immediately"]
pub struct Subsystems {
    manager: Arc<SubsystemManager>,
}

impl Subsystems {
    /// Release this acquisition explicitly
    pub fn dispose(self) {
        drop(self);
    }

    /// Whether every flag of `capabilities` is active
    pub fn has(&self, capabilities: Capabilities) -> bool {
        self.manager.has(capabilities)
    }

    /// The manager this session was acquired from
    pub fn manager(&self) -> &Arc<SubsystemManager> {
        &self.manager
    }

    /// The backend shared by every object created from this session
    pub fn backend(&self) -> Arc<dyn Backend> {
        self.manager.backend()
    }

    /// Version of the backend library
    pub fn version(&self) -> Version {
        Version::from_packed(self.manager.backend.version())
    }

    /// Time since the backend was initialized
    pub fn ticks(&self) -> Duration {
        Duration::from_millis(self.manager.backend.ticks())
    }
}

impl Clone for Subsystems {
    /// Acquire one more reference on the same manager
    fn clone(&self) -> Self {
        self.manager.retain();
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl Drop for Subsystems {
    fn drop(&mut self) {
        self.manager.release();
    }
}

impl fmt::Debug for Subsystems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subsystems").field("manager", &self.manager).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;

    fn manager() -> (Arc<HeadlessBackend>, Arc<SubsystemManager>) {
        let backend = Arc::new(HeadlessBackend::new());
        let manager = SubsystemManager::new(backend.clone());
        (backend, manager)
    }

    #[test]
    fn test_repeat_init_does_not_reinitialize() {
        let (backend, manager) = manager();

        let first = manager.init(Capabilities::VIDEO, None).unwrap();
        let second = manager.init(Capabilities::VIDEO, None).unwrap();

        assert_eq!(backend.init_count(Capabilities::VIDEO), 1);
        assert_eq!(manager.ref_count(), 2);
        drop(first);
        drop(second);
    }

    #[test]
    fn test_teardown_after_last_release() {
        let (backend, manager) = manager();

        let sessions: Vec<_> = (0..3)
            .map(|_| manager.init(Capabilities::VIDEO | Capabilities::EVENTS, None).unwrap())
            .collect();

        let mut sessions = sessions.into_iter();
        sessions.next().unwrap().dispose();
        sessions.next().unwrap().dispose();
        assert_eq!(backend.call_count("quit"), 0);
        assert!(manager.has(Capabilities::VIDEO));

        sessions.next().unwrap().dispose();
        assert_eq!(backend.call_count("quit"), 1);
        assert_eq!(manager.active(), Capabilities::empty());
        assert_eq!(manager.ref_count(), 0);
    }

    #[test]
    fn test_failed_init_rolls_back_new_capabilities() {
        let (backend, manager) = manager();
        let _video = manager.init(Capabilities::VIDEO, None).unwrap();

        backend.fail_capability(Capabilities::AUDIO, "no audio device");
        let err = manager
            .init(Capabilities::TIMER | Capabilities::AUDIO | Capabilities::VIDEO, None)
            .unwrap_err();

        assert_eq!(
            err,
            Error::BackendInit {
                capabilities: Capabilities::AUDIO,
                message: "no audio device".to_string()
            }
        );
        assert!(manager.has(Capabilities::VIDEO));
        assert!(!manager.has(Capabilities::TIMER));
        assert!(!manager.has(Capabilities::AUDIO));
        assert_eq!(manager.ref_count(), 1);
    }

    #[test]
    fn test_subsystem_calls_require_init() {
        let (_backend, manager) = manager();
        assert_eq!(manager.init_subsystem(Capabilities::AUDIO), Err(Error::NotInitialized));
        assert_eq!(manager.quit_subsystem(Capabilities::AUDIO), Err(Error::NotInitialized));
    }

    #[test]
    fn test_subsystem_calls_are_idempotent() {
        let (backend, manager) = manager();
        let _session = manager.init(Capabilities::VIDEO, None).unwrap();

        manager.init_subsystem(Capabilities::AUDIO).unwrap();
        manager.init_subsystem(Capabilities::AUDIO).unwrap();
        assert_eq!(backend.init_count(Capabilities::AUDIO), 1);

        manager.quit_subsystem(Capabilities::AUDIO).unwrap();
        manager.quit_subsystem(Capabilities::AUDIO).unwrap();
        assert_eq!(backend.call_count("quit-subsystem"), 1);
        assert!(!manager.has(Capabilities::AUDIO));
        assert!(manager.has(Capabilities::VIDEO));
    }

    #[test]
    fn test_clone_acquires_a_reference() {
        let (backend, manager) = manager();
        let session = manager.init(Capabilities::VIDEO, None).unwrap();
        let copy = session.clone();

        assert_eq!(manager.ref_count(), 2);
        session.dispose();
        assert_eq!(backend.call_count("quit"), 0);
        copy.dispose();
        assert_eq!(backend.call_count("quit"), 1);
    }

    #[test]
    fn test_version_decoding() {
        let version = Version::from_packed(3_002_010);
        assert_eq!(
            version,
            Version {
                major: 3,
                minor: 2,
                patch: 10
            }
        );
        assert_eq!(version.to_string(), "3.2.10");
    }

    #[test]
    fn test_metadata_applied_per_call() {
        let (backend, manager) = manager();
        let metadata = AppMetadata {
            name: "Demo".to_string(),
            ..AppMetadata::default()
        };

        let _a = manager.init(Capabilities::VIDEO, Some(&metadata)).unwrap();
        let renamed = AppMetadata {
            name: "Renamed".to_string(),
            ..AppMetadata::default()
        };
        let _b = manager.init(Capabilities::VIDEO, Some(&renamed)).unwrap();

        assert_eq!(backend.metadata("app.metadata.name").as_deref(), Some("Renamed"));
        assert_eq!(backend.call_count("set-metadata"), 2);
    }
}
