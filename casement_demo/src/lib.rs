//! Shared setup for the demo applications
//!
//! Every demo runs on the in-memory backend for a bounded number of frames, so
//! they finish on their own on machines without a display.

use casement::config::ConfigError;
use casement::prelude::*;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Frames a demo renders before it stops by itself
pub const FRAME_LIMIT: u64 = 300;

/// Errors a demo can stop with
#[derive(Error, Debug)]
pub enum DemoError {
    /// Windowing or rendering failure
    #[error("casement error: {0}")]
    Casement(#[from] casement::Error),

    /// Configuration file could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Load the configuration named on the command line, or `fallback` without one
///
/// # Errors
///
/// [`DemoError::Config`] if the file cannot be read or parsed.
pub fn load_config(fallback: ApplicationConfig) -> Result<ApplicationConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            Ok(ApplicationConfig::load_from_file(Path::new(&path))?)
        }
        None => Ok(fallback),
    }
}

/// Bring up video and events on a fresh headless backend
///
/// # Errors
///
/// [`DemoError::Casement`] if a capability fails to initialize.
pub fn start(config: &ApplicationConfig) -> Result<(Arc<HeadlessBackend>, Subsystems), DemoError> {
    let backend = Arc::new(HeadlessBackend::new());
    let manager = SubsystemManager::install(backend.clone());
    let subsystems = manager.init(Capabilities::VIDEO | Capabilities::EVENTS, Some(&config.metadata))?;
    log::info!(
        "Backend version {}, video driver {:?}",
        subsystems.version(),
        backend.current_video_driver()
    );
    Ok((backend, subsystems))
}

/// Drain pending events, returning true once a quit was requested
pub fn drain_events(window: &mut Window) -> bool {
    let mut quit = false;
    while let Some(event) = window.poll() {
        log::trace!("Event {:?}", event.event_type());
        quit |= event.requests_quit();
    }
    quit
}

/// Queue a close request for `window` once the frame limit is reached
pub fn request_close_at_limit(queue: &EventQueue, window: &Window, clock: &FrameClock) {
    if clock.frames() + 1 == FRAME_LIMIT {
        queue.push(Event::Window {
            window_id: window.id(),
            event: WindowEvent::CloseRequested,
        });
    }
}

/// A key press or release for `window_id`
pub const fn key_event(window_id: u32, key: KeyCode, down: bool) -> Event {
    Event::Key {
        window_id,
        key,
        down,
        repeat: false,
    }
}
