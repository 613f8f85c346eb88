//! Scenario tests spanning several modules
//!
//! Every scenario runs against [`crate::backend::HeadlessBackend`], which records
//! each native call by name.

mod lifecycle;
mod rendering;
mod window_state;

use crate::backend::HeadlessBackend;
use crate::core::subsystems::{Capabilities, SubsystemManager, Subsystems};
use std::sync::Arc;

/// A fresh backend with video initialized and the call log cleared
fn video_session() -> (Arc<HeadlessBackend>, Subsystems) {
    let backend = Arc::new(HeadlessBackend::new());
    let subsystems = SubsystemManager::new(backend.clone())
        .init(Capabilities::VIDEO, None)
        .expect("video init");
    backend.clear_calls();
    (backend, subsystems)
}
