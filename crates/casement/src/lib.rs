//! # Casement
//!
//! Windows and 2D rendering sessions on top of a native windowing backend.
//!
//! ## Features
//!
//! - **Subsystem lifecycle**: reference counted, thread-safe capability initialization
//! - **Windows**: cached properties, buffered configuration before creation, state
//!   reconciled from the event queue
//! - **Rendering**: clear/draw/present, per-draw state merging, logical presentation
//!   and coordinate mapping
//! - **Shapes**: geometry rebuilt lazily when attributes change
//! - **Headless backend**: an in-memory backend for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use casement::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> casement::Result<()> {
//!     let manager = SubsystemManager::new(Arc::new(HeadlessBackend::new()));
//!     let subsystems = manager.init(Capabilities::VIDEO, None)?;
//!
//!     let window = Window::open(&subsystems, "Demo", 640, 480, WindowFlags::RESIZABLE)?;
//!     let mut session = RenderSession::new(window)?;
//!
//!     while let Some(event) = session.window_mut().poll() {
//!         if event.requests_quit() {
//!             return Ok(());
//!         }
//!     }
//!     session.clear(Color::BLACK)?;
//!     session.present()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod backend;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod foundation;
pub mod render;
pub mod system;
pub mod window;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        backend::{Backend, HeadlessBackend, ResourceHandle},
        config::Config,
        core::{
            config::{ApplicationConfig, RendererConfig, WindowConfig},
            metadata::AppMetadata,
            subsystems::{Capabilities, SubsystemManager, Subsystems},
        },
        events::{Event, EventQueue, EventType, KeyCode, MouseButton, WindowEvent},
        foundation::{
            color::Color,
            math::{Rect, RectInt, Vec2, Vec2i},
            time::FrameClock,
            vertex::Vertex,
        },
        render::{
            BlendFactor, BlendFunction, BlendMode, BlendOperation, ClipRegion, Drawable, LogicalPresentation,
            Presentation, RenderSession, RenderState, RenderTarget, Shape, VSync,
        },
        system::System,
        window::{Window, WindowFlags},
        Error, Result,
    };
}
