//! # Core Module
//!
//! Process-wide state and the records applications configure it with.
//!
//! ## Organization
//!
//! - **Subsystems**: reference-counted capability bring-up and teardown
//! - **Metadata**: application metadata reported to the backend
//! - **Config**: window and renderer configuration records

pub mod config;
pub mod metadata;
pub mod subsystems;

pub use config::{ApplicationConfig, Config, ConfigError, RendererConfig, WindowConfig};
pub use metadata::AppMetadata;
pub use subsystems::{Capabilities, SubsystemManager, Subsystems, Version};
