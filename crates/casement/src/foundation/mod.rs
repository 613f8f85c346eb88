//! Foundation module - Core value types and utilities
//!
//! This module provides the plain value types shared by every other module:
//! - 2D math types and rectangles
//! - Colors and vertices
//! - Display modes and pixel formats
//! - Frame timing
//! - Logging setup

pub mod color;
pub mod display;
pub mod logging;
pub mod math;
pub mod time;
pub mod vertex;
