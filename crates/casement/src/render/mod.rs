//! # Rendering
//!
//! 2D rendering on top of a window. A [`RenderSession`] binds one renderer to one
//! [`crate::window::Window`] and exposes the per-frame calls: clear, draw, present.
//!
//! ## Module Organization
//!
//! - **`session`**: [`RenderSession`], renderer lifetime and coordinate mapping
//! - **`state`**: [`RenderState`], optional settings merged onto the renderer per draw
//! - **`presentation`**: vsync and logical resolution
//! - **`shapes`**: [`Shape`], geometry rebuilt lazily when its attributes change
//!
//! ## Frame Structure
//!
//! ```text
//! session.clear(Color::BLACK)?;
//! shape.draw(&mut session)?;        // rebuilds geometry only if dirty
//! session.draw(&vertices, &[], None)?;
//! session.present()?;
//! ```

pub mod presentation;
pub mod session;
pub mod shapes;
pub mod state;

pub use presentation::{LogicalPresentation, Presentation, VSync};
pub use session::RenderSession;
pub use shapes::{tessellate, Drawable, Geometry, Shape, ShapeKind, ShapeStyle};
pub use state::{BlendFactor, BlendFunction, BlendMode, BlendOperation, ClipRegion, RenderState};

use crate::error::Result;
use crate::foundation::color::Color;
use crate::foundation::vertex::Vertex;

/// Anything triangles can be drawn onto
pub trait RenderTarget {
    /// Fill the whole target with `color`
    ///
    /// # Errors
    ///
    /// The target's own error, [`crate::Error::Backend`] for a session.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Draw a triangle list, merging `state` onto the target first
    ///
    /// # Errors
    ///
    /// The target's own error, [`crate::Error::Backend`] for a session.
    fn draw_geometry(&mut self, vertices: &[Vertex], indices: &[i32], state: Option<&RenderState>) -> Result<()>;
}
