//! Shapes with lazily rebuilt geometry
//!
//! A [`Shape`] keeps the triangles it was last drawn with. Setters only mark the
//! cache dirty when a value actually changes; the geometry is rebuilt once, on the
//! next draw, however many attributes changed in between.
//!
//! Geometry is produced by [`tessellate`], a pure function of the shape kind and
//! its style.

use super::state::RenderState;
use super::RenderTarget;
use crate::error::{ensure_finite_non_negative, Error, Result};
use crate::foundation::color::Color;
use crate::foundation::math::Vec2;
use crate::foundation::vertex::Vertex;
use std::f32::consts::TAU;

/// Indices of a filled quad
const QUAD_INDICES: [i32; 6] = [0, 1, 2, 2, 3, 0];

/// Indices of a rectangle border: four quads between the outer corners (0..4)
/// and the inset corners (4..8)
const BORDER_INDICES: [i32; 24] = [
    0, 1, 5, 5, 4, 0, //
    1, 2, 6, 6, 5, 1, //
    2, 3, 7, 7, 6, 2, //
    3, 0, 4, 4, 7, 3,
];

/// Fewest points a circle may have
pub const MIN_CIRCLE_POINTS: usize = 3;

/// Shape kinds and their dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned rectangle; the position is its top-left corner
    Rectangle {
        /// Width and height
        size: Vec2,
    },
    /// Circle approximated by a regular polygon; the position is its center
    Circle {
        /// Radius
        radius: f32,
        /// Number of points on the rim
        points: usize,
    },
}

/// Appearance shared by all shape kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Anchor position, see [`ShapeKind`]
    pub position: Vec2,
    /// Fill or outline color
    pub color: Color,
    /// Filled, or outline only
    pub filled: bool,
    /// Outline thickness, ignored when filled
    pub thickness: f32,
}

/// Vertices and triangle indices of a shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertices
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<i32>,
}

/// Build the triangles for a shape
pub fn tessellate(kind: &ShapeKind, style: &ShapeStyle) -> Geometry {
    match *kind {
        ShapeKind::Rectangle { size } => rectangle(size, style),
        ShapeKind::Circle { radius, points } => circle(radius, points, style),
    }
}

fn rectangle(size: Vec2, style: &ShapeStyle) -> Geometry {
    let p = style.position;
    let corners = [
        p,
        p + Vec2::new(size.x, 0.0),
        p + size,
        p + Vec2::new(0.0, size.y),
    ];
    let mut vertices: Vec<Vertex> = corners.iter().map(|&c| Vertex::new(c, style.color)).collect();

    if style.filled {
        return Geometry {
            vertices,
            indices: QUAD_INDICES.to_vec(),
        };
    }

    let t = style.thickness.min(size.x / 2.0).min(size.y / 2.0);
    let inset = [
        Vec2::new(t, t),
        Vec2::new(-t, t),
        Vec2::new(-t, -t),
        Vec2::new(t, -t),
    ];
    vertices.extend(
        corners
            .iter()
            .zip(inset)
            .map(|(&corner, offset)| Vertex::new(corner + offset, style.color)),
    );
    Geometry {
        vertices,
        indices: BORDER_INDICES.to_vec(),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn circle(radius: f32, points: usize, style: &ShapeStyle) -> Geometry {
    let n = points.max(MIN_CIRCLE_POINTS);
    let rim = |r: f32| {
        (0..n).map(move |i| {
            let angle = TAU * i as f32 / n as f32;
            style.position + Vec2::new(angle.cos(), angle.sin()) * r
        })
    };

    if style.filled {
        let mut vertices = vec![Vertex::new(style.position, style.color)];
        vertices.extend(rim(radius).map(|p| Vertex::new(p, style.color)));
        let indices = (0..n)
            .flat_map(|i| [0, 1 + i as i32, 1 + ((i + 1) % n) as i32])
            .collect();
        return Geometry { vertices, indices };
    }

    let inner = (radius - style.thickness).max(0.0);
    let vertices = rim(radius)
        .chain(rim(inner))
        .map(|p| Vertex::new(p, style.color))
        .collect();
    let n32 = n as i32;
    let indices = (0..n)
        .flat_map(|i| {
            let a = i as i32;
            let b = ((i + 1) % n) as i32;
            [a, b, n32 + b, n32 + b, n32 + a, a]
        })
        .collect();
    Geometry { vertices, indices }
}

/// Something that can submit itself to a render target
pub trait Drawable {
    /// Draw onto `target`
    ///
    /// # Errors
    ///
    /// Whatever the target reports.
    fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()>;
}

/// A shape with a dirty-tracked geometry cache
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    style: ShapeStyle,
    render_state: Option<RenderState>,
    geometry: Geometry,
    dirty: bool,
    recomputes: usize,
}

impl Shape {
    fn with_kind(kind: ShapeKind, position: Vec2, color: Color) -> Self {
        Self {
            kind,
            style: ShapeStyle {
                position,
                color,
                filled: true,
                thickness: 1.0,
            },
            render_state: None,
            geometry: Geometry::default(),
            dirty: true,
            recomputes: 0,
        }
    }

    /// A filled rectangle with its top-left corner at `position`
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative or non-finite size.
    pub fn rectangle(position: Vec2, size: Vec2, color: Color) -> Result<Self> {
        check_size(size)?;
        Ok(Self::with_kind(ShapeKind::Rectangle { size }, position, color))
    }

    /// A filled circle centered at `center`
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative or non-finite radius, or fewer than three points.
    pub fn circle(center: Vec2, radius: f32, points: usize, color: Color) -> Result<Self> {
        ensure_finite_non_negative("radius", radius)?;
        check_points(points)?;
        Ok(Self::with_kind(ShapeKind::Circle { radius, points }, center, color))
    }

    /// Shape kind and dimensions
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Anchor position
    pub fn position(&self) -> Vec2 {
        self.style.position
    }

    /// Move the shape
    pub fn set_position(&mut self, position: Vec2) {
        if self.style.position != position {
            self.style.position = position;
            self.dirty = true;
        }
    }

    /// Color
    pub fn color(&self) -> Color {
        self.style.color
    }

    /// Recolor the shape
    pub fn set_color(&mut self, color: Color) {
        if self.style.color != color {
            self.style.color = color;
            self.dirty = true;
        }
    }

    /// Whether the shape is filled
    pub fn is_filled(&self) -> bool {
        self.style.filled
    }

    /// Switch between filled and outline
    pub fn set_filled(&mut self, filled: bool) {
        if self.style.filled != filled {
            self.style.filled = filled;
            self.dirty = true;
        }
    }

    /// Outline thickness
    pub fn thickness(&self) -> f32 {
        self.style.thickness
    }

    /// Change the outline thickness
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative or non-finite thickness.
    pub fn set_thickness(&mut self, thickness: f32) -> Result<()> {
        ensure_finite_non_negative("thickness", thickness)?;
        if self.style.thickness != thickness {
            self.style.thickness = thickness;
            self.dirty = true;
        }
        Ok(())
    }

    /// Resize a rectangle; ignored for other kinds
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative or non-finite size.
    pub fn set_size(&mut self, new_size: Vec2) -> Result<()> {
        check_size(new_size)?;
        if let ShapeKind::Rectangle { size } = &mut self.kind {
            if *size != new_size {
                *size = new_size;
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// Change a circle's radius; ignored for other kinds
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for a negative or non-finite radius.
    pub fn set_radius(&mut self, new_radius: f32) -> Result<()> {
        ensure_finite_non_negative("radius", new_radius)?;
        if let ShapeKind::Circle { radius, .. } = &mut self.kind {
            if *radius != new_radius {
                *radius = new_radius;
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// Change a circle's point count; ignored for other kinds
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentRange`] for fewer than three points.
    pub fn set_points(&mut self, new_points: usize) -> Result<()> {
        check_points(new_points)?;
        if let ShapeKind::Circle { points, .. } = &mut self.kind {
            if *points != new_points {
                *points = new_points;
                self.dirty = true;
            }
        }
        Ok(())
    }

    /// State merged onto the renderer when the shape is drawn
    pub fn set_render_state(&mut self, state: Option<RenderState>) {
        self.render_state = state;
    }

    /// Whether the next draw rebuilds the geometry
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// How many times the geometry was rebuilt
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Current geometry, rebuilding it first if stale
    pub fn geometry(&mut self) -> &Geometry {
        if self.dirty {
            self.geometry = tessellate(&self.kind, &self.style);
            self.dirty = false;
            self.recomputes += 1;
        }
        &self.geometry
    }
}

impl Drawable for Shape {
    fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.geometry();
        target.draw_geometry(&self.geometry.vertices, &self.geometry.indices, self.render_state.as_ref())
    }
}

fn check_size(size: Vec2) -> Result<()> {
    ensure_finite_non_negative("width", size.x)?;
    ensure_finite_non_negative("height", size.y)
}

fn check_points(points: usize) -> Result<()> {
    if points < MIN_CIRCLE_POINTS {
        return Err(Error::ArgumentRange {
            name: "points",
            reason: format!("{points} is fewer than {MIN_CIRCLE_POINTS}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct RecordingTarget {
        draws: Vec<(usize, Vec<i32>)>,
    }

    impl RenderTarget for RecordingTarget {
        fn clear(&mut self, _color: Color) -> Result<()> {
            Ok(())
        }

        fn draw_geometry(&mut self, vertices: &[Vertex], indices: &[i32], _state: Option<&RenderState>) -> Result<()> {
            self.draws.push((vertices.len(), indices.to_vec()));
            Ok(())
        }
    }

    fn square() -> Shape {
        Shape::rectangle(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0), Color::WHITE).unwrap()
    }

    #[test]
    fn test_filled_rectangle_is_a_quad() {
        let mut shape = square();
        let geometry = shape.geometry();
        assert_eq!(geometry.vertices.len(), 4);
        assert_eq!(geometry.indices, QUAD_INDICES.to_vec());
        assert_eq!(geometry.vertices[2].position, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_border_rectangle_insets_by_thickness() {
        let mut shape = square();
        shape.set_filled(false);
        shape.set_thickness(2.0).unwrap();

        let geometry = shape.geometry();
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(geometry.indices, BORDER_INDICES.to_vec());
        assert_eq!(geometry.vertices[4].position, Vec2::new(12.0, 12.0));
        assert_eq!(geometry.vertices[6].position, Vec2::new(28.0, 28.0));
    }

    #[test]
    fn test_same_value_twice_recomputes_once() {
        let mut shape = square();
        let mut target = RecordingTarget::default();
        shape.draw(&mut target).unwrap();
        assert_eq!(shape.recompute_count(), 1);

        shape.set_color(Color::RED);
        shape.set_color(Color::RED);
        shape.draw(&mut target).unwrap();
        assert_eq!(shape.recompute_count(), 2);

        shape.draw(&mut target).unwrap();
        assert_eq!(shape.recompute_count(), 2);
        assert_eq!(target.draws.len(), 3);
    }

    #[test]
    fn test_unchanged_setter_keeps_cache_clean() {
        let mut shape = square();
        shape.geometry();
        shape.set_position(Vec2::new(10.0, 10.0));
        shape.set_color(Color::WHITE);
        shape.set_filled(true);
        assert!(!shape.is_dirty());
    }

    #[test]
    fn test_index_topology_follows_fill_flag() {
        let mut shape = square();
        let mut target = RecordingTarget::default();
        shape.draw(&mut target).unwrap();
        shape.set_filled(false);
        shape.draw(&mut target).unwrap();

        assert_eq!(target.draws[0], (4, QUAD_INDICES.to_vec()));
        assert_eq!(target.draws[1], (8, BORDER_INDICES.to_vec()));
    }

    #[test]
    fn test_filled_circle_is_a_fan() {
        let mut shape = Shape::circle(Vec2::new(0.0, 0.0), 10.0, 8, Color::BLUE).unwrap();
        let geometry = shape.geometry();
        assert_eq!(geometry.vertices.len(), 9);
        assert_eq!(geometry.indices.len(), 24);
        assert_eq!(&geometry.indices[21..], &[0, 8, 1]);
        assert_relative_eq!(geometry.vertices[1].position.x, 10.0);
    }

    #[test]
    fn test_circle_outline_is_a_ring() {
        let mut shape = Shape::circle(Vec2::new(0.0, 0.0), 10.0, 4, Color::BLUE).unwrap();
        shape.set_filled(false);
        shape.set_thickness(3.0).unwrap();

        let geometry = shape.geometry();
        assert_eq!(geometry.vertices.len(), 8);
        assert_eq!(&geometry.indices[..6], &[0, 1, 5, 5, 4, 0]);
        assert_relative_eq!(geometry.vertices[4].position.x, 7.0);
    }

    #[test]
    fn test_dimension_validation() {
        assert!(Shape::rectangle(Vec2::zeros(), Vec2::new(-1.0, 1.0), Color::WHITE).is_err());
        assert!(Shape::circle(Vec2::zeros(), 1.0, 2, Color::WHITE).is_err());

        let mut shape = square();
        assert!(shape.set_thickness(-1.0).is_err());
        shape.set_radius(5.0).unwrap();
        assert!(shape.geometry().vertices.len() == 4);
    }

    #[test]
    fn test_non_finite_dimensions_rejected() {
        assert!(Shape::rectangle(Vec2::zeros(), Vec2::new(f32::NAN, 1.0), Color::WHITE).is_err());
        assert!(Shape::circle(Vec2::zeros(), f32::INFINITY, 8, Color::WHITE).is_err());

        let mut shape = square();
        shape.geometry();
        assert!(shape.set_thickness(f32::NAN).is_err());
        assert!(shape.set_size(Vec2::new(1.0, f32::NEG_INFINITY)).is_err());
        assert!(!shape.is_dirty());
        assert_eq!(shape.recompute_count(), 1);

        let mut circle = Shape::circle(Vec2::zeros(), 2.0, 8, Color::WHITE).unwrap();
        circle.geometry();
        assert!(circle.set_radius(f32::NAN).is_err());
        assert!(!circle.is_dirty());
    }
}
