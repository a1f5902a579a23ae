//! Shape constructors.
//!
//! Each constructor turns points or a parametric description into a ready
//! [`ShapeRecord`]. All coordinates are logical pixels in shape-local space;
//! the owning list's transform is applied at draw time.
//!
//! Filled convex outlines are emitted as triangle strips by zig-zagging
//! between the two ends of the point list, so no tessellator is needed.
//! Concave input produces overlapping or missing triangles.

mod ellipse;
mod line;
mod polygon;
mod rect;

pub use ellipse::{ellipse_filled, ellipse_filled_with_colors, ellipse_outline};
pub use line::{
    line, line_generic, line_generic_with_colors, line_loop, line_strip, lines, lines_with_colors,
};
pub use polygon::polygon;
pub use rect::{
    rectangle_filled, rectangle_filled_with_colors, rectangle_outline, rectangle_points,
    triangles_filled_with_colors,
};

use crate::coords::{Color, Vec2};
use crate::shape::{DrawMode, ShapeRecord, ShapeVertex};
use crate::{Error, Result};

/// Rotates `point` by `degrees` about `center`.
#[inline]
pub fn rotate_point(point: Vec2, center: Vec2, degrees: f32) -> Vec2 {
    point.rotated_about(center, degrees)
}

fn solid(mode: DrawMode, line_width: f32, points: &[Vec2], color: Color) -> Result<ShapeRecord> {
    let vertices: Vec<_> = points.iter().map(|&p| ShapeVertex::new(p, color)).collect();
    ShapeRecord::new(mode, line_width, &vertices)
}

fn shaded(mode: DrawMode, line_width: f32, points: &[Vec2], colors: &[Color]) -> Result<ShapeRecord> {
    if points.len() != colors.len() {
        return Err(Error::ColorCount {
            points: points.len(),
            colors: colors.len(),
        });
    }
    let vertices: Vec<_> = points
        .iter()
        .zip(colors)
        .map(|(&p, &c)| ShapeVertex::new(p, c))
        .collect();
    ShapeRecord::new(mode, line_width, &vertices)
}

/// Reorders a convex outline `[p0, p1, .., pn]` into strip order
/// `[p0, pn, p1, pn-1, ..]`.
fn zigzag<T: Copy>(outline: &[T]) -> Vec<T> {
    let half = outline.len() / 2;
    let (front, back) = outline.split_at(half);
    let mut back = back.iter().rev();

    let mut out = Vec::with_capacity(outline.len());
    for &p in front {
        out.push(p);
        if let Some(&q) = back.next() {
            out.push(q);
        }
    }
    out.extend(back.copied());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_alternates_ends() {
        assert_eq!(zigzag(&[0, 1, 2, 3, 4, 5]), vec![0, 5, 1, 4, 2, 3]);
        assert_eq!(zigzag(&[0, 1, 2, 3, 4]), vec![0, 4, 1, 3, 2]);
        assert_eq!(zigzag(&[0, 1, 2]), vec![0, 2, 1]);
        assert_eq!(zigzag::<i32>(&[]), Vec::<i32>::new());
    }

    #[test]
    fn rotate_point_quarter_turn() {
        let p = rotate_point(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), 90.0);
        assert!((p.x - 1.0).abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn shaded_checks_color_count() {
        let pts = [Vec2::zero(), Vec2::new(1.0, 0.0)];
        assert_eq!(
            shaded(DrawMode::Lines, 1.0, &pts, &[Color::RED]),
            Err(Error::ColorCount { points: 2, colors: 1 })
        );
    }
}
