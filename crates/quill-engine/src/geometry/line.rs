use crate::coords::{Color, Vec2};
use crate::shape::{DrawMode, ShapeRecord};
use crate::Result;

use super::{shaded, solid};

/// Single segment from `start` to `end`.
pub fn line(start: Vec2, end: Vec2, color: Color, line_width: f32) -> Result<ShapeRecord> {
    solid(DrawMode::LineStrip, line_width, &[start, end], color)
}

/// Connected polyline through `points`.
pub fn line_strip(points: &[Vec2], color: Color, line_width: f32) -> Result<ShapeRecord> {
    solid(DrawMode::LineStrip, line_width, points, color)
}

/// Closed polyline. Stored as a strip ending on its first point, so loops
/// batch together with ordinary strips.
pub fn line_loop(points: &[Vec2], color: Color, line_width: f32) -> Result<ShapeRecord> {
    let mut closed = points.to_vec();
    if let Some(&first) = points.first() {
        closed.push(first);
    }
    solid(DrawMode::LineStrip, line_width, &closed, color)
}

/// Independent segments, one per pair of points. A trailing odd point is
/// kept in the record but never drawn.
pub fn lines(points: &[Vec2], color: Color, line_width: f32) -> Result<ShapeRecord> {
    solid(DrawMode::Lines, line_width, points, color)
}

/// Any draw mode over `points` in one color.
pub fn line_generic(
    points: &[Vec2],
    color: Color,
    mode: DrawMode,
    line_width: f32,
) -> Result<ShapeRecord> {
    solid(mode, line_width, points, color)
}

/// Any draw mode over `points`, one color per point.
pub fn line_generic_with_colors(
    points: &[Vec2],
    colors: &[Color],
    mode: DrawMode,
    line_width: f32,
) -> Result<ShapeRecord> {
    shaded(mode, line_width, points, colors)
}

/// Like [`lines`] with one color per point.
pub fn lines_with_colors(points: &[Vec2], colors: &[Color], line_width: f32) -> Result<ShapeRecord> {
    shaded(DrawMode::Lines, line_width, points, colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn pts(raw: &[(f32, f32)]) -> Vec<Vec2> {
        raw.iter().copied().map(Vec2::from).collect()
    }

    #[test]
    fn line_is_two_vertex_strip() {
        let shape = line(Vec2::zero(), Vec2::new(100.0, 100.0), Color::RED, 2.0).unwrap();
        assert_eq!(shape.mode(), DrawMode::LineStrip);
        assert_eq!(shape.line_width(), 2.0);
        assert_eq!(shape.vertex_count(), 2);
        assert_eq!(shape.vertices()[1].position(), Vec2::new(100.0, 100.0));
        assert!(shape.vertices().iter().all(|v| v.color == Color::RED.to_array()));
    }

    #[test]
    fn line_loop_closes_on_first_point() {
        let points = pts(&[(0.0, 0.0), (100.0, 100.0), (50.0, 0.0)]);
        let shape = line_loop(&points, Color::WHITE, 1.0).unwrap();
        assert_eq!(shape.mode(), DrawMode::LineStrip);
        assert_eq!(shape.vertex_count(), 4);
        assert_eq!(shape.vertices()[3].position(), points[0]);
    }

    #[test]
    fn line_loop_and_strip_share_a_group() {
        let points = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        let a = line_loop(&points, Color::WHITE, 1.0).unwrap();
        let b = line_strip(&points, Color::BLACK, 1.0).unwrap();
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn single_point_strip_is_rejected() {
        let err = line_strip(&[Vec2::zero()], Color::RED, 1.0).unwrap_err();
        assert_eq!(err, Error::InvalidGeometry { mode: DrawMode::LineStrip, min: 2, count: 1 });
    }

    #[test]
    fn lines_with_colors_keeps_per_vertex_color() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let colors = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let shape = lines_with_colors(&points, &colors, 3.0).unwrap();
        assert_eq!(shape.mode(), DrawMode::Lines);
        assert_eq!(shape.vertices()[2].color, Color::BLUE.to_array());
    }

    #[test]
    fn generic_keeps_the_requested_mode() {
        let points = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let fan = line_generic(&points, Color::RED, DrawMode::TriangleFan, 2.0).unwrap();
        assert_eq!(fan.key(), crate::GroupKey::new(DrawMode::TriangleFan, 2.0));

        let colors = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let looped =
            line_generic_with_colors(&points, &colors, DrawMode::LineLoop, 1.0).unwrap();
        assert_eq!(looped.mode(), DrawMode::LineLoop);
        assert_eq!(looped.vertex_count(), 4);
        assert_eq!(looped.vertices()[3].color, Color::WHITE.to_array());

        assert_eq!(
            line_generic_with_colors(&points, &colors[..3], DrawMode::Lines, 1.0),
            Err(Error::ColorCount { points: 4, colors: 3 })
        );
    }

    #[test]
    fn zero_width_is_rejected() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(lines(&points, Color::RED, 0.0), Err(Error::InvalidLineWidth(0.0)));
    }
}
