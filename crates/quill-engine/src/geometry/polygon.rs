use crate::coords::{Color, Vec2};
use crate::shape::{DrawMode, ShapeRecord};
use crate::Result;

use super::{solid, zigzag};

/// Filled convex polygon from its outline, in either winding.
///
/// Emitted as a triangle strip; see the module docs for the concave caveat.
/// `line_width` only takes part in grouping.
pub fn polygon(points: &[Vec2], color: Color, line_width: f32) -> Result<ShapeRecord> {
    solid(DrawMode::TriangleStrip, line_width, &zigzag(points), color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn square_becomes_strip_order() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let shape = polygon(&square, Color::GREEN, 1.0).unwrap();
        assert_eq!(shape.mode(), DrawMode::TriangleStrip);

        let order: Vec<_> = shape.vertices().iter().map(|v| v.position()).collect();
        assert_eq!(order, vec![square[0], square[3], square[1], square[2]]);
    }

    #[test]
    fn width_selects_the_group() {
        let tri = [Vec2::zero(), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)];
        let thin = polygon(&tri, Color::RED, 1.0).unwrap();
        let thick = polygon(&tri, Color::RED, 3.0).unwrap();
        assert_eq!(thick.line_width(), 3.0);
        assert_ne!(thin.key(), thick.key());
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let err = polygon(&[Vec2::zero(), Vec2::new(1.0, 1.0)], Color::RED, 1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry { count: 2, .. }));
    }
}
