use crate::coords::{Color, Vec2};
use crate::shape::{DrawMode, ShapeRecord};
use crate::Result;

use super::{rotate_point, shaded, solid};

/// Corners of a `width` x `height` rectangle centered on `center`, tilted by
/// `tilt_degrees` about its center.
///
/// Order walks the outline: (-x,-y), (-x,+y), (+x,+y), (+x,-y).
pub fn rectangle_points(center: Vec2, width: f32, height: f32, tilt_degrees: f32) -> [Vec2; 4] {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corners = [
        Vec2::new(center.x - hw, center.y - hh),
        Vec2::new(center.x - hw, center.y + hh),
        Vec2::new(center.x + hw, center.y + hh),
        Vec2::new(center.x + hw, center.y - hh),
    ];
    if tilt_degrees == 0.0 {
        return corners;
    }
    corners.map(|p| rotate_point(p, center, tilt_degrees))
}

pub fn rectangle_filled(
    center: Vec2,
    width: f32,
    height: f32,
    color: Color,
    tilt_degrees: f32,
) -> Result<ShapeRecord> {
    let mut corners = rectangle_points(center, width, height, tilt_degrees);
    corners.swap(2, 3);
    solid(DrawMode::TriangleStrip, 1.0, &corners, color)
}

pub fn rectangle_outline(
    center: Vec2,
    width: f32,
    height: f32,
    color: Color,
    line_width: f32,
    tilt_degrees: f32,
) -> Result<ShapeRecord> {
    let [a, b, c, d] = rectangle_points(center, width, height, tilt_degrees);
    solid(DrawMode::LineStrip, line_width, &[a, b, c, d, a], color)
}

/// Filled quad with one color per corner. `points` walk the outline (as
/// [`rectangle_points`] returns them).
pub fn rectangle_filled_with_colors(points: &[Vec2], colors: &[Color]) -> Result<ShapeRecord> {
    let mut points = points.to_vec();
    let mut colors = colors.to_vec();
    swap_last_two(&mut points);
    swap_last_two(&mut colors);
    shaded(DrawMode::TriangleStrip, 1.0, &points, &colors)
}

/// Triangle strip through `points` with one color per point.
pub fn triangles_filled_with_colors(points: &[Vec2], colors: &[Color]) -> Result<ShapeRecord> {
    shaded(DrawMode::TriangleStrip, 1.0, points, colors)
}

fn swap_last_two<T>(items: &mut [T]) {
    let n = items.len();
    if n >= 2 {
        items.swap(n - 2, n - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn close(a: Vec2, b: Vec2) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn untilted_corners() {
        let pts = rectangle_points(Vec2::new(10.0, 20.0), 4.0, 6.0, 0.0);
        assert_eq!(
            pts,
            [
                Vec2::new(8.0, 17.0),
                Vec2::new(8.0, 23.0),
                Vec2::new(12.0, 23.0),
                Vec2::new(12.0, 17.0),
            ]
        );
    }

    #[test]
    fn tilted_square_keeps_its_center_and_size() {
        let center = Vec2::new(5.0, 5.0);
        let pts = rectangle_points(center, 2.0, 2.0, 45.0);
        for p in pts {
            assert!((p.distance(center) - 2f32.sqrt()).abs() < 1e-4);
        }
        assert!(close(pts[0], Vec2::new(5.0, 5.0 - 2f32.sqrt())));
    }

    #[test]
    fn filled_rectangle_is_strip_ordered() {
        let center = Vec2::zero();
        let corners = rectangle_points(center, 2.0, 2.0, 0.0);
        let shape = rectangle_filled(center, 2.0, 2.0, Color::BLUE, 0.0).unwrap();

        assert_eq!(shape.mode(), DrawMode::TriangleStrip);
        let order: Vec<_> = shape.vertices().iter().map(|v| v.position()).collect();
        assert_eq!(order, vec![corners[0], corners[1], corners[3], corners[2]]);
    }

    #[test]
    fn outline_is_closed_five_point_strip() {
        let shape = rectangle_outline(Vec2::zero(), 2.0, 2.0, Color::RED, 3.0, 0.0).unwrap();
        assert_eq!(shape.mode(), DrawMode::LineStrip);
        assert_eq!(shape.line_width(), 3.0);
        assert_eq!(shape.vertex_count(), 5);
        assert_eq!(shape.vertices()[0], shape.vertices()[4]);
    }

    #[test]
    fn colored_quad_swaps_colors_with_points() {
        let points = rectangle_points(Vec2::zero(), 2.0, 2.0, 0.0);
        let colors = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        let shape = rectangle_filled_with_colors(&points, &colors).unwrap();

        let v = shape.vertices();
        assert_eq!(v[2].position(), points[3]);
        assert_eq!(v[2].color, Color::WHITE.to_array());
        assert_eq!(v[3].color, Color::BLUE.to_array());
    }

    #[test]
    fn colored_triangles_need_matching_colors() {
        let points = [Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)];
        assert_eq!(
            triangles_filled_with_colors(&points, &[Color::RED, Color::GREEN]),
            Err(Error::ColorCount { points: 3, colors: 2 })
        );
        assert!(triangles_filled_with_colors(&points, &[Color::RED; 3]).is_ok());
    }
}
