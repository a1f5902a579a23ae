use std::f32::consts::TAU;

use crate::coords::{Color, Vec2};
use crate::shape::{DrawMode, ShapeRecord};
use crate::{Error, Result};

use super::{rotate_point, shaded, solid, zigzag};

/// `segments` points on the ellipse with radii `radius_x`/`radius_y`,
/// starting on the +X axis.
fn ellipse_points(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    tilt_degrees: f32,
    segments: u32,
) -> Vec<Vec2> {
    (0..segments)
        .map(|seg| {
            let theta = TAU * seg as f32 / segments as f32;
            let p = Vec2::new(
                center.x + radius_x * theta.cos(),
                center.y + radius_y * theta.sin(),
            );
            if tilt_degrees == 0.0 {
                p
            } else {
                rotate_point(p, center, tilt_degrees)
            }
        })
        .collect()
}

/// Filled ellipse (a circle when the radii match), as a triangle strip.
pub fn ellipse_filled(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    color: Color,
    tilt_degrees: f32,
    segments: u32,
) -> Result<ShapeRecord> {
    let outline = ellipse_points(center, radius_x, radius_y, tilt_degrees, segments);
    solid(DrawMode::TriangleStrip, 1.0, &zigzag(&outline), color)
}

/// Ellipse outline, closed back onto its first point.
pub fn ellipse_outline(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    color: Color,
    line_width: f32,
    tilt_degrees: f32,
    segments: u32,
) -> Result<ShapeRecord> {
    let mut outline = ellipse_points(center, radius_x, radius_y, tilt_degrees, segments);
    if let Some(&first) = outline.first() {
        outline.push(first);
    }
    solid(DrawMode::LineStrip, line_width, &outline, color)
}

/// Filled ellipse shaded from `inside` at the center to `outside` on the rim.
///
/// Built as a triangle fan: center, the rim points, then the first rim point
/// again to close the fan.
pub fn ellipse_filled_with_colors(
    center: Vec2,
    radius_x: f32,
    radius_y: f32,
    outside: Color,
    inside: Color,
    tilt_degrees: f32,
    segments: u32,
) -> Result<ShapeRecord> {
    let rim = ellipse_points(center, radius_x, radius_y, tilt_degrees, segments);
    let Some(&first) = rim.first() else {
        return Err(Error::InvalidGeometry {
            mode: DrawMode::TriangleFan,
            min: DrawMode::TriangleFan.min_vertices(),
            count: 1,
        });
    };

    let mut points = Vec::with_capacity(rim.len() + 2);
    points.push(center);
    points.extend_from_slice(&rim);
    points.push(first);

    let mut colors = vec![outside; points.len()];
    colors[0] = inside;

    shaded(DrawMode::TriangleFan, 1.0, &points, &colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_sit_on_the_ellipse() {
        let center = Vec2::new(100.0, 50.0);
        let pts = ellipse_points(center, 20.0, 10.0, 0.0, 16);
        assert_eq!(pts.len(), 16);
        for p in &pts {
            let dx = (p.x - center.x) / 20.0;
            let dy = (p.y - center.y) / 10.0;
            assert!((dx * dx + dy * dy - 1.0).abs() < 1e-4);
        }
        assert!(pts[0].distance(Vec2::new(120.0, 50.0)) < 1e-4);
    }

    #[test]
    fn tilt_rotates_about_the_center() {
        let center = Vec2::new(3.0, 4.0);
        let pts = ellipse_points(center, 10.0, 5.0, 90.0, 4);
        assert!(pts[0].distance(Vec2::new(3.0, 14.0)) < 1e-4);
    }

    #[test]
    fn filled_is_strip_of_all_points() {
        let shape = ellipse_filled(Vec2::zero(), 5.0, 5.0, Color::RED, 0.0, 32).unwrap();
        assert_eq!(shape.mode(), DrawMode::TriangleStrip);
        assert_eq!(shape.vertex_count(), 32);
    }

    #[test]
    fn outline_closes() {
        let shape = ellipse_outline(Vec2::zero(), 5.0, 3.0, Color::RED, 2.0, 30.0, 12).unwrap();
        assert_eq!(shape.mode(), DrawMode::LineStrip);
        assert_eq!(shape.vertex_count(), 13);
        assert_eq!(shape.vertices()[0], shape.vertices()[12]);
    }

    #[test]
    fn shaded_fan_layout() {
        let center = Vec2::new(1.0, 1.0);
        let shape =
            ellipse_filled_with_colors(center, 4.0, 2.0, Color::BLUE, Color::WHITE, 0.0, 8).unwrap();
        assert_eq!(shape.mode(), DrawMode::TriangleFan);
        assert_eq!(shape.vertex_count(), 10);

        let v = shape.vertices();
        assert_eq!(v[0].position(), center);
        assert_eq!(v[0].color, Color::WHITE.to_array());
        assert_eq!(v[9], v[1]);
        assert!(v[1..].iter().all(|v| v.color == Color::BLUE.to_array()));
    }

    #[test]
    fn zero_segments_is_rejected() {
        assert!(ellipse_filled_with_colors(Vec2::zero(), 1.0, 1.0, Color::RED, Color::RED, 0.0, 0).is_err());
        assert!(ellipse_filled(Vec2::zero(), 1.0, 1.0, Color::RED, 0.0, 2).is_err());
    }
}
