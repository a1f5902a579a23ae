use crate::coords::Vec2;

/// Rigid transform shared by every batch of a shape list.
///
/// Applied at draw time as `center + rotate(angle_degrees) * vertex`; packed
/// buffers are never rewritten for a move or rotation.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Transform {
    pub center: Vec2,
    pub angle_degrees: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        center: Vec2::zero(),
        angle_degrees: 0.0,
    };

    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.center += Vec2::new(dx, dy);
    }

    /// Maps a shape-local point the way the vertex shader does.
    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        self.center + p.rotated(self.angle_degrees)
    }
}
