use bytemuck::{Pod, Zeroable};

use crate::coords::{Color, Vec2};

/// Interleaved vertex shared by every shape and every batch.
///
/// Layout (12 bytes):
///
///  offset 0  pos    [f32; 2]   loc 0  (logical px, shape-local)
///  offset 8  color  [u8; 4]    loc 1  (straight RGBA, normalized in the shader)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub pos: [f32; 2],
    pub color: [u8; 4],
}

impl ShapeVertex {
    /// Byte stride of one vertex in packed buffers.
    pub const STRIDE: usize = std::mem::size_of::<ShapeVertex>();

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Unorm8x4   // color
    ];

    #[inline]
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos: [pos.x, pos.y],
            color: color.to_array(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos[0], self.pos[1])
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
