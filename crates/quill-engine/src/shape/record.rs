use crate::batch::MAX_BATCH_VERTICES;
use crate::{Error, Result};

use super::{DrawMode, GroupKey, ShapeVertex};

/// One drawable primitive: vertex data plus the metadata batching needs.
///
/// Immutable once constructed. Construction validates the line width, the
/// byte length against the vertex stride, and the mode's minimum vertex count,
/// so every record that reaches a batch is well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    mode: DrawMode,
    line_width: f32,
    vertices: Box<[ShapeVertex]>,
}

impl ShapeRecord {
    pub fn new(mode: DrawMode, line_width: f32, vertices: &[ShapeVertex]) -> Result<Self> {
        Self::from_vertices(mode, line_width, vertices.into())
    }

    /// Builds a record from interleaved vertex bytes (see [`ShapeVertex`]).
    ///
    /// The input need not be aligned.
    pub fn from_bytes(mode: DrawMode, line_width: f32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % ShapeVertex::STRIDE != 0 {
            return Err(Error::VertexDataLength {
                len: bytes.len(),
                stride: ShapeVertex::STRIDE,
            });
        }
        let vertices = bytes
            .chunks_exact(ShapeVertex::STRIDE)
            .map(bytemuck::pod_read_unaligned::<ShapeVertex>)
            .collect();
        Self::from_vertices(mode, line_width, vertices)
    }

    fn from_vertices(mode: DrawMode, line_width: f32, vertices: Box<[ShapeVertex]>) -> Result<Self> {
        if !line_width.is_finite() || line_width <= 0.0 {
            return Err(Error::InvalidLineWidth(line_width));
        }

        let count = vertices.len();
        if count < mode.min_vertices() as usize {
            return Err(Error::InvalidGeometry {
                mode,
                min: mode.min_vertices(),
                count,
            });
        }
        if count as u64 > MAX_BATCH_VERTICES {
            return Err(Error::IndexOverflow { vertices: count as u64 });
        }

        Ok(Self {
            mode,
            line_width,
            vertices,
        })
    }

    #[inline]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[inline]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    #[inline]
    pub fn key(&self) -> GroupKey {
        GroupKey::new(self.mode, self.line_width)
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        // Bounded by MAX_BATCH_VERTICES at construction.
        self.vertices.len() as u32
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.vertices.len() * ShapeVertex::STRIDE
    }

    #[inline]
    pub fn vertices(&self) -> &[ShapeVertex] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
