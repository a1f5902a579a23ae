use thiserror::Error;

use crate::shape::{DrawMode, GroupKey, ShapeId};

/// Errors surfaced by shape construction, batching and drawing.
///
/// Every variant describes a local precondition violation. The operation that
/// returned it left all state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The shape id is not (or no longer) a member of the list or batch.
    #[error("shape {0:?} is not a member of this list")]
    NotFound(ShapeId),

    /// A batch with unpacked membership changes was asked to draw.
    #[error("batch {0} has pending changes and must be packed before drawing")]
    NotReady(GroupKey),

    /// Fewer vertices than the draw mode needs for a single primitive.
    #[error("{mode:?} needs at least {min} vertices, got {count}")]
    InvalidGeometry { mode: DrawMode, min: u32, count: usize },

    #[error("line width must be finite and positive, got {0}")]
    InvalidLineWidth(f32),

    /// Raw vertex bytes do not split into whole vertices.
    #[error("vertex data is {len} bytes, not a multiple of the {stride}-byte vertex stride")]
    VertexDataLength { len: usize, stride: usize },

    /// Per-vertex color list does not match the point list.
    #[error("{points} points were given {colors} colors")]
    ColorCount { points: usize, colors: usize },

    /// The batch would need vertex indices that collide with the restart sentinel.
    #[error("batch would hold {vertices} vertices, exceeding the 32-bit index range")]
    IndexOverflow { vertices: u64 },

    #[error("device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, Error>;
