use crate::scene::Transform;
use crate::shape::DrawMode;
use crate::Result;

/// What a buffer will be bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

/// Topology features a device supports natively.
///
/// Batches consult this before upload and lower their index streams (see
/// `batch::lower_indices`) for anything missing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DeviceCaps {
    pub line_loop: bool,
    pub triangle_fan: bool,
    /// Restart sentinels are honored by `Lines` / `Triangles`.
    pub list_restart: bool,
}

impl DeviceCaps {
    /// Desktop GL style: every mode, restart everywhere.
    pub const FULL: DeviceCaps = DeviceCaps {
        line_loop: true,
        triangle_fan: true,
        list_restart: true,
    };

    /// WebGPU: no loops or fans; restart only for strip topologies.
    pub const WEBGPU: DeviceCaps = DeviceCaps {
        line_loop: false,
        triangle_fan: false,
        list_restart: false,
    };
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self::FULL
    }
}

/// One indexed draw over a packed batch.
#[derive(Debug)]
pub struct IndexedDraw<'a, B> {
    pub mode: DrawMode,
    pub line_width: f32,
    pub vertex_buffer: &'a B,
    pub index_buffer: &'a B,
    /// Number of `u32` indices to draw, starting at index 0.
    pub index_count: u32,
    /// Restart sentinel to enable, if the stream contains one.
    pub restart_index: Option<u32>,
}

/// Graphics device binding used by batches and shape lists.
///
/// Vertex layout is fixed (`ShapeVertex::layout()`); implementations bind it
/// in their pipelines. Calls happen on the rendering thread only.
pub trait RenderDevice {
    /// Device buffer handle. Dropping it releases the buffer.
    type Buffer;

    fn caps(&self) -> DeviceCaps {
        DeviceCaps::FULL
    }

    /// Allocates an uninitialized buffer of `size` bytes.
    fn allocate_buffer(&mut self, kind: BufferKind, size: u64) -> Result<Self::Buffer>;

    /// Writes `bytes` at offset 0 of `buffer`.
    fn upload(&mut self, buffer: &Self::Buffer, bytes: &[u8]);

    /// Updates the shared transform uniform seen by subsequent draws.
    fn set_transform(&mut self, transform: Transform);

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, Self::Buffer>);
}
