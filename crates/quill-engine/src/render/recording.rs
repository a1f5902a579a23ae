use crate::scene::Transform;
use crate::shape::DrawMode;
use crate::{Error, Result};

use super::{BufferKind, DeviceCaps, IndexedDraw, RenderDevice};

/// Handle to a buffer owned by a [`RecordingDevice`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(usize);

/// A draw captured by [`RecordingDevice`], with the transform it would use.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mode: DrawMode,
    pub line_width: f32,
    pub vertex_buffer: BufferId,
    pub index_buffer: BufferId,
    pub index_count: u32,
    pub restart_index: Option<u32>,
    pub transform: Transform,
}

#[derive(Debug)]
struct RecordedBuffer {
    kind: BufferKind,
    bytes: Vec<u8>,
}

/// In-memory device that keeps buffer contents and records draw calls.
///
/// Useful for headless inspection of what a shape list would submit, and as
/// the fake device in tests.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    caps: DeviceCaps,
    max_buffer_size: Option<u64>,
    buffers: Vec<RecordedBuffer>,
    draws: Vec<DrawRecord>,
    transform: Transform,
    transform_writes: usize,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records as a device with the given native topology support.
    pub fn with_caps(caps: DeviceCaps) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    /// Rejects allocations larger than `bytes`, like a real device limit.
    pub fn with_max_buffer_size(mut self, bytes: u64) -> Self {
        self.max_buffer_size = Some(bytes);
        self
    }

    /// Number of buffers allocated so far.
    pub fn allocations(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer(&self, id: BufferId) -> Option<&[u8]> {
        self.buffers.get(id.0).map(|b| b.bytes.as_slice())
    }

    pub fn buffer_kind(&self, id: BufferId) -> Option<BufferKind> {
        self.buffers.get(id.0).map(|b| b.kind)
    }

    /// Decodes an index buffer back into `u32` indices.
    pub fn indices(&self, id: BufferId) -> Option<Vec<u32>> {
        let bytes = self.buffer(id)?;
        Some(
            bytes
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<u32>)
                .collect(),
        )
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// Drains recorded draws, e.g. at the end of a frame.
    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn transform_writes(&self) -> usize {
        self.transform_writes
    }
}

impl RenderDevice for RecordingDevice {
    type Buffer = BufferId;

    fn caps(&self) -> DeviceCaps {
        self.caps
    }

    fn allocate_buffer(&mut self, kind: BufferKind, size: u64) -> Result<BufferId> {
        if let Some(max) = self.max_buffer_size.filter(|&max| size > max) {
            return Err(Error::Device(format!(
                "{kind:?} buffer of {size} bytes exceeds the {max}-byte limit"
            )));
        }
        let len = usize::try_from(size)
            .map_err(|_| Error::Device(format!("{size} bytes do not fit in memory")))?;

        self.buffers.push(RecordedBuffer {
            kind,
            bytes: vec![0; len],
        });
        Ok(BufferId(self.buffers.len() - 1))
    }

    fn upload(&mut self, buffer: &BufferId, bytes: &[u8]) {
        let Some(target) = self.buffers.get_mut(buffer.0) else {
            log::warn!("upload to unknown buffer {buffer:?} ignored");
            return;
        };
        if bytes.len() > target.bytes.len() {
            log::warn!(
                "upload of {} bytes overflows {:?} ({} bytes); ignored",
                bytes.len(),
                buffer,
                target.bytes.len()
            );
            return;
        }
        target.bytes[..bytes.len()].copy_from_slice(bytes);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.transform_writes += 1;
    }

    fn draw_indexed(&mut self, draw: IndexedDraw<'_, BufferId>) {
        self.draws.push(DrawRecord {
            mode: draw.mode,
            line_width: draw.line_width,
            vertex_buffer: *draw.vertex_buffer,
            index_buffer: *draw.index_buffer,
            index_count: draw.index_count,
            restart_index: draw.restart_index,
            transform: self.transform,
        });
    }
}
