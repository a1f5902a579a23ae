use slotmap::SlotMap;

use crate::render::{BufferKind, IndexedDraw, RenderDevice};
use crate::shape::{DrawMode, GroupKey, ShapeId, ShapeRecord};
use crate::{Error, Result};

use super::lower::lower_indices;
use super::pack::{pack, PackedBatch, RESTART_INDEX};

/// Device-resident copy of a packed batch.
#[derive(Debug)]
pub struct GpuBuffers<B> {
    pub vertex: B,
    pub index: B,
    pub index_count: u32,
    /// Mode after lowering; may differ from the batch key's mode.
    pub mode: DrawMode,
    pub restart: bool,
}

#[derive(Debug, Copy, Clone)]
struct Member {
    id: ShapeId,
    vertex_count: u32,
}

/// All shapes sharing one [`GroupKey`], packed into one buffer pair.
///
/// Invariant: when `is_dirty()` is false, `packed()` and the device buffers
/// reflect `members()` exactly, in member order.
#[derive(Debug)]
pub struct Batch<B> {
    key: GroupKey,
    members: Vec<Member>,
    vertex_total: u64,
    packed: PackedBatch,
    gpu: Option<GpuBuffers<B>>,
    dirty: bool,
    repacks: u64,
}

impl<B> Batch<B> {
    /// Creates an empty batch. An empty batch is trivially packed.
    pub fn new(key: GroupKey) -> Self {
        Self {
            key,
            members: Vec::new(),
            vertex_total: 0,
            packed: PackedBatch::default(),
            gpu: None,
            dirty: false,
            repacks: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> GroupKey {
        self.key
    }

    /// Member ids in insertion order.
    pub fn members(&self) -> impl ExactSizeIterator<Item = ShapeId> + '_ {
        self.members.iter().map(|m| m.id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    /// Total vertices across members, packed or not.
    #[inline]
    pub fn vertex_total(&self) -> u64 {
        self.vertex_total
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last packed CPU-side buffers.
    #[inline]
    pub fn packed(&self) -> &PackedBatch {
        &self.packed
    }

    #[inline]
    pub fn gpu_buffers(&self) -> Option<&GpuBuffers<B>> {
        self.gpu.as_ref()
    }

    /// Number of completed repacks since creation.
    #[inline]
    pub fn repacks(&self) -> u64 {
        self.repacks
    }

    pub fn add(&mut self, id: ShapeId, vertex_count: u32) {
        self.members.push(Member { id, vertex_count });
        self.vertex_total += u64::from(vertex_count);
        self.dirty = true;
    }

    /// Removes the first member with this id. The batch is untouched on error.
    pub fn remove(&mut self, id: ShapeId) -> Result<()> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(Error::NotFound(id))?;
        let member = self.members.remove(pos);
        self.vertex_total -= u64::from(member.vertex_count);
        self.dirty = true;
        Ok(())
    }

    /// Repacks and re-uploads if dirty. Returns whether any work was done.
    ///
    /// New device buffers are fully built before they replace the old pair,
    /// so on error the previous buffers stay installed and the batch stays
    /// dirty.
    pub fn pack<D>(&mut self, shapes: &SlotMap<ShapeId, ShapeRecord>, device: &mut D) -> Result<bool>
    where
        D: RenderDevice<Buffer = B>,
    {
        if !self.dirty {
            return Ok(false);
        }

        let records = self
            .members
            .iter()
            .map(|m| shapes.get(m.id).ok_or(Error::NotFound(m.id)))
            .collect::<Result<Vec<_>>>()?;

        let packed = pack(&records)?;
        let gpu = upload(self.key, &packed, device)?;

        log::debug!(
            "repacked batch {}: {} shapes, {} vertex bytes, {} indices",
            self.key,
            packed.shape_count(),
            packed.vertices.len(),
            packed.indices.len(),
        );

        let previous = std::mem::replace(&mut self.gpu, gpu);
        self.packed = packed;
        self.dirty = false;
        self.repacks += 1;
        drop(previous);

        Ok(true)
    }

    /// Issues exactly one indexed draw over the packed buffers.
    ///
    /// Returns `Ok(false)` without touching the device when there is nothing
    /// to draw.
    pub fn draw<D>(&self, device: &mut D) -> Result<bool>
    where
        D: RenderDevice<Buffer = B>,
    {
        if self.dirty {
            return Err(Error::NotReady(self.key));
        }
        let Some(gpu) = self.gpu.as_ref() else { return Ok(false) };
        if gpu.index_count == 0 {
            return Ok(false);
        }

        device.draw_indexed(IndexedDraw {
            mode: gpu.mode,
            line_width: self.key.line_width(),
            vertex_buffer: &gpu.vertex,
            index_buffer: &gpu.index,
            index_count: gpu.index_count,
            restart_index: gpu.restart.then_some(RESTART_INDEX),
        });
        Ok(true)
    }
}

fn upload<D: RenderDevice>(
    key: GroupKey,
    packed: &PackedBatch,
    device: &mut D,
) -> Result<Option<GpuBuffers<D::Buffer>>> {
    if packed.is_empty() {
        return Ok(None);
    }

    let lowered = lower_indices(key.mode(), &packed.indices, device.caps());
    if lowered.indices.is_empty() {
        return Ok(None);
    }
    let index_count = u32::try_from(lowered.indices.len()).map_err(|_| Error::IndexOverflow {
        vertices: lowered.indices.len() as u64,
    })?;
    let index_bytes: &[u8] = bytemuck::cast_slice(&lowered.indices[..]);

    let vertex = device.allocate_buffer(BufferKind::Vertex, packed.vertices.len() as u64)?;
    device.upload(&vertex, &packed.vertices);

    let index = device.allocate_buffer(BufferKind::Index, index_bytes.len() as u64)?;
    device.upload(&index, index_bytes);

    Ok(Some(GpuBuffers {
        vertex,
        index,
        index_count,
        mode: lowered.mode,
        restart: lowered.uses_restart(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Color, Vec2};
    use crate::render::{BufferId, DeviceCaps, RecordingDevice};
    use crate::shape::ShapeVertex;

    fn record(mode: DrawMode, n: usize) -> ShapeRecord {
        let verts: Vec<_> = (0..n)
            .map(|i| ShapeVertex::new(Vec2::new(i as f32, 1.0), Color::BLUE))
            .collect();
        ShapeRecord::new(mode, 1.0, &verts).unwrap()
    }

    fn setup(mode: DrawMode, sizes: &[usize]) -> (SlotMap<ShapeId, ShapeRecord>, Batch<BufferId>) {
        let mut shapes = SlotMap::with_key();
        let mut batch = Batch::new(GroupKey::new(mode, 1.0));
        for &n in sizes {
            let r = record(mode, n);
            let count = r.vertex_count();
            let id = shapes.insert(r);
            batch.add(id, count);
        }
        (shapes, batch)
    }

    #[test]
    fn new_batch_is_clean_and_empty() {
        let batch: Batch<BufferId> = Batch::new(GroupKey::new(DrawMode::Lines, 1.0));
        assert!(batch.is_empty());
        assert!(!batch.is_dirty());
        assert!(batch.packed().is_empty());
    }

    #[test]
    fn add_marks_dirty_and_pack_clears_it() {
        let (shapes, mut batch) = setup(DrawMode::LineStrip, &[2, 5]);
        assert!(batch.is_dirty());
        assert_eq!(batch.vertex_total(), 7);

        let mut device = RecordingDevice::new();
        assert!(batch.pack(&shapes, &mut device).unwrap());
        assert!(!batch.is_dirty());
        assert_eq!(batch.packed().indices, vec![0, 1, RESTART_INDEX, 2, 3, 4, 5, 6]);

        let gpu = batch.gpu_buffers().unwrap();
        assert_eq!(device.buffer(gpu.vertex).unwrap(), batch.packed().vertices.as_slice());
        assert_eq!(device.indices(gpu.index).unwrap(), batch.packed().indices);
    }

    #[test]
    fn redundant_pack_is_a_no_op() {
        let (shapes, mut batch) = setup(DrawMode::LineStrip, &[3, 3]);
        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();

        let before = batch.packed().clone();
        let allocations = device.allocations();

        assert!(!batch.pack(&shapes, &mut device).unwrap());
        assert_eq!(batch.packed(), &before);
        assert_eq!(device.allocations(), allocations);
        assert_eq!(batch.repacks(), 1);
    }

    #[test]
    fn draw_while_dirty_is_not_ready() {
        let (_, batch) = setup(DrawMode::LineStrip, &[2]);
        let mut device = RecordingDevice::new();
        assert_eq!(
            batch.draw(&mut device),
            Err(Error::NotReady(GroupKey::new(DrawMode::LineStrip, 1.0)))
        );
        assert!(device.draws().is_empty());
    }

    #[test]
    fn draw_issues_one_call_with_key_state() {
        let (shapes, mut batch) = setup(DrawMode::TriangleStrip, &[4, 3]);
        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();

        assert!(batch.draw(&mut device).unwrap());
        let draws = device.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].mode, DrawMode::TriangleStrip);
        assert_eq!(draws[0].line_width, 1.0);
        assert_eq!(draws[0].index_count, 8);
        assert_eq!(draws[0].restart_index, Some(RESTART_INDEX));
    }

    #[test]
    fn empty_batch_packs_and_draws_as_no_op() {
        let (shapes, mut batch) = setup(DrawMode::LineStrip, &[2]);
        let id = batch.members().next().unwrap();
        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();

        batch.remove(id).unwrap();
        assert!(batch.is_dirty());
        assert!(batch.pack(&shapes, &mut device).unwrap());

        assert!(!batch.is_dirty());
        assert!(batch.packed().vertices.is_empty());
        assert!(batch.packed().indices.is_empty());
        assert!(batch.gpu_buffers().is_none());
        assert!(!batch.draw(&mut device).unwrap());
        assert!(device.draws().is_empty());
    }

    #[test]
    fn remove_unknown_leaves_batch_untouched() {
        let (mut shapes, mut batch) = setup(DrawMode::Lines, &[2]);
        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();

        let stranger = shapes.insert(record(DrawMode::Lines, 2));
        assert_eq!(batch.remove(stranger), Err(Error::NotFound(stranger)));
        assert!(!batch.is_dirty());
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn remove_takes_first_match_and_preserves_order() {
        let (shapes, mut batch) = setup(DrawMode::LineStrip, &[2, 3, 4]);
        let ids: Vec<_> = batch.members().collect();
        batch.remove(ids[1]).unwrap();

        assert_eq!(batch.members().collect::<Vec<_>>(), vec![ids[0], ids[2]]);
        assert_eq!(batch.vertex_total(), 6);

        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();
        assert_eq!(batch.packed().indices, vec![0, 1, RESTART_INDEX, 2, 3, 4, 5]);
    }

    #[test]
    fn repack_replaces_buffers() {
        let (mut shapes, mut batch) = setup(DrawMode::LineStrip, &[2]);
        let mut device = RecordingDevice::new();
        batch.pack(&shapes, &mut device).unwrap();
        let old_vertex = batch.gpu_buffers().unwrap().vertex;

        let r = record(DrawMode::LineStrip, 3);
        let id = shapes.insert(r);
        batch.add(id, 3);
        batch.pack(&shapes, &mut device).unwrap();

        let gpu = batch.gpu_buffers().unwrap();
        assert_ne!(gpu.vertex, old_vertex);
        assert_eq!(device.buffer(gpu.vertex).unwrap().len(), 5 * ShapeVertex::STRIDE);
        // The previous upload is left intact; only the handle moved.
        assert_eq!(device.buffer(old_vertex).unwrap().len(), 2 * ShapeVertex::STRIDE);
    }

    #[test]
    fn lowering_applies_to_device_copy_only() {
        let (shapes, mut batch) = setup(DrawMode::TriangleFan, &[4]);
        let mut device = RecordingDevice::with_caps(DeviceCaps::WEBGPU);
        batch.pack(&shapes, &mut device).unwrap();

        assert_eq!(batch.packed().indices, vec![0, 1, 2, 3]);
        let gpu = batch.gpu_buffers().unwrap();
        assert_eq!(gpu.mode, DrawMode::Triangles);
        assert!(!gpu.restart);
        assert_eq!(device.indices(gpu.index).unwrap(), vec![0, 1, 2, 0, 2, 3]);

        batch.draw(&mut device).unwrap();
        assert_eq!(device.draws()[0].mode, DrawMode::Triangles);
        assert_eq!(device.draws()[0].restart_index, None);
    }

    #[test]
    fn missing_shape_fails_pack_and_keeps_state() {
        let (mut shapes, mut batch) = setup(DrawMode::LineStrip, &[2]);
        let id = batch.members().next().unwrap();
        shapes.remove(id);

        let mut device = RecordingDevice::new();
        assert_eq!(batch.pack(&shapes, &mut device), Err(Error::NotFound(id)));
        assert!(batch.is_dirty());
        assert_eq!(device.allocations(), 0);
    }
}
