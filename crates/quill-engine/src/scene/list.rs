use std::collections::{HashMap, HashSet};

use slotmap::SlotMap;

use crate::batch::{Batch, MAX_BATCH_VERTICES};
use crate::coords::Vec2;
use crate::render::RenderDevice;
use crate::shape::{GroupKey, ShapeId, ShapeRecord};
use crate::{Error, Result};

use super::Transform;

/// Shape list configuration.
#[derive(Debug, Clone)]
pub struct ShapeListConfig {
    /// Keep a batch alive after its last member is removed, so re-adding a
    /// shape with the same key reuses it. Disable to free empty batches
    /// eagerly.
    pub retain_empty_batches: bool,

    /// Name used in log messages.
    pub label: Option<String>,
}

impl Default for ShapeListConfig {
    fn default() -> Self {
        Self {
            retain_empty_batches: true,
            label: None,
        }
    }
}

/// Outcome of one [`ShapeList::draw`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    /// Shapes in the list at draw time.
    pub shapes: usize,
    /// Batches repacked because they were dirty.
    pub batches_packed: usize,
    /// Indexed draws issued to the device.
    pub draw_calls: usize,
}

/// A retained collection of shapes, drawn as one draw call per
/// (mode, line width) group and moved/rotated as a rigid whole.
///
/// - `append()` / `remove()` mark the affected group dirty; nothing is packed
///   until the next `draw()` (or `pack_dirty()`).
/// - iteration order is insertion order, independent of grouping.
/// - `move_by()` / `set_angle()` only touch the shared [`Transform`].
///
/// `B` is the device buffer type of the [`RenderDevice`] the list draws with.
///
/// Every mutation and `draw()` takes `&mut self`; a draw never overlaps a
/// mutation and there is no internal locking.
///
/// ```ignore
/// let mut list = ShapeList::new();
/// let id = list.append(geometry::line(a, b, Color::RED, 1.0)?)?;
/// list.move_by(5.0, 5.0);
/// list.draw(&mut device)?;
/// list.remove(id)?;
/// ```
#[derive(Debug)]
pub struct ShapeList<B> {
    config: ShapeListConfig,

    shapes: SlotMap<ShapeId, ShapeRecord>,
    order: Vec<ShapeId>,

    batches: Vec<Batch<B>>,
    batch_index: HashMap<GroupKey, usize>,
    dirty: HashSet<GroupKey>,

    transform: Transform,
}

impl<B> Default for ShapeList<B> {
    fn default() -> Self {
        Self::with_config(ShapeListConfig::default())
    }
}

impl<B> ShapeList<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ShapeListConfig) -> Self {
        Self {
            config,
            shapes: SlotMap::with_key(),
            order: Vec::new(),
            batches: Vec::new(),
            batch_index: HashMap::new(),
            dirty: HashSet::new(),
            transform: Transform::IDENTITY,
        }
    }

    #[inline]
    pub fn config(&self) -> &ShapeListConfig {
        &self.config
    }

    // ── membership ─────────────────────────────────────────────────────────

    /// Adds a shape and returns its handle.
    ///
    /// Fails with `IndexOverflow`, leaving the list unchanged, if the shape's
    /// batch would outgrow the 32-bit index range.
    pub fn append(&mut self, shape: ShapeRecord) -> Result<ShapeId> {
        let key = shape.key();
        let vertex_count = shape.vertex_count();

        let current = self.batch(key).map_or(0, Batch::vertex_total);
        let total = current + u64::from(vertex_count);
        if total > MAX_BATCH_VERTICES {
            return Err(Error::IndexOverflow { vertices: total });
        }

        let id = self.shapes.insert(shape);
        self.order.push(id);
        self.get_or_create_batch(key).add(id, vertex_count);
        self.dirty.insert(key);

        Ok(id)
    }

    /// Removes a shape and hands its record back.
    ///
    /// Unknown (or already removed) ids fail with `NotFound`; nothing is
    /// marked dirty in that case.
    pub fn remove(&mut self, id: ShapeId) -> Result<ShapeRecord> {
        let Some(key) = self.shapes.get(id).map(ShapeRecord::key) else {
            log::trace!("{}: remove of unknown shape {id:?}", self.name());
            return Err(Error::NotFound(id));
        };
        let pos = self
            .order
            .iter()
            .position(|&o| o == id)
            .ok_or(Error::NotFound(id))?;
        let index = *self.batch_index.get(&key).ok_or(Error::NotFound(id))?;

        self.batches[index].remove(id)?;
        self.order.remove(pos);
        self.dirty.insert(key);
        let record = self.shapes.remove(id).ok_or(Error::NotFound(id))?;

        if self.batches[index].is_empty() && !self.config.retain_empty_batches {
            self.drop_batch(index);
        }

        Ok(record)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    #[inline]
    pub fn get(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.shapes.get(id)
    }

    /// Shape at position `index` in insertion order.
    pub fn nth(&self, index: usize) -> Option<(ShapeId, &ShapeRecord)> {
        let id = *self.order.get(index)?;
        self.shapes.get(id).map(|shape| (id, shape))
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &ShapeRecord)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.shapes.get(id).map(|shape| (id, shape)))
    }

    /// Shape ids in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = ShapeId> + '_ {
        self.order.iter().copied()
    }

    // ── batches ────────────────────────────────────────────────────────────

    /// Batches in creation order (which is also draw order).
    pub fn batches(&self) -> impl ExactSizeIterator<Item = &Batch<B>> + '_ {
        self.batches.iter()
    }

    pub fn batch(&self, key: GroupKey) -> Option<&Batch<B>> {
        self.batch_index.get(&key).map(|&i| &self.batches[i])
    }

    /// Groups with membership changes not yet packed.
    pub fn dirty_keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.dirty.iter().copied()
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Batch for `key`, created (clean and empty) on first use.
    ///
    /// Callers must keep `order`, `shapes` and `dirty` in step with any
    /// membership change made through the returned batch.
    fn get_or_create_batch(&mut self, key: GroupKey) -> &mut Batch<B> {
        let index = match self.batch_index.get(&key) {
            Some(&i) => i,
            None => {
                log::debug!("{}: new batch {key}", self.name());
                self.batches.push(Batch::new(key));
                let i = self.batches.len() - 1;
                self.batch_index.insert(key, i);
                i
            }
        };
        &mut self.batches[index]
    }

    fn drop_batch(&mut self, index: usize) {
        let batch = self.batches.remove(index);
        let key = batch.key();
        self.batch_index.remove(&key);
        self.dirty.remove(&key);
        for slot in self.batch_index.values_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        log::debug!("{}: dropped empty batch {key}", self.name());
    }

    // ── transform ──────────────────────────────────────────────────────────

    #[inline]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Shifts every shape by `(dx, dy)` logical px.
    #[inline]
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.transform.center
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.transform.center = center;
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.transform.center.x
    }

    #[inline]
    pub fn set_center_x(&mut self, x: f32) {
        self.transform.center.x = x;
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.transform.center.y
    }

    #[inline]
    pub fn set_center_y(&mut self, y: f32) {
        self.transform.center.y = y;
    }

    /// Rotation in degrees.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.transform.angle_degrees
    }

    #[inline]
    pub fn set_angle(&mut self, degrees: f32) {
        self.transform.angle_degrees = degrees;
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// Repacks every dirty batch. Returns how many were repacked.
    ///
    /// A batch that fails to pack stays dirty (and keeps its previous
    /// buffers); batches packed before the failure stay packed.
    pub fn pack_dirty<D>(&mut self, device: &mut D) -> Result<usize>
    where
        D: RenderDevice<Buffer = B>,
    {
        let mut pending: Vec<usize> = self
            .dirty
            .iter()
            .filter_map(|key| self.batch_index.get(key).copied())
            .collect();
        pending.sort_unstable();

        let mut packed = 0;
        for index in pending {
            let batch = &mut self.batches[index];
            if batch.pack(&self.shapes, device)? {
                packed += 1;
            }
            self.dirty.remove(&batch.key());
        }
        self.dirty.clear();

        Ok(packed)
    }

    /// Packs dirty batches, pushes the transform, then draws every batch.
    ///
    /// Empty batches are skipped without a device call. Batches are drawn in
    /// creation order; there is no depth ordering across batches.
    pub fn draw<D>(&mut self, device: &mut D) -> Result<DrawStats>
    where
        D: RenderDevice<Buffer = B>,
    {
        let batches_packed = self.pack_dirty(device)?;
        device.set_transform(self.transform);

        let mut draw_calls = 0;
        for batch in &self.batches {
            if batch.draw(device)? {
                draw_calls += 1;
            }
        }

        Ok(DrawStats {
            shapes: self.len(),
            batches_packed,
            draw_calls,
        })
    }

    fn name(&self) -> &str {
        self.config.label.as_deref().unwrap_or("shape list")
    }
}
