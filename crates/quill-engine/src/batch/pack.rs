use crate::shape::ShapeRecord;
use crate::{Error, Result};

/// Index value that terminates the current primitive.
///
/// Equal to the maximum of the index type, so it can never collide with a real
/// vertex index.
pub const RESTART_INDEX: u32 = u32::MAX;

/// Upper bound on vertices in one batch: indices `0..MAX` stay below
/// [`RESTART_INDEX`].
pub const MAX_BATCH_VERTICES: u64 = RESTART_INDEX as u64;

/// Where one member shape landed inside a packed batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ShapeRange {
    pub byte_offset: usize,
    pub byte_len: usize,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

/// CPU-side result of packing a batch.
///
/// `indices` is the canonical stream: one run of consecutive indices per
/// member, separated by [`RESTART_INDEX`], with no trailing sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBatch {
    pub vertices: Vec<u8>,
    pub indices: Vec<u32>,
    pub ranges: Vec<ShapeRange>,
}

impl PackedBatch {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn vertex_count(&self) -> u32 {
        self.ranges.last().map_or(0, |r| r.first_vertex + r.vertex_count)
    }

    /// Index runs between restart sentinels, one per member shape.
    pub fn runs(&self) -> impl Iterator<Item = &[u32]> {
        split_runs(&self.indices)
    }
}

/// Splits an index stream on [`RESTART_INDEX`], skipping empty runs.
pub fn split_runs(indices: &[u32]) -> impl Iterator<Item = &[u32]> {
    indices
        .split(|&i| i == RESTART_INDEX)
        .filter(|run| !run.is_empty())
}

/// Concatenates member vertex data and builds the restart index stream.
///
/// Byte offsets advance by each record's byte length; indices advance by
/// vertex count. The two counters are independent.
///
/// Precondition: records were validated at construction (no shape has fewer
/// vertices than its mode needs).
pub fn pack(records: &[&ShapeRecord]) -> Result<PackedBatch> {
    let total_bytes: usize = records.iter().map(|r| r.byte_len()).sum();
    let total_vertices: u64 = records.iter().map(|r| u64::from(r.vertex_count())).sum();
    if total_vertices > MAX_BATCH_VERTICES {
        return Err(Error::IndexOverflow { vertices: total_vertices });
    }

    let separators = records.len().saturating_sub(1);
    let mut vertices = Vec::with_capacity(total_bytes);
    let mut indices = Vec::with_capacity(total_vertices as usize + separators);
    let mut ranges = Vec::with_capacity(records.len());

    let mut next_vertex = 0u32;
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            indices.push(RESTART_INDEX);
        }

        let byte_offset = vertices.len();
        vertices.extend_from_slice(record.vertex_bytes());

        let count = record.vertex_count();
        indices.extend(next_vertex..next_vertex + count);

        ranges.push(ShapeRange {
            byte_offset,
            byte_len: record.byte_len(),
            first_vertex: next_vertex,
            vertex_count: count,
        });
        next_vertex += count;
    }

    debug_assert_eq!(vertices.len(), total_bytes);
    debug_assert_eq!(indices.len(), total_vertices as usize + separators);

    Ok(PackedBatch {
        vertices,
        indices,
        ranges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Color, Vec2};
    use crate::shape::{DrawMode, ShapeVertex};

    const R: u32 = RESTART_INDEX;

    fn shape(n: usize, tag: u8) -> ShapeRecord {
        let verts: Vec<_> = (0..n)
            .map(|i| ShapeVertex::new(Vec2::new(i as f32, tag as f32), Color::rgba(tag, 0, 0, 255)))
            .collect();
        ShapeRecord::new(DrawMode::LineStrip, 1.0, &verts).unwrap()
    }

    #[test]
    fn line_and_rectangle_outline() {
        let line = shape(2, 1);
        let rect = shape(5, 2);
        let packed = pack(&[&line, &rect]).unwrap();

        assert_eq!(packed.vertices.len(), 7 * ShapeVertex::STRIDE);
        assert_eq!(packed.indices, vec![0, 1, R, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn members_land_at_running_byte_offsets() {
        let shapes = [shape(2, 1), shape(4, 2), shape(3, 3)];
        let refs: Vec<_> = shapes.iter().collect();
        let packed = pack(&refs).unwrap();

        let total: usize = shapes.iter().map(ShapeRecord::byte_len).sum();
        assert_eq!(packed.vertices.len(), total);

        let mut offset = 0;
        for (s, range) in shapes.iter().zip(&packed.ranges) {
            assert_eq!(range.byte_offset, offset);
            assert_eq!(&packed.vertices[offset..offset + s.byte_len()], s.vertex_bytes());
            offset += s.byte_len();
        }
    }

    #[test]
    fn runs_are_consecutive_per_member() {
        let shapes = [shape(3, 1), shape(2, 2), shape(6, 3), shape(2, 4)];
        let refs: Vec<_> = shapes.iter().collect();
        let packed = pack(&refs).unwrap();

        let runs: Vec<_> = packed.runs().collect();
        assert_eq!(runs.len(), shapes.len());

        let mut first = 0u32;
        for (run, s) in runs.iter().zip(&shapes) {
            let expected: Vec<u32> = (first..first + s.vertex_count()).collect();
            assert_eq!(*run, expected.as_slice());
            first += s.vertex_count();
        }
        assert_eq!(packed.vertex_count(), first);
        assert_ne!(packed.indices.last(), Some(&R));
        assert_eq!(packed.indices.iter().filter(|&&i| i == R).count(), shapes.len() - 1);
    }

    #[test]
    fn single_member_has_no_sentinel() {
        let s = shape(4, 1);
        let packed = pack(&[&s]).unwrap();
        assert_eq!(packed.indices, vec![0, 1, 2, 3]);
        assert_eq!(packed.ranges.len(), 1);
    }

    #[test]
    fn empty_input_packs_to_nothing() {
        let packed = pack(&[]).unwrap();
        assert!(packed.is_empty());
        assert!(packed.vertices.is_empty());
        assert!(packed.indices.is_empty());
        assert_eq!(packed.vertex_count(), 0);
    }

    #[test]
    fn split_runs_skips_empty_segments() {
        let runs: Vec<_> = split_runs(&[R, 0, 1, R, R, 2]).collect();
        assert_eq!(runs, vec![&[0u32, 1][..], &[2u32][..]]);
    }
}
