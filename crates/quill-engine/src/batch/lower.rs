use std::borrow::Cow;

use crate::render::DeviceCaps;
use crate::shape::DrawMode;

use super::pack::{split_runs, RESTART_INDEX};

/// Index stream rewritten for a device, plus the mode to draw it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Lowered<'a> {
    pub mode: DrawMode,
    pub indices: Cow<'a, [u32]>,
}

impl Lowered<'_> {
    /// Whether the stream still relies on primitive restart.
    #[inline]
    pub fn uses_restart(&self) -> bool {
        self.indices.contains(&RESTART_INDEX)
    }
}

/// Rewrites a packed index stream into topology the device draws natively.
///
/// - `LineLoop` without loops: `LineStrip`, every run closed by repeating its
///   first index.
/// - `TriangleFan` without fans: `Triangles`, one `(first, v[i], v[i + 1])`
///   triple per fan triangle.
/// - `Lines` / `Triangles` without list restart: sentinels dropped and each run
///   truncated to whole primitives, so pairing never straddles two shapes.
///
/// Streams the device already understands are borrowed unchanged.
pub fn lower_indices(mode: DrawMode, indices: &[u32], caps: DeviceCaps) -> Lowered<'_> {
    match mode {
        DrawMode::LineLoop if !caps.line_loop => Lowered {
            mode: DrawMode::LineStrip,
            indices: Cow::Owned(close_loops(indices)),
        },
        DrawMode::TriangleFan if !caps.triangle_fan => Lowered {
            mode: DrawMode::Triangles,
            indices: Cow::Owned(fans_to_triangles(indices)),
        },
        DrawMode::Lines | DrawMode::Triangles if !caps.list_restart => Lowered {
            mode,
            indices: Cow::Owned(flatten_lists(indices, mode.list_stride().unwrap_or(1))),
        },
        _ => Lowered {
            mode,
            indices: Cow::Borrowed(indices),
        },
    }
}

fn close_loops(indices: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(indices.len() + indices.len() / 2 + 1);
    for run in split_runs(indices) {
        if !out.is_empty() {
            out.push(RESTART_INDEX);
        }
        out.extend_from_slice(run);
        out.push(run[0]);
    }
    out
}

fn fans_to_triangles(indices: &[u32]) -> Vec<u32> {
    let mut out = Vec::new();
    for run in split_runs(indices) {
        let hub = run[0];
        for pair in run[1..].windows(2) {
            out.extend_from_slice(&[hub, pair[0], pair[1]]);
        }
    }
    out
}

fn flatten_lists(indices: &[u32], stride: usize) -> Vec<u32> {
    let mut out = Vec::with_capacity(indices.len());
    for run in split_runs(indices) {
        let whole = run.len() - run.len() % stride;
        out.extend_from_slice(&run[..whole]);
    }
    out
}
