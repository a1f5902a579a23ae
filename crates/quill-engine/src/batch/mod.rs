//! Batching core.
//!
//! Responsibilities:
//! - pack a batch's member shapes into one vertex buffer + one
//!   primitive-restart index stream (`pack`)
//! - rewrite index streams for devices lacking a topology (`lower`)
//! - own the packed device buffers and dirtiness of one group (`group`)

mod group;
mod lower;
mod pack;

pub use group::{Batch, GpuBuffers};
pub use lower::{lower_indices, Lowered};
pub use pack::{pack, split_runs, PackedBatch, ShapeRange, MAX_BATCH_VERTICES, RESTART_INDEX};
