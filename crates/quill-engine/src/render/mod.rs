//! Device binding.
//!
//! `RenderDevice` is the seam between the batching core and a graphics API:
//! buffer allocation/upload, the shared transform uniform, and indexed draws
//! with primitive restart.
//!
//! Backends:
//! - `WgpuDevice`: queues draws and encodes them into one render pass.
//! - `RecordingDevice`: keeps everything in memory; used for inspection and
//!   tests.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - The vertex shader applies the list transform, then converts to NDC using
//!   a viewport uniform.

mod device;
mod recording;
mod wgpu_device;

pub use device::{BufferKind, DeviceCaps, IndexedDraw, RenderDevice};
pub use recording::{BufferId, DrawRecord, RecordingDevice};
pub use wgpu_device::{WgpuDevice, WgpuDeviceConfig};
