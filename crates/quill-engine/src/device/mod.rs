//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - allocating offscreen render targets
//! - providing encoders and submitting them

mod gpu;
mod init;

pub use gpu::{Gpu, OffscreenTarget};
pub use init::GpuInit;
