//! Quill engine crate.
//!
//! Retained 2D shape lists batched into one indexed draw per
//! (draw mode, line width) group, with primitive restart separating shapes.
//!
//! Layers, bottom up:
//! - `shape`: vertex format, draw modes, immutable shape records
//! - `batch`: packing and index lowering per group
//! - `scene`: the public `ShapeList` facade and its transform
//! - `render`: the `RenderDevice` seam plus wgpu and recording backends
//! - `geometry`: constructors for lines, polygons, rectangles, ellipses
//! - `device` / `logging`: headless GPU bootstrap and logger setup

pub mod batch;
pub mod coords;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod scene;
pub mod shape;

mod error;

pub use error::{Error, Result};
pub use scene::{DrawStats, ShapeList, ShapeListConfig, Transform};
pub use shape::{DrawMode, GroupKey, ShapeId, ShapeRecord, ShapeVertex};
