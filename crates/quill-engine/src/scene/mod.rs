//! Retained shape lists.
//!
//! Responsibilities:
//! - own shape records and hand out stable [`ShapeId`](crate::ShapeId) handles
//! - keep each shape in exactly one batch, keyed by mode and line width
//! - carry the list-wide transform applied at draw time

mod list;
mod transform;

pub use list::{DrawStats, ShapeList, ShapeListConfig};
pub use transform::Transform;
