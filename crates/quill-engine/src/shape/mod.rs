//! Shape records: the narrow, immutable view of one drawable primitive that the
//! batching core works with.
//!
//! Shapes are produced by the constructors in `geometry` (or by callers that
//! already have interleaved vertex data) and are identified inside a
//! `ShapeList` by a [`ShapeId`].

mod key;
mod mode;
mod record;
mod vertex;

pub use key::GroupKey;
pub use mode::DrawMode;
pub use record::ShapeRecord;
pub use vertex::ShapeVertex;

slotmap::new_key_type! {
    /// Stable handle to a shape stored in a `ShapeList`.
    ///
    /// Handles are never reused while the list is alive, so a removed shape's
    /// id reports `NotFound` instead of aliasing a newer shape.
    pub struct ShapeId;
}
