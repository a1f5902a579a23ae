//! Coordinate and color types shared by shapes, geometry and renderers.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Renderers convert to NDC in shaders using a viewport uniform.

mod color;
mod vec2;
mod viewport;

pub use color::Color;
pub use vec2::Vec2;
pub use viewport::Viewport;
