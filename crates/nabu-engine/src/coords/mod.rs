//! Screen-space coordinate types shared across renderers and input.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Map-space positions live in `geo`; tile geometry is built from `Vec2` in
//! tile units and packed by `geometry`.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
