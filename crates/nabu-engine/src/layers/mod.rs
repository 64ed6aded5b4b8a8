//! Drawable layers produced by tile tessellation.
//!
//! Responsibilities:
//! - hold the shared packed vertex buffer of one tile batch
//! - keep layers in draw order, tagged by the renderer that draws them
//! - group contiguous layers of the same kind into runs

mod buffer;
mod layer;
mod set;
mod style;

pub use buffer::SharedVertexBuffer;
pub use layer::{Layer, LayerKind, LineLayer};
pub use set::{LayerRun, LayerSet, LayerSetBuilder};
pub use style::LineStyle;
