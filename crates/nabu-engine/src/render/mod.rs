//! GPU rendering subsystem.
//!
//! Renderers consume `layers::LayerSet` runs and issue GPU commands through a
//! narrow backend trait; `lines::WgpuLineBackend` is the wgpu implementation.
//!
//! Convention:
//! - tile geometry is packed (`geometry::LineVertex`) and transformed to clip
//!   space by `view::Matrices`
//! - per-style state is uploaded once per layer, never per quad

mod ctx;
mod dispatch;
pub mod lines;

pub use ctx::{RenderCtx, RenderTarget};
pub use dispatch::{DrawStats, LayerDispatcher};
