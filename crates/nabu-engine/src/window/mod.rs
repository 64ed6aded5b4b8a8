//! Single-window event loop.
//!
//! [`Runtime::run`] opens the map window, binds a `Gpu` to it, and drives the
//! app: input is folded per event, frames are drawn on demand.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
