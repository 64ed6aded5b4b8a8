//! Contract between the runtime loop and the application.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub(crate) use ctx::logical_viewport;
pub use ctx::{FrameCtx, WindowCtx};
