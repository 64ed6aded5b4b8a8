use crate::coords::Viewport;

use super::ctx::FrameCtx;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A map application hosted by [`Runtime`](crate::window::Runtime).
pub trait App {
    /// The window's content area changed size.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// The user asked to close the window. `Continue` keeps it open.
    fn on_close_requested(&mut self) -> AppControl {
        AppControl::Exit
    }

    /// Called once per presented frame, after the frame's input is folded
    /// into `ctx.input`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
