use winit::window::{CursorIcon, Window};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// The window the frame is drawn for.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Content size in logical pixels.
    pub fn viewport(&self) -> Viewport {
        logical_viewport(self.window)
    }

    pub fn set_cursor(&self, cursor: CursorIcon) {
        self.window.set_cursor(cursor);
    }
}

pub(crate) fn logical_viewport(window: &Window) -> Viewport {
    let size = window.inner_size().to_logical::<f32>(window.scale_factor());
    Viewport::new(size.width, size.height)
}

/// Everything an [`App`](super::App) gets for one frame.
///
/// `'a` spans the callback; `'w` is the window borrow held by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_, '_> {
    /// Acquires the surface, clears it to `clear`, runs `draw`, presents.
    ///
    /// A lost or outdated surface skips the frame and schedules another;
    /// running out of memory returns `AppControl::Exit`.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface out of memory; exiting");
                        AppControl::Exit
                    }
                    action => {
                        log::debug!("frame skipped: {action:?}");
                        self.runtime.request_redraw();
                        AppControl::Continue
                    }
                };
            }
        };

        let rctx = RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.viewport(),
        );

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            drop(target.begin_pass("nabu clear", Some(clear)));
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);
        AppControl::Continue
    }
}
