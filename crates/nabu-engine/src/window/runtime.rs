use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{logical_viewport, App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub min_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "nabu".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            min_size: LogicalSize::new(320.0, 240.0),
        }
    }
}

/// Requests an app makes from `on_frame`, applied after the frame.
///
/// The runtime redraws on input and resize only. An app animating or
/// waiting on a timer (a held press turning into a long press) asks for the
/// next frame here.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
    redraw: bool,
    wake_at: Option<Instant>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    /// Draws another frame as soon as possible.
    pub fn request_redraw(&mut self) {
        self.redraw = true;
    }

    /// Draws another frame no later than `at`. The earliest request wins.
    pub fn redraw_at(&mut self, at: Instant) {
        self.wake_at = Some(self.wake_at.map_or(at, |w| w.min(at)));
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens one window and runs `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut host = Host {
            config,
            gpu_init,
            app,
            window: None,
            wake_at: None,
            exit: false,
        };

        event_loop
            .run_app(&mut host)
            .context("event loop terminated with error")?;
        Ok(())
    }
}

#[self_referencing]
struct MapWindow {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Host<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    window: Option<MapWindow>,
    wake_at: Option<Instant>,
    exit: bool,
}

impl<A: App + 'static> Host<A> {
    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_min_inner_size(self.config.min_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = MapWindowTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.app.on_resize(entry.with_window(|w| logical_viewport(w)));
        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    /// Runs one app frame. Minimized windows skip the app entirely.
    fn frame(&mut self, window_id: WindowId) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        entry.with_mut(|fields| {
            if !fields.gpu.is_presentable() {
                // no hold time accrues while minimized
                fields.clock.reset();
                fields.input_frame.clear();
                return;
            }

            let time = fields.clock.tick();
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                gpu: fields.gpu,
                input: fields.input,
                input_frame: fields.input_frame,
                time,
                runtime: &mut runtime,
            };
            if app.on_frame(&mut ctx) == AppControl::Exit {
                runtime.exit();
            }
            fields.input_frame.clear();
        });

        log::trace!("frame done for {window_id:?}: {runtime:?}");
        self.exit |= runtime.exit;
        self.wake_at = runtime.wake_at;
        if runtime.redraw {
            self.request_redraw();
        }
    }
}

impl<A: App + 'static> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open_window(event_loop) {
            log::error!("failed to open window: {e:#}");
            self.exit = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit {
            event_loop.exit();
            return;
        }

        match self.wake_at {
            Some(at) if at <= Instant::now() => {
                self.wake_at = None;
                self.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            Some(at) => event_loop.set_control_flow(ControlFlow::WaitUntil(at)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        let had_input = entry.with_mut(|fields| {
            let Some(ev) = translate_window_event(fields.window, fields.input, &event) else {
                return false;
            };
            fields.input.apply_event(fields.input_frame, ev);
            true
        });
        if had_input {
            entry.with_window(|w| w.request_redraw());
        }

        match event {
            WindowEvent::CloseRequested => {
                if self.app.on_close_requested() == AppControl::Exit {
                    self.exit = true;
                }
            }

            WindowEvent::Resized(size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                let viewport = entry.with_window(|w| {
                    w.request_redraw();
                    logical_viewport(w)
                });
                self.app.on_resize(viewport);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(size));
                let viewport = entry.with_window(|w| {
                    w.request_redraw();
                    logical_viewport(w)
                });
                self.app.on_resize(viewport);
            }

            WindowEvent::RedrawRequested => self.frame(window_id),

            _ => {}
        }

        if self.exit {
            self.window = None;
            event_loop.exit();
        }
    }
}
