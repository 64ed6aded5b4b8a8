use crate::layers::{LayerKind, LayerSet};
use crate::view::{Matrices, ViewState};

use super::lines::{LineBackend, LineBatchRenderer, LineRendererConfig, RendererState};

/// Layer counts for one [`LayerDispatcher::draw`] call.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawStats {
    /// Layers handed to a renderer that drew them.
    pub drawn: usize,
    /// Layers with no renderer, or whose renderer is disabled.
    pub skipped: usize,
}

/// Walks a [`LayerSet`] and hands each run to the renderer for its kind.
///
/// Only stippled lines have a renderer; other runs are skipped.
#[derive(Debug, Default)]
pub struct LayerDispatcher {
    lines: LineBatchRenderer,
}

impl LayerDispatcher {
    pub fn new(config: LineRendererConfig) -> Self {
        Self {
            lines: LineBatchRenderer::new(config),
        }
    }

    #[inline]
    pub fn line_renderer(&self) -> &LineBatchRenderer {
        &self.lines
    }

    /// Drops renderer GPU state; call when the backend is rebuilt.
    pub fn reset(&mut self) {
        self.lines.reset();
    }

    pub fn draw<B, V>(
        &mut self,
        gpu: &mut B,
        layers: &LayerSet,
        view: &V,
        matrices: &Matrices,
        zoom_divisor: f32,
    ) -> DrawStats
    where
        B: LineBackend + ?Sized,
        V: ViewState + ?Sized,
    {
        let mut stats = DrawStats::default();

        for run in layers.runs() {
            let count = run.range.len();
            match run.kind {
                LayerKind::TexLine => {
                    if let Err(err) =
                        self.lines.draw(gpu, layers, run.range.start, view, matrices, zoom_divisor)
                    {
                        log::error!("stippled lines disabled: {err}");
                    }
                    if self.lines.state() == RendererState::Ready {
                        stats.drawn += count;
                    } else {
                        stats.skipped += count;
                    }
                }
                other => {
                    log::trace!("no renderer for {other:?} layers");
                    stats.skipped += count;
                }
            }
        }

        stats
    }
}
