use crate::geometry::{COORD_SCALE, COORD_SCALE_BY_DIR_SCALE, MAX_QUADS_U16, QUAD_BYTES, QUAD_VERTICES, STRIDE};
use crate::layers::{Layer, LayerSet, LineLayer};
use crate::view::{Matrices, ViewState};

use super::{AttributeBinding, LineBackend, LineRenderError, LineUniforms};

/// Indices per quad (two triangles).
const QUAD_INDICES: u32 = 6;

/// Line renderer configuration.
#[derive(Debug, Clone)]
pub struct LineRendererConfig {
    /// Quads per indexed draw; sizes the static flip and index buffers.
    ///
    /// Clamped to `1..=MAX_QUADS_U16`.
    pub max_quads_per_draw: u32,
}

impl Default for LineRendererConfig {
    fn default() -> Self {
        Self {
            max_quads_per_draw: 512,
        }
    }
}

/// Setup lifecycle of a [`LineBatchRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    /// Setup failed; every draw is a no-op from now on.
    Disabled,
}

/// Which half of the quad blocks a draw reads.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pass {
    Even,
    Odd,
}

/// Draws runs of stippled-line layers.
///
/// Per layer: one uniform upload, then the even pass and the odd pass, each
/// split into chunks of at most `max_quads_per_draw` quads so the static
/// index buffer covers every draw.
#[derive(Debug)]
pub struct LineBatchRenderer {
    max_quads: u32,
    state: RendererState,
}

impl Default for LineBatchRenderer {
    fn default() -> Self {
        Self::new(LineRendererConfig::default())
    }
}

impl LineBatchRenderer {
    pub fn new(config: LineRendererConfig) -> Self {
        let max_quads = config.max_quads_per_draw.clamp(1, MAX_QUADS_U16);
        if max_quads != config.max_quads_per_draw {
            log::warn!(
                "max_quads_per_draw {} out of range; using {}",
                config.max_quads_per_draw,
                max_quads
            );
        }
        Self {
            max_quads,
            state: RendererState::Uninitialized,
        }
    }

    #[inline]
    pub fn state(&self) -> RendererState {
        self.state
    }

    #[inline]
    pub fn max_quads_per_draw(&self) -> u32 {
        self.max_quads
    }

    /// Forgets the GPU setup so the next draw initializes again.
    ///
    /// Call this when the backend is replaced; its successor has neither the
    /// program nor the static buffers.
    pub fn reset(&mut self) {
        self.state = RendererState::Uninitialized;
    }

    /// Compiles the program and uploads the static buffers.
    ///
    /// Runs once. A failure is returned by the call that hit it and leaves the
    /// renderer [`Disabled`](RendererState::Disabled); later calls are no-ops.
    pub fn initialize<B>(&mut self, gpu: &mut B) -> Result<(), LineRenderError>
    where
        B: LineBackend + ?Sized,
    {
        if self.state != RendererState::Uninitialized {
            return Ok(());
        }

        let result = gpu
            .compile_program()
            .and_then(|()| gpu.allocate_static_buffers(&flip_pattern(self.max_quads), &quad_indices(self.max_quads)));

        match result {
            Ok(()) => {
                log::debug!("line renderer ready ({} quads per draw)", self.max_quads);
                self.state = RendererState::Ready;
                Ok(())
            }
            Err(err) => {
                self.state = RendererState::Disabled;
                Err(err)
            }
        }
    }

    /// Draws the run of stippled-line layers starting at `start`.
    ///
    /// Returns the index of the first layer after the run, so the caller can
    /// continue with the next renderer. `zoom_divisor` is the tile's
    /// `zoom_scale / tile scale` divisor from `MapViewState::tile_matrices`.
    pub fn draw<B, V>(
        &mut self,
        gpu: &mut B,
        layers: &LayerSet,
        start: usize,
        view: &V,
        matrices: &Matrices,
        zoom_divisor: f32,
    ) -> Result<usize, LineRenderError>
    where
        B: LineBackend + ?Sized,
        V: ViewState + ?Sized,
    {
        let end = layers.run_end(start);

        if !matches!(layers.get(start), Some(Layer::TexLine(_))) {
            log::debug!("no stippled-line run at layer {start}");
            return Ok(end);
        }

        match self.state {
            RendererState::Disabled => return Ok(end),
            RendererState::Uninitialized => self.initialize(gpu)?,
            RendererState::Ready => {}
        }

        let scale = view.zoom_scale() as f32;
        let s = scale / zoom_divisor;
        if !(s.is_finite() && s > 0.0) {
            log::warn!("invalid tile scale {s}; skipping line run");
            return Ok(end);
        }
        // Integer stipple multiplier keeps dashes a stable size between zoom levels.
        let pattern_px = (s + 0.5).floor().max(1.0);

        gpu.begin_pass(layers.vertices());

        for layer in layers.layers()[start..end].iter().filter_map(Layer::as_tex_line) {
            gpu.set_uniforms(&layer_uniforms(layer, matrices, scale, s, pattern_px));
            self.draw_pass(gpu, layer, Pass::Even);
            self.draw_pass(gpu, layer, Pass::Odd);
        }

        gpu.end_pass();
        Ok(end)
    }

    fn draw_pass<B>(&self, gpu: &mut B, layer: &LineLayer, pass: Pass)
    where
        B: LineBackend + ?Sized,
    {
        let quads = match pass {
            Pass::Even => layer.even_quads,
            Pass::Odd => layer.odd_quads,
        };

        let mut first = 0;
        while first < quads {
            let n = (quads - first).min(self.max_quads);
            debug_assert!(n >= 1 && n <= self.max_quads, "chunk exceeds static buffers");
            gpu.bind_attributes(attribute_binding(layer.offset, first, pass));
            gpu.draw_indexed(n * QUAD_INDICES);
            first += n;
        }
    }
}

fn layer_uniforms(layer: &LineLayer, matrices: &Matrices, scale: f32, s: f32, pattern_px: f32) -> LineUniforms {
    let style = &layer.style;
    let (pattern_scale, pattern_width) = if style.stipple > 0.0 {
        (COORD_SCALE * style.stipple / pattern_px, style.stipple_width)
    } else {
        (1.0, 0.0)
    };

    LineUniforms {
        mvp: matrices.mvp,
        color: style.color.to_array(),
        stipple_color: style.stipple_color.to_array(),
        scale,
        width: layer.width / s * COORD_SCALE_BY_DIR_SCALE,
        pattern_scale,
        pattern_width,
    }
}

/// Stream offsets for a chunk starting at quad `first_quad` of a layer.
///
/// Vertex `j` of the chunk reads `pos0` from slot `j` (even) or `j + 1`
/// (odd) and `pos1` from the slot before that.
pub(crate) fn attribute_binding(offset: u64, first_quad: u32, pass: Pass) -> AttributeBinding {
    debug_assert!(offset >= STRIDE, "line layer overlaps lead-in vertex");
    let base = offset + first_quad as u64 * QUAD_BYTES - STRIDE;
    match pass {
        Pass::Even => AttributeBinding {
            pos0: base + STRIDE,
            pos1: base,
        },
        Pass::Odd => AttributeBinding {
            pos0: base + 2 * STRIDE,
            pos1: base + STRIDE,
        },
    }
}

/// `[v % 2, 0, 0, 0]` for every vertex a draw can touch.
fn flip_pattern(max_quads: u32) -> Vec<[u8; 4]> {
    (0..max_quads as u64 * QUAD_VERTICES)
        .map(|v| [(v % 2) as u8, 0, 0, 0])
        .collect()
}

/// Two triangles `(0, 1, 2)`, `(2, 1, 3)` per quad.
fn quad_indices(max_quads: u32) -> Vec<u16> {
    (0..max_quads)
        .flat_map(|q| {
            let v = (q * QUAD_VERTICES as u32) as u16;
            [v, v + 1, v + 2, v + 2, v + 1, v + 3]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::coords::{Vec2, Viewport};
    use crate::geo::GeoPoint;
    use crate::layers::{LayerKind, LayerSetBuilder, LineStyle};
    use crate::paint::Color;
    use crate::render::lines::recording::{Call, RecordingBackend};
    use crate::view::MapViewState;

    fn style(stipple: f32) -> Arc<LineStyle> {
        Arc::new(LineStyle::new(
            Color::from_argb(0xFF_10_20_30),
            Color::from_argb(0x80_FF_FF_FF),
            stipple,
            0.5,
        ))
    }

    fn line(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| Vec2::new(i as f32 * 2.0, 0.0)).collect()
    }

    fn view(zoom_scale: f64) -> MapViewState {
        MapViewState::new(GeoPoint::new(0.0, 0.0), zoom_scale, Viewport::new(800.0, 600.0))
    }

    fn single_layer(points: usize) -> LayerSet {
        let mut b = LayerSetBuilder::new();
        b.begin_tex_line(style(6.0), 2.0);
        b.add_line(&line(points));
        b.finish()
    }

    fn renderer(max: u32) -> LineBatchRenderer {
        LineBatchRenderer::new(LineRendererConfig {
            max_quads_per_draw: max,
        })
    }

    // ── setup ─────────────────────────────────────────────────────────────

    #[test]
    fn config_is_clamped_to_u16_index_range() {
        assert_eq!(renderer(0).max_quads_per_draw(), 1);
        assert_eq!(renderer(100_000).max_quads_per_draw(), MAX_QUADS_U16);
        assert_eq!(LineBatchRenderer::default().max_quads_per_draw(), 512);
    }

    #[test]
    fn initialize_runs_once_and_uploads_static_buffers() {
        let mut gpu = RecordingBackend::default();
        let mut r = renderer(4);

        r.initialize(&mut gpu).unwrap();
        r.initialize(&mut gpu).unwrap();
        assert_eq!(r.state(), RendererState::Ready);
        assert_eq!(gpu.count(|c| *c == Call::Compile), 1);

        let Some(Call::Allocate { flip, indices }) = gpu.calls.get(1) else {
            panic!("expected static buffer upload, got {:?}", gpu.calls);
        };
        assert_eq!(flip.len(), 16);
        assert_eq!(&flip[..4], &[[0, 0, 0, 0], [1, 0, 0, 0], [0, 0, 0, 0], [1, 0, 0, 0]]);
        assert_eq!(indices.len(), 24);
        assert_eq!(&indices[..12], &[0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);
        assert_eq!(indices[23], 15);
    }

    #[test]
    fn setup_failure_is_reported_once_then_draws_are_skipped() {
        let mut gpu = RecordingBackend::failing_compile();
        let mut r = LineBatchRenderer::default();
        let set = single_layer(5);

        let first = r.draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0);
        assert!(matches!(first, Err(LineRenderError::Setup(_))));
        assert_eq!(r.state(), RendererState::Disabled);

        let second = r.draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0);
        assert_eq!(second.unwrap(), 1);
        assert_eq!(gpu.calls, vec![Call::Compile]);
    }

    #[test]
    fn allocation_failure_disables_renderer() {
        let mut gpu = RecordingBackend {
            fail_allocate: true,
            ..RecordingBackend::default()
        };
        let mut r = LineBatchRenderer::default();

        assert!(matches!(r.initialize(&mut gpu), Err(LineRenderError::Allocation(_))));
        assert_eq!(r.state(), RendererState::Disabled);
        assert!(r.initialize(&mut gpu).is_ok());
        assert_eq!(gpu.count(|c| *c == Call::Compile), 1);
    }

    #[test]
    fn reset_initializes_the_replacement_backend() {
        let set = single_layer(5);
        let mut r = LineBatchRenderer::default();
        let mut old = RecordingBackend::default();
        r.draw(&mut old, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0).unwrap();

        r.reset();
        assert_eq!(r.state(), RendererState::Uninitialized);

        let mut new = RecordingBackend::default();
        r.draw(&mut new, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0).unwrap();
        assert_eq!(new.calls[0], Call::Compile);
        assert!(matches!(new.calls[1], Call::Allocate { .. }));
        assert_eq!(r.state(), RendererState::Ready);
    }

    // ── chunking ──────────────────────────────────────────────────────────

    #[test]
    fn passes_split_into_max_sized_chunks() {
        // 42 points: 41 segments, 21 even (2 × 8 + 5) and 20 odd quads.
        let set = single_layer(42);
        let mut gpu = RecordingBackend::default();
        let mut r = renderer(8);

        let next = r.draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0).unwrap();
        assert_eq!(next, 1);
        assert_eq!(gpu.draws(), vec![48, 48, 30, 48, 48, 24]);
    }

    #[test]
    fn chunks_bind_one_vertex_apart_streams() {
        let set = single_layer(42);
        let mut gpu = RecordingBackend::default();
        renderer(8)
            .draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0)
            .unwrap();

        let b = |pos0, pos1| AttributeBinding { pos0, pos1 };
        assert_eq!(
            gpu.bindings(),
            vec![
                b(12, 0),
                b(396, 384),
                b(780, 768),
                b(24, 12),
                b(408, 396),
                b(792, 780),
            ]
        );
    }

    #[test]
    fn reads_never_leave_the_vertex_buffer() {
        for points in [2, 3, 4, 17, 42] {
            let set = single_layer(points);
            let len = set.vertices().byte_len();
            let mut gpu = RecordingBackend::default();
            renderer(8)
                .draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0)
                .unwrap();

            for (binding, count) in gpu.bindings().into_iter().zip(gpu.draws()) {
                let vertices = (count / QUAD_INDICES) as u64 * QUAD_VERTICES;
                assert!(binding.pos0 + vertices * STRIDE <= len, "points = {points}");
                assert!(binding.pos1 + vertices * STRIDE <= len, "points = {points}");
            }
        }
    }

    // ── per-layer state ───────────────────────────────────────────────────

    #[test]
    fn uniforms_precede_each_layers_draws() {
        let mut b = LayerSetBuilder::new();
        b.begin_tex_line(style(6.0), 1.0);
        b.add_line(&line(3));
        b.begin_tex_line(style(6.0), 4.0);
        b.add_line(&line(2));
        b.push_layer(LayerKind::Polygon);
        let set = b.finish();

        let mut gpu = RecordingBackend::default();
        let next = LineBatchRenderer::default()
            .draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0)
            .unwrap();
        assert_eq!(next, 2);

        let tags: Vec<&str> = gpu
            .calls
            .iter()
            .map(|c| match c {
                Call::Compile => "compile",
                Call::Allocate { .. } => "alloc",
                Call::Begin { .. } => "begin",
                Call::Uniforms(_) => "uniforms",
                Call::Attributes(_) => "attrs",
                Call::Draw(_) => "draw",
                Call::End => "end",
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                "compile", "alloc", "begin", //
                "uniforms", "attrs", "draw", "attrs", "draw", //
                "uniforms", "attrs", "draw", //
                "end",
            ]
        );
    }

    #[test]
    fn uniforms_follow_zoom_and_style() {
        let set = single_layer(3);
        let mut gpu = RecordingBackend::default();
        let m = Matrices::from_tile(Vec2::new(-10.0, 5.0), 2.0, Viewport::new(800.0, 600.0));

        LineBatchRenderer::default()
            .draw(&mut gpu, &set, 0, &view(12.0), &m, 4.0)
            .unwrap();

        let u = gpu.uniforms()[0];
        let s = style(6.0);
        assert_eq!(u.mvp, m.mvp);
        assert_eq!(u.color, s.color.to_array());
        assert_eq!(u.stipple_color, s.stipple_color.to_array());
        assert_eq!(u.scale, 12.0);
        assert!((u.width - 2.0 / 3.0 * COORD_SCALE_BY_DIR_SCALE).abs() < 1e-9);
        assert_eq!(u.pattern_scale, COORD_SCALE * 6.0 / 3.0);
        assert_eq!(u.pattern_width, 0.5);
    }

    #[test]
    fn stipple_multiplier_rounds_and_never_drops_below_one() {
        let set = single_layer(3);
        let pattern_scale = |zoom: f64| {
            let mut gpu = RecordingBackend::default();
            LineBatchRenderer::default()
                .draw(&mut gpu, &set, 0, &view(zoom), &Matrices::IDENTITY, 1.0)
                .unwrap();
            gpu.uniforms()[0].pattern_scale
        };

        assert_eq!(pattern_scale(2.5), COORD_SCALE * 6.0 / 3.0);
        assert_eq!(pattern_scale(2.4), COORD_SCALE * 6.0 / 2.0);
        assert_eq!(pattern_scale(0.3), COORD_SCALE * 6.0);
    }

    #[test]
    fn solid_lines_disable_the_dash_term() {
        let mut b = LayerSetBuilder::new();
        b.begin_tex_line(style(0.0), 2.0);
        b.add_line(&line(3));
        let set = b.finish();

        let mut gpu = RecordingBackend::default();
        LineBatchRenderer::default()
            .draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0)
            .unwrap();

        let u = gpu.uniforms()[0];
        assert_eq!((u.pattern_scale, u.pattern_width), (1.0, 0.0));
    }

    // ── run boundaries ────────────────────────────────────────────────────

    #[test]
    fn non_line_start_returns_run_end_without_gpu_calls() {
        let mut b = LayerSetBuilder::new();
        b.push_layer(LayerKind::Symbol);
        b.push_layer(LayerKind::Symbol);
        b.begin_tex_line(style(6.0), 2.0);
        b.add_line(&line(3));
        let set = b.finish();

        let mut gpu = RecordingBackend::default();
        let mut r = LineBatchRenderer::default();
        assert_eq!(r.draw(&mut gpu, &set, 0, &view(1.0), &Matrices::IDENTITY, 1.0).unwrap(), 2);
        assert!(gpu.calls.is_empty());
        assert_eq!(r.state(), RendererState::Uninitialized);
    }
}
