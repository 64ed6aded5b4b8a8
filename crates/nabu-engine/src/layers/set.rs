use std::ops::Range;
use std::sync::Arc;

use crate::coords::Vec2;
use crate::geometry::{LineVertex, QuadCounts, QuadGeometryBuilder, STRIDE};

use super::{Layer, LayerKind, LineLayer, LineStyle, SharedVertexBuffer};

/// A maximal span of consecutive layers sharing one [`LayerKind`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LayerRun {
    pub kind: LayerKind,
    pub range: Range<usize>,
}

/// Layers of one tile batch in draw order plus their shared vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSet {
    layers: Vec<Layer>,
    vertices: SharedVertexBuffer,
}

impl LayerSet {
    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &SharedVertexBuffer {
        &self.vertices
    }

    /// Index one past the run starting at `start`.
    ///
    /// Returns `len()` for an out-of-range `start`.
    pub fn run_end(&self, start: usize) -> usize {
        let Some(first) = self.layers.get(start) else {
            return self.layers.len();
        };
        let kind = first.kind();
        self.layers[start..]
            .iter()
            .position(|l| l.kind() != kind)
            .map_or(self.layers.len(), |n| start + n)
    }

    /// Iterates runs of same-kind layers in draw order.
    pub fn runs(&self) -> impl Iterator<Item = LayerRun> + '_ {
        let mut start = 0;
        std::iter::from_fn(move || {
            let first = self.layers.get(start)?;
            let end = self.run_end(start);
            let run = LayerRun {
                kind: first.kind(),
                range: start..end,
            };
            start = end;
            Some(run)
        })
    }
}

/// Open stippled-line layer being filled by [`LayerSetBuilder::add_line`].
#[derive(Debug)]
struct OpenLineLayer {
    quads: QuadGeometryBuilder,
    style: Arc<LineStyle>,
    width: f32,
    first_vertex: usize,
}

/// Builds a [`LayerSet`] the way the tile tessellator emits geometry:
/// open a line layer per style, add its lines, move on.
///
/// ```text
/// let mut b = LayerSetBuilder::new();
/// b.begin_tex_line(style, 2.0);
/// b.add_line(&points);
/// b.push_layer(LayerKind::Polygon);
/// let layers = b.finish();
/// ```
#[derive(Debug)]
pub struct LayerSetBuilder {
    layers: Vec<Layer>,
    vertices: Vec<LineVertex>,
    open: Option<OpenLineLayer>,
}

impl Default for LayerSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerSetBuilder {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            // Lead-in padding; see `SharedVertexBuffer`.
            vertices: vec![LineVertex::default()],
            open: None,
        }
    }

    /// Closes the current layer and opens a stippled-line layer for `style`.
    pub fn begin_tex_line(&mut self, style: Arc<LineStyle>, width: f32) {
        self.close_open_layer();
        self.open = Some(OpenLineLayer {
            quads: QuadGeometryBuilder::new(&style),
            style,
            width,
            first_vertex: self.vertices.len(),
        });
    }

    /// Adds a polyline (tile units) to the open stippled-line layer.
    pub fn add_line(&mut self, points: &[Vec2]) -> QuadCounts {
        let Some(open) = self.open.as_mut() else {
            log::warn!("add_line called without an open line layer; ignored");
            return QuadCounts::default();
        };
        open.quads.add_line(&mut self.vertices, points)
    }

    /// Closes the current layer and appends a layer drawn by another renderer.
    pub fn push_layer(&mut self, kind: LayerKind) {
        if kind == LayerKind::TexLine {
            log::warn!("push_layer(TexLine) ignored; use begin_tex_line");
            return;
        }
        self.close_open_layer();
        self.layers.push(Layer::Other(kind));
    }

    pub fn finish(mut self) -> LayerSet {
        self.close_open_layer();
        // Trailing padding; see `SharedVertexBuffer`.
        self.vertices.push(LineVertex::default());

        LayerSet {
            layers: self.layers,
            vertices: SharedVertexBuffer::new(self.vertices),
        }
    }

    fn close_open_layer(&mut self) {
        let Some(open) = self.open.take() else { return };
        let counts = open.quads.counts();
        if counts.is_empty() {
            log::trace!("dropping empty line layer");
            return;
        }

        self.layers.push(Layer::TexLine(LineLayer {
            offset: open.first_vertex as u64 * STRIDE,
            even_quads: counts.even,
            odd_quads: counts.odd,
            style: open.style,
            width: open.width,
        }));
    }
}
