use std::sync::Arc;

use super::LineStyle;

/// Draw type of a layer; selects the renderer that consumes it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayerKind {
    /// Stippled lines drawn by `LineBatchRenderer`.
    TexLine,
    /// Plain lines (external renderer).
    Line,
    /// Polygon fills (external renderer).
    Polygon,
    /// Icons and labels (external renderer).
    Symbol,
}

/// Stippled line geometry of one style inside a [`SharedVertexBuffer`].
///
/// [`SharedVertexBuffer`]: super::SharedVertexBuffer
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    /// Byte offset of the first quad block.
    pub offset: u64,
    pub even_quads: u32,
    pub odd_quads: u32,
    pub style: Arc<LineStyle>,
    /// Stroke width in logical pixels.
    pub width: f32,
}

impl LineLayer {
    #[inline]
    pub fn quads(&self) -> u32 {
        self.even_quads + self.odd_quads
    }
}

/// One entry of a tile's draw sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    TexLine(LineLayer),
    /// Layer owned by another renderer; kept so run boundaries stay correct.
    Other(LayerKind),
}

impl Layer {
    #[inline]
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::TexLine(_) => LayerKind::TexLine,
            Layer::Other(kind) => *kind,
        }
    }

    #[inline]
    pub fn as_tex_line(&self) -> Option<&LineLayer> {
        match self {
            Layer::TexLine(l) => Some(l),
            Layer::Other(_) => None,
        }
    }
}
