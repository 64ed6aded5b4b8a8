use bytemuck::{Pod, Zeroable};

/// Tile coordinates are multiplied by this factor before packing into `i16`.
pub const COORD_SCALE: f32 = 8.0;

/// Unit extrusion normals are multiplied by this factor before packing.
pub const DIR_SCALE: f32 = 2048.0;

/// Factor that turns a packed normal back into packed-coordinate units.
///
/// The width uniform is `width_px / zoom_ratio * COORD_SCALE_BY_DIR_SCALE`.
pub const COORD_SCALE_BY_DIR_SCALE: f32 = COORD_SCALE / DIR_SCALE;

/// Edge length of a tile in tile units.
pub const TILE_UNITS: f32 = 256.0;

/// Bytes per packed vertex.
pub const STRIDE: u64 = 12;

/// Byte offset of the length attribute inside a vertex.
pub const LEN_OFFSET: u64 = 8;

/// Vertex slots per quad block.
pub const QUAD_VERTICES: u64 = 4;

/// Bytes between two consecutive quads of the same pass.
pub const QUAD_BYTES: u64 = QUAD_VERTICES * STRIDE;

/// Largest quad count addressable with `u16` indices (`4 · n - 1 <= u16::MAX`).
pub const MAX_QUADS_U16: u32 = 16_384;

/// Packed line vertex (12 bytes).
///
/// Layout:
///
/// | offset | type      | field                                   |
/// |-------:|-----------|-----------------------------------------|
/// | 0      | `i16 × 2` | position × [`COORD_SCALE`]              |
/// | 4      | `i16 × 2` | unit extrusion normal × [`DIR_SCALE`]   |
/// | 8      | `i16`     | arc length × [`COORD_SCALE`], wrapped   |
/// | 10     | `i16`     | reserved (0)                            |
///
/// The shader reads bytes 0..8 as one `sint16x4` and bytes 8..12 as `sint16x2`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct LineVertex {
    pub pos: [i16; 2],
    pub dir: [i16; 2],
    pub len: [i16; 2],
}

const _: () = assert!(std::mem::size_of::<LineVertex>() == STRIDE as usize);

impl LineVertex {
    #[inline]
    pub const fn new(pos: [i16; 2], dir: [i16; 2], len: i16) -> Self {
        Self {
            pos,
            dir,
            len: [len, 0],
        }
    }

    const ATTRS_POS0: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Sint16x4, // a_pos0: xy + extrusion
        1 => Sint16x2  // a_len0
    ];

    const ATTRS_POS1: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        2 => Sint16x4, // a_pos1
        3 => Sint16x2  // a_len1
    ];

    /// Layout of the leading stream (`a_pos0`, `a_len0`).
    pub(crate) fn layout_pos0() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS_POS0,
        }
    }

    /// Layout of the trailing stream (`a_pos1`, `a_len1`), bound one stride behind.
    pub(crate) fn layout_pos1() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS_POS1,
        }
    }
}
