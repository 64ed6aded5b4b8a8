//! Line geometry packing.
//!
//! Converts tile-space polylines into quad blocks laid out for the two-pass
//! (even/odd) textured line shader. The packed vertex format is a contract with
//! `render/lines/shaders/line_tex.wgsl`; see [`LineVertex`] for the layout.

mod quad;
mod vertex;

pub use quad::{QuadCounts, QuadGeometryBuilder};
pub use vertex::{
    LineVertex, COORD_SCALE, COORD_SCALE_BY_DIR_SCALE, DIR_SCALE, LEN_OFFSET, MAX_QUADS_U16,
    QUAD_BYTES, QUAD_VERTICES, STRIDE, TILE_UNITS,
};
