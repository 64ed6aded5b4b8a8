use bytemuck::{Pod, Zeroable};

use crate::layers::SharedVertexBuffer;

use super::LineRenderError;

/// Per-layer uniform block, laid out to match `line_tex.wgsl` (112 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineUniforms {
    pub mvp: [[f32; 4]; 4],
    /// Base stroke color (premultiplied).
    pub color: [f32; 4],
    /// Dash color (premultiplied).
    pub stipple_color: [f32; 4],
    /// Current zoom scale.
    pub scale: f32,
    /// Extrusion factor applied to packed normals.
    pub width: f32,
    /// Packed length units per stipple half-period.
    pub pattern_scale: f32,
    /// Dash width fraction.
    pub pattern_width: f32,
}

/// Byte offsets of the two vertex streams for one draw chunk.
///
/// Both streams read the shared vertex buffer with the same stride; `pos1`
/// trails `pos0` by exactly one vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    /// Stream feeding `a_pos0` / `a_len0` (flip == 0 vertices).
    pub pos0: u64,
    /// Stream feeding `a_pos1` / `a_len1` (flip == 1 vertices).
    pub pos1: u64,
}

/// GPU capabilities needed by the line renderer.
///
/// Calls arrive in this order per draw:
/// `begin_pass` → (`set_uniforms` → (`bind_attributes` → `draw_indexed`)*)* → `end_pass`.
/// `compile_program` and `allocate_static_buffers` run once per context.
pub trait LineBackend {
    /// Compiles and links the line program.
    fn compile_program(&mut self) -> Result<(), LineRenderError>;

    /// Uploads the static flip attribute and quad index buffers.
    fn allocate_static_buffers(
        &mut self,
        flip: &[[u8; 4]],
        indices: &[u16],
    ) -> Result<(), LineRenderError>;

    /// Binds the program, the static buffers and `vertices`.
    fn begin_pass(&mut self, vertices: &SharedVertexBuffer);

    fn set_uniforms(&mut self, uniforms: &LineUniforms);

    fn bind_attributes(&mut self, binding: AttributeBinding);

    /// Draws `index_count` indices from the start of the quad index buffer.
    fn draw_indexed(&mut self, index_count: u32);

    fn end_pass(&mut self);
}
