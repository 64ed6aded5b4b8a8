//! Backend that records calls instead of touching a GPU.

use crate::layers::SharedVertexBuffer;

use super::{AttributeBinding, LineBackend, LineRenderError, LineUniforms};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Compile,
    Allocate { flip: Vec<[u8; 4]>, indices: Vec<u16> },
    Begin { generation: u64 },
    Uniforms(LineUniforms),
    Attributes(AttributeBinding),
    Draw(u32),
    End,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub fail_compile: bool,
    pub fail_allocate: bool,
}

impl RecordingBackend {
    pub fn failing_compile() -> Self {
        Self {
            fail_compile: true,
            ..Self::default()
        }
    }

    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn bindings(&self) -> Vec<AttributeBinding> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Attributes(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn uniforms(&self) -> Vec<LineUniforms> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Uniforms(u) => Some(*u),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl LineBackend for RecordingBackend {
    fn compile_program(&mut self) -> Result<(), LineRenderError> {
        self.calls.push(Call::Compile);
        if self.fail_compile {
            return Err(LineRenderError::Setup("shader rejected".into()));
        }
        Ok(())
    }

    fn allocate_static_buffers(
        &mut self,
        flip: &[[u8; 4]],
        indices: &[u16],
    ) -> Result<(), LineRenderError> {
        self.calls.push(Call::Allocate {
            flip: flip.to_vec(),
            indices: indices.to_vec(),
        });
        if self.fail_allocate {
            return Err(LineRenderError::Allocation("out of memory".into()));
        }
        Ok(())
    }

    fn begin_pass(&mut self, vertices: &SharedVertexBuffer) {
        self.calls.push(Call::Begin {
            generation: vertices.generation(),
        });
    }

    fn set_uniforms(&mut self, uniforms: &LineUniforms) {
        self.calls.push(Call::Uniforms(*uniforms));
    }

    fn bind_attributes(&mut self, binding: AttributeBinding) {
        self.calls.push(Call::Attributes(binding));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(Call::Draw(index_count));
    }

    fn end_pass(&mut self) {
        self.calls.push(Call::End);
    }
}
