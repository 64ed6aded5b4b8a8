use std::collections::HashMap;
use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use crate::geometry::LineVertex;
use crate::layers::SharedVertexBuffer;
use crate::render::{RenderCtx, RenderTarget};

use super::{AttributeBinding, LineBackend, LineRenderError, LineUniforms};

const UNIFORM_SIZE: u64 = std::mem::size_of::<LineUniforms>() as u64;

/// wgpu implementation of [`LineBackend`].
///
/// wgpu records draws inside a render pass borrowed from the frame encoder,
/// which the layer renderers never see. Calls are therefore buffered as ops
/// and replayed by [`encode`](Self::encode) once per frame.
pub struct WgpuLineBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,

    flip_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    /// Uploaded tile buffers keyed by `SharedVertexBuffer::generation`.
    vertex_buffers: HashMap<u64, wgpu::Buffer>,

    uniforms: Vec<LineUniforms>,
    ops: Vec<Op>,
}

#[derive(Debug, Copy, Clone)]
enum Op {
    Vertices(u64),
    Uniforms(u32),
    Attributes(AttributeBinding),
    Draw(u32),
}

impl WgpuLineBackend {
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        Self::with_device(ctx.device.clone(), ctx.queue.clone(), ctx.surface_format, ctx.uniform_alignment())
    }

    fn with_device(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat, align: u64) -> Self {
        Self {
            device,
            queue,
            format,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_ubo: None,
            uniform_capacity: 0,
            uniform_stride: UNIFORM_SIZE.div_ceil(align) * align,
            flip_vbo: None,
            quad_ibo: None,
            vertex_buffers: HashMap::new(),
            uniforms: Vec::new(),
            ops: Vec::new(),
        }
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Whether the program and static buffers exist, i.e. recorded draws can
    /// be replayed.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some() && self.flip_vbo.is_some() && self.quad_ibo.is_some()
    }

    /// Replays the draws recorded since the last call into `target`.
    ///
    /// Tile buffers not referenced by this frame are released afterwards.
    pub fn encode(&mut self, target: &mut RenderTarget<'_>) {
        if self.ops.is_empty() {
            self.vertex_buffers.clear();
            return;
        }

        self.ensure_uniform_capacity(self.uniforms.len());
        self.write_uniforms();

        if let (Some(pipeline), Some(bind_group), Some(flip_vbo), Some(quad_ibo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.flip_vbo.as_ref(),
            self.quad_ibo.as_ref(),
        ) {
            let mut rpass = target.begin_pass("nabu lines", None);

            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(2, flip_vbo.slice(..));
            rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

            let mut vbo: Option<&wgpu::Buffer> = None;
            let mut bound = false;
            for op in &self.ops {
                match *op {
                    Op::Vertices(generation) => {
                        vbo = self.vertex_buffers.get(&generation);
                        bound = false;
                    }
                    Op::Uniforms(slot) => {
                        let offset = (slot as u64 * self.uniform_stride) as u32;
                        rpass.set_bind_group(0, bind_group, &[offset]);
                    }
                    Op::Attributes(binding) => {
                        let Some(vbo) = vbo else { continue };
                        rpass.set_vertex_buffer(0, vbo.slice(binding.pos0..));
                        rpass.set_vertex_buffer(1, vbo.slice(binding.pos1..));
                        bound = true;
                    }
                    Op::Draw(index_count) => {
                        if bound {
                            rpass.draw_indexed(0..index_count, 0, 0..1);
                        }
                    }
                }
            }
        } else {
            // The renderer that recorded these ops never initialized this
            // backend; it must be reset together with it.
            log::error!(
                "dropping {} line ops: backend has no pipeline or static buffers",
                self.ops.len()
            );
        }

        let used: Vec<u64> = self
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Vertices(generation) => Some(*generation),
                _ => None,
            })
            .collect();
        self.vertex_buffers.retain(|generation, _| used.contains(generation));

        self.ops.clear();
        self.uniforms.clear();
    }

    fn ensure_bindings(&mut self) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let capacity = self.uniform_capacity.max(16);
        let ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nabu line uniform ubo"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nabu line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: NonZeroU64::new(UNIFORM_SIZE),
                }),
            }],
        });

        self.uniform_ubo = Some(ubo);
        self.uniform_capacity = capacity;
        self.bind_group = Some(bind_group);
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required > self.uniform_capacity {
            self.uniform_capacity = required.next_power_of_two();
            self.uniform_ubo = None;
            self.bind_group = None;
        }
        self.ensure_bindings();
    }

    fn write_uniforms(&mut self) {
        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let stride = self.uniform_stride as usize;

        let mut staging = vec![0u8; self.uniforms.len() * stride];
        for (slot, u) in self.uniforms.iter().enumerate() {
            let at = slot * stride;
            staging[at..at + UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(u));
        }
        self.queue.write_buffer(ubo, 0, &staging);
    }

    /// Builds the pipeline from WGSL `source`; validation errors are caught
    /// by an error scope and returned as [`LineRenderError::Setup`].
    fn compile_wgsl(&mut self, source: &str) -> Result<(), LineRenderError> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("nabu line shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("nabu line bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("nabu line pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("nabu line pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[
                        LineVertex::layout_pos0(),
                        LineVertex::layout_pos1(),
                        flip_layout(),
                    ],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(LineRenderError::Setup(err.to_string()));
        }

        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.uniform_ubo = None;
        Ok(())
    }
}

impl LineBackend for WgpuLineBackend {
    fn compile_program(&mut self) -> Result<(), LineRenderError> {
        self.compile_wgsl(include_str!("shaders/line_tex.wgsl"))
    }

    fn allocate_static_buffers(
        &mut self,
        flip: &[[u8; 4]],
        indices: &[u16],
    ) -> Result<(), LineRenderError> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        let flip_vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nabu line flip vbo"),
            contents: bytemuck::cast_slice(flip),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("nabu line quad ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(LineRenderError::Allocation(err.to_string()));
        }

        self.flip_vbo = Some(flip_vbo);
        self.quad_ibo = Some(quad_ibo);
        Ok(())
    }

    fn begin_pass(&mut self, vertices: &SharedVertexBuffer) {
        let generation = vertices.generation();
        if !self.vertex_buffers.contains_key(&generation) {
            let vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("nabu line tile vbo"),
                contents: vertices.bytes(),
                usage: wgpu::BufferUsages::VERTEX,
            });
            self.vertex_buffers.insert(generation, vbo);
        }
        self.ops.push(Op::Vertices(generation));
    }

    fn set_uniforms(&mut self, uniforms: &LineUniforms) {
        let slot = self.uniforms.len() as u32;
        self.uniforms.push(*uniforms);
        self.ops.push(Op::Uniforms(slot));
    }

    fn bind_attributes(&mut self, binding: AttributeBinding) {
        self.ops.push(Op::Attributes(binding));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.ops.push(Op::Draw(index_count));
    }

    fn end_pass(&mut self) {}
}

const FLIP_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    4 => Uint8x4 // flip
];

fn flip_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 4,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &FLIP_ATTRS,
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
