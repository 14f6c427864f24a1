use surface_core::{Geometry, ProgramSpec, VertexLayout, VertexStep};
use wgpu::util::DeviceExt;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Uniform buffer, bind group and pipeline for one effect program.
pub struct Program {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Program {
    pub fn new(
        device: &wgpu::Device,
        spec: &ProgramSpec,
        layout: Option<&VertexLayout>,
        color_format: wgpu::TextureFormat,
        depth: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(spec.label),
            source: wgpu::ShaderSource::Wgsl(spec.shader.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("surface_uniforms"),
            size: spec.uniform_size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surface_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let attributes = layout.map(vertex_attributes).unwrap_or_default();
        let buffers: Vec<wgpu::VertexBufferLayout> = layout
            .map(|l| wgpu::VertexBufferLayout {
                array_stride: (l.stride as usize * std::mem::size_of::<f32>()) as u64,
                step_mode: match l.step {
                    VertexStep::Vertex => wgpu::VertexStepMode::Vertex,
                    VertexStep::Instance => wgpu::VertexStepMode::Instance,
                },
                attributes: &attributes,
            })
            .into_iter()
            .collect();
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(spec.label),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: depth.then(|| wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }
}

fn vertex_attributes(layout: &VertexLayout) -> Vec<wgpu::VertexAttribute> {
    layout
        .attributes
        .iter()
        .map(|a| wgpu::VertexAttribute {
            format: match a.components {
                1 => wgpu::VertexFormat::Float32,
                2 => wgpu::VertexFormat::Float32x2,
                3 => wgpu::VertexFormat::Float32x3,
                _ => wgpu::VertexFormat::Float32x4,
            },
            offset: (a.offset as usize * std::mem::size_of::<f32>()) as u64,
            shader_location: a.location,
        })
        .collect()
}

/// GPU copy of a [`Geometry`].
pub struct Mesh {
    vertices: Option<wgpu::Buffer>,
    indices: Option<wgpu::Buffer>,
    needs_vertices: bool,
    vertex_count: u32,
    instance_count: u32,
}

impl Mesh {
    pub fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = (!geometry.data.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(geometry.label),
                contents: bytemuck::cast_slice(&geometry.data),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });
        let indices = geometry.is_indexed().then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("surface_indices"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertices,
            indices,
            needs_vertices: geometry.layout.is_some(),
            vertex_count: geometry.vertex_count,
            instance_count: geometry.instance_count,
        }
    }

    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        match (&self.vertices, self.needs_vertices) {
            (Some(v), _) => rpass.set_vertex_buffer(0, v.slice(..)),
            (None, true) => return,
            (None, false) => {}
        }
        let instances = 0..self.instance_count;
        match &self.indices {
            Some(i) => {
                rpass.set_index_buffer(i.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.vertex_count, 0, instances);
            }
            None => rpass.draw(0..self.vertex_count, instances),
        }
    }
}

pub fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("surface_depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}
