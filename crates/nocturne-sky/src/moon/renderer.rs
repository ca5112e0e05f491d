//! GPU renderer for the gradient-shaded moon.

use bytemuck::{Pod, Zeroable};
use nocturne_render::{
    BufferAllocator, DepthBuffer, IndexData, MeshBuffer, ObjectUniform, VertexPositionNormalUv,
};

use super::{BAND_HIGH, BAND_LOW, GradientMaterial, Moon};

/// WGSL for the unlit gradient sphere.
pub const MOON_SHADER: &str = r#"
struct ObjectUniform {
    model_view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

struct GradientUniforms {
    color_a: vec3<f32>,
    band_low: f32,
    color_b: vec3<f32>,
    band_high: f32,
};

@group(0) @binding(0) var<uniform> transforms: ObjectUniform;
@group(0) @binding(1) var<uniform> gradient: GradientUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_moon(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = transforms.projection * transforms.model_view * vec4<f32>(in.position, 1.0);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_moon(in: VertexOutput) -> @location(0) vec4<f32> {
    let pct = smoothstep(gradient.band_low, gradient.band_high, in.uv.y);
    return vec4<f32>(mix(gradient.color_a, gradient.color_b, pct), 1.0);
}
"#;

/// GPU layout of [`GradientMaterial`] with the band edges packed in.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GradientUniforms {
    pub color_a: [f32; 3],
    pub band_low: f32,
    pub color_b: [f32; 3],
    pub band_high: f32,
}

impl From<&GradientMaterial> for GradientUniforms {
    fn from(material: &GradientMaterial) -> Self {
        Self {
            color_a: material.color_a,
            band_low: BAND_LOW,
            color_b: material.color_b,
            band_high: BAND_HIGH,
        }
    }
}

/// Draws a [`Moon`] node in the opaque pass. The gradient is static, so only
/// the transform block is rewritten per frame.
pub struct MoonRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
    object_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MoonRenderer {
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
        moon: &Moon,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("moon-shader"),
            source: wgpu::ShaderSource::Wgsl(MOON_SHADER.into()),
        });

        let uniform_entry = |binding, visibility, size: usize| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size as u64),
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("moon-bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    std::mem::size_of::<ObjectUniform>(),
                ),
                uniform_entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    std::mem::size_of::<GradientUniforms>(),
                ),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("moon-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("moon-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_moon"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::opaque_state()),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_moon"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let allocator = BufferAllocator::new(device);
        let mesh = allocator.create_mesh(
            "moon",
            bytemuck::cast_slice(&moon.mesh.vertices),
            IndexData::U32(&moon.mesh.indices),
        );
        let object_buffer = allocator.create_uniform_buffer(
            "moon-object",
            bytemuck::bytes_of(&ObjectUniform::zeroed()),
        );
        let gradient_buffer = allocator.create_uniform_buffer(
            "moon-gradient",
            bytemuck::bytes_of(&GradientUniforms::from(&moon.material)),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("moon-bg"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: gradient_buffer.as_entire_binding(),
                },
            ],
        });

        log::info!(
            "Moon renderer initialized ({} triangles)",
            mesh.index_count / 3
        );

        Self {
            pipeline,
            mesh,
            object_buffer,
            bind_group,
        }
    }

    /// Upload this frame's transform block.
    pub fn update(&self, queue: &wgpu::Queue, object: &ObjectUniform) {
        queue.write_buffer(&self.object_buffer, 0, bytemuck::bytes_of(object));
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        self.mesh.bind(pass);
        self.mesh.draw(pass);
    }
}
