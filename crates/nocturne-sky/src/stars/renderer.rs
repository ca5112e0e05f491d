//! GPU renderer for the star field using instanced billboards.
//!
//! One unit quad is drawn per star; the vertex shader expands it around the
//! projected star center to the distance-scaled sprite size.

use bytemuck::{Pod, Zeroable};
use nocturne_render::{
    BufferAllocator, GpuTexture, IndexData, MeshBuffer, ObjectUniform, TextureError,
};

use super::Stars;
use super::material::{STAR_SHADER, StarMaterial, StarUniforms};

/// Corner of the billboard quad in `[-1, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex {
        position: [-1.0, -1.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
    },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Draws a [`Stars`] node. Positions and phases are uploaded once; only the
/// transform block and the animation uniforms change per frame.
pub struct StarRenderer {
    pipeline: wgpu::RenderPipeline,
    quad: MeshBuffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    object_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _mask: GpuTexture,
}

impl StarRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
        stars: &Stars,
    ) -> Result<Self, TextureError> {
        let mask = stars.material.mask();
        let mask_texture = GpuTexture::from_rgba8(
            device,
            queue,
            "star-sprite-mask",
            mask.side(),
            mask.side(),
            mask.as_rgba8(),
        )?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER.into()),
        });

        let [texture_entry, sampler_entry] = GpuTexture::layout_entries(2);
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("star-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ObjectUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<StarUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
                texture_entry,
                sampler_entry,
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[QuadVertex::LAYOUT, super::StarInstance::LAYOUT],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(StarMaterial::depth_state()),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(StarMaterial::blend_state()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let allocator = BufferAllocator::new(device);
        let quad = allocator.create_mesh(
            "star-quad",
            bytemuck::cast_slice(&QUAD_VERTICES),
            IndexData::U16(&QUAD_INDICES),
        );

        let instances = stars.field().instances();
        // A zero-sized vertex buffer is invalid; keep one dummy instance and draw none.
        let instance_bytes: &[u8] = if instances.is_empty() {
            &[0u8; std::mem::size_of::<super::StarInstance>()]
        } else {
            bytemuck::cast_slice(&instances)
        };
        let instance_buffer = allocator.create_instance_buffer("star-instances", instance_bytes);

        let object_buffer = allocator.create_uniform_buffer(
            "star-object",
            bytemuck::bytes_of(&ObjectUniform::zeroed()),
        );
        let uniform_buffer = allocator.create_uniform_buffer(
            "star-uniforms",
            bytemuck::bytes_of(&stars.material.uniforms.to_gpu(1, 1)),
        );

        let [texture_binding, sampler_binding] = mask_texture.bind_entries(2);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star-bg"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
                texture_binding,
                sampler_binding,
            ],
        });

        log::info!(
            "Star renderer initialized ({} instances, {}px sprite)",
            instances.len(),
            mask.side()
        );

        Ok(Self {
            pipeline,
            quad,
            instance_buffer,
            instance_count: instances.len() as u32,
            object_buffer,
            uniform_buffer,
            bind_group,
            _mask: mask_texture,
        })
    }

    /// Upload this frame's transform block and animation uniforms.
    pub fn update(&self, queue: &wgpu::Queue, object: &ObjectUniform, uniforms: &StarUniforms) {
        queue.write_buffer(&self.object_buffer, 0, bytemuck::bytes_of(object));
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Draw all stars. Call after opaque geometry.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        self.quad.bind(pass);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        self.quad.draw_instanced(pass, self.instance_count);
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::StarFieldOptions;
    use glam::Vec3;
    use nocturne_render::request_headless_device;

    #[test]
    fn test_quad_spans_unit_square() {
        for v in QUAD_VERTICES {
            assert_eq!(v.position[0].abs(), 1.0);
            assert_eq!(v.position[1].abs(), 1.0);
        }
        assert!(QUAD_INDICES.iter().all(|&i| i < 4));
    }

    #[test]
    fn test_renderer_uploads_one_instance_per_star() {
        let Some((device, queue)) = request_headless_device() else {
            return;
        };
        let stars = Stars::new(StarFieldOptions {
            point_count: 400,
            range: Vec3::new(110.0, 60.0, 30.0),
            size: 700.0,
            seed: Some(3),
            ..StarFieldOptions::default()
        });
        let renderer =
            StarRenderer::new(&device, &queue, wgpu::TextureFormat::Rgba8UnormSrgb, 4, &stars)
                .unwrap();
        assert_eq!(renderer.instance_count(), 400);
    }

    #[test]
    fn test_empty_field_draws_nothing() {
        let Some((device, queue)) = request_headless_device() else {
            return;
        };
        let stars = Stars::new(StarFieldOptions {
            point_count: 0,
            ..StarFieldOptions::default()
        });
        let renderer =
            StarRenderer::new(&device, &queue, wgpu::TextureFormat::Rgba8UnormSrgb, 4, &stars)
                .unwrap();
        assert_eq!(renderer.instance_count(), 0);
    }
}
