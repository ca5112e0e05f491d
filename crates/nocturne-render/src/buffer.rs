//! Vertex, index, instance and uniform buffer creation.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

/// Indexed geometry uploaded to the GPU.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub index_format: wgpu::IndexFormat,
}

impl MeshBuffer {
    /// Bind vertex slot 0 and the index buffer.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
    }

    /// Draw the mesh once.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_instanced(render_pass, 1);
    }

    /// Draw the mesh `instances` times; per-instance data must already be bound.
    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: u32) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..instances);
    }
}

/// Index data that can be either u16 or u32 format.
pub enum IndexData<'a> {
    U16(&'a [u16]),
    U32(&'a [u32]),
}

impl IndexData<'_> {
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            IndexData::U16(_) => wgpu::IndexFormat::Uint16,
            IndexData::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            IndexData::U16(data) => data.len() as u32,
            IndexData::U32(data) => data.len() as u32,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(data) => bytemuck::cast_slice(data),
            IndexData::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Creates labelled buffers on a device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload a mesh from vertex bytes and index data.
    pub fn create_mesh(&self, label: &str, vertices: &[u8], indices: IndexData) -> MeshBuffer {
        let vertex_buffer = self.create_vertex_buffer(&format!("{label}-vertices"), vertices);
        let index_buffer = self.init(
            &format!("{label}-indices"),
            indices.as_bytes(),
            wgpu::BufferUsages::INDEX,
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.count(),
            index_format: indices.format(),
        }
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.init(label, data, wgpu::BufferUsages::VERTEX)
    }

    /// Per-instance attributes; uploaded once and bound to a vertex slot.
    pub fn create_instance_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.init(label, data, wgpu::BufferUsages::VERTEX)
    }

    /// Uniform block rewritten with `queue.write_buffer`.
    pub fn create_uniform_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.init(
            label,
            data,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
    }
}

/// Vertex with position, normal and UV coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::request_headless_device;

    #[test]
    fn test_index_data_format_and_count() {
        let short = [0u16, 1, 2, 2, 1, 3];
        let long = [0u32, 1, 2];
        assert_eq!(IndexData::U16(&short).format(), wgpu::IndexFormat::Uint16);
        assert_eq!(IndexData::U16(&short).count(), 6);
        assert_eq!(IndexData::U16(&short).as_bytes().len(), 12);
        assert_eq!(IndexData::U32(&long).format(), wgpu::IndexFormat::Uint32);
        assert_eq!(IndexData::U32(&long).as_bytes().len(), 12);
    }

    #[test]
    fn test_vertex_layout_stride_and_offsets() {
        let layout = VertexPositionNormalUv::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes.len(), 3);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_create_mesh_records_index_count() {
        let Some((device, _queue)) = request_headless_device() else {
            return;
        };
        let vertices = [VertexPositionNormalUv {
            position: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            uv: [0.0; 2],
        }; 4];
        let indices = [0u16, 1, 2, 2, 1, 3];

        let mesh = BufferAllocator::new(&device).create_mesh(
            "quad",
            bytemuck::cast_slice(&vertices),
            IndexData::U16(&indices),
        );
        assert_eq!(mesh.index_count, 6);
        assert_eq!(mesh.index_format, wgpu::IndexFormat::Uint16);
        assert_eq!(mesh.vertex_buffer.size(), 128);
    }

    #[test]
    fn test_uniform_buffer_is_writable() {
        let Some((device, _queue)) = request_headless_device() else {
            return;
        };
        let buffer = BufferAllocator::new(&device).create_uniform_buffer("test", &[0u8; 16]);
        assert!(buffer.usage().contains(wgpu::BufferUsages::UNIFORM));
        assert!(buffer.usage().contains(wgpu::BufferUsages::COPY_DST));
    }
}
