//! Reverse-Z depth buffer.
//!
//! Near maps to 1.0 and far to 0.0, so the buffer clears to 0.0 and opaque
//! geometry tests with `GreaterEqual`. Transparent passes test against it
//! without writing; overlays neither test nor write.

/// Depth texture sized to the surface.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 is the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Closer fragments have larger depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    /// Create a depth buffer; zero dimensions are clamped to 1. `sample_count`
    /// must match the color target it is paired with.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
            sample_count,
        }
    }

    /// Depth-stencil state for geometry that writes depth.
    pub fn opaque_state() -> wgpu::DepthStencilState {
        Self::state(true)
    }

    /// Depth-stencil state for geometry drawn over the scene regardless of
    /// depth: never tested, never written.
    pub fn overlay_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            depth_compare: wgpu::CompareFunction::Always,
            ..Self::state(false)
        }
    }

    fn state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled,
            depth_compare: Self::COMPARE_FUNCTION,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Recreate the texture for new dimensions. No-op when unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        log::debug!("Resizing depth buffer to {width}x{height}");
        *self = Self::new(device, width, height, self.sample_count);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}
