//! Multisampled color target resolved into the surface each frame.

/// Sample counts tried from highest to lowest. 1 is always available.
const SAMPLE_COUNTS: [u32; 4] = [8, 4, 2, 1];

/// Highest sample count not above `requested` that `is_supported` accepts.
/// Zero is treated as 1.
pub fn pick_sample_count(requested: u32, is_supported: impl Fn(u32) -> bool) -> u32 {
    SAMPLE_COUNTS
        .into_iter()
        .filter(|&count| count <= requested.max(1))
        .find(|&count| count == 1 || is_supported(count))
        .unwrap_or(1)
}

/// Color texture with `sample_count > 1`, sized to the surface.
pub struct MsaaTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl MsaaTarget {
    /// Create the target; zero dimensions are clamped to 1.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            format,
            width,
            height,
            sample_count,
        }
    }

    /// Recreate the texture for new dimensions. No-op when unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, self.format, width, height, self.sample_count);
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
