//! Render pass configuration and per-frame command encoding.

/// Opaque black background of the night sky.
pub const NIGHT_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Builder for the color and depth attachments of a render pass.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth: Option<(wgpu::TextureView, f32)>,
    msaa_view: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Create a builder clearing to [`NIGHT_BLACK`] with no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: NIGHT_BLACK,
            depth: None,
            msaa_view: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a depth buffer, cleared to `clear_value` at the start of the pass.
    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some((view, clear_value));
        self
    }

    /// Render into a multisampled view and resolve it into the frame's
    /// color target at the end of the pass.
    pub fn msaa_resolve(mut self, multisampled_view: wgpu::TextureView) -> Self {
        self.msaa_view = Some(multisampled_view);
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = match &self.msaa_view {
            Some(msaa_view) => wgpu::RenderPassColorAttachment {
                view: msaa_view,
                resolve_target: Some(color_view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Discard,
                },
                depth_slice: None,
            },
            None => wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            },
        };

        let depth_stencil_attachment =
            self.depth
                .as_ref()
                .map(|(view, clear_value)| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(*clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's command encoder bound to the acquired surface texture.
///
/// [`FrameEncoder::submit`] consumes the encoder, so a frame can only be
/// presented once.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(device: &wgpu::Device, surface_texture: wgpu::SurfaceTexture) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            surface_texture,
            surface_view,
        }
    }

    /// Begin a render pass targeting the surface texture.
    pub fn begin_render_pass<'a>(&'a mut self, builder: &RenderPassBuilder) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit the recorded commands and present the surface texture.
    pub fn submit(self, queue: &wgpu::Queue) {
        queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}
