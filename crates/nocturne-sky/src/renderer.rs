//! Draws a [`SkyScene`] into one render pass: opaque moon first, then the
//! additive star field.

use nocturne_render::{
    Camera, DepthBuffer, FrameEncoder, MsaaTarget, RenderPassBuilder, TextureError,
};

use crate::moon::MoonRenderer;
use crate::scene::{NodeKind, SceneNode, SkyScene};
use crate::stars::StarRenderer;

/// GPU resources for every node of a [`SkyScene`], plus the depth buffer
/// and, when multisampling, the color target resolved into the surface.
pub struct SkyRenderer {
    moon: Option<MoonRenderer>,
    stars: StarRenderer,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
}

impl SkyRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
        scene: &SkyScene,
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError> {
        let sample_count = sample_count.max(1);
        let moon = scene
            .moon
            .as_ref()
            .map(|moon| MoonRenderer::new(device, target_format, sample_count, moon));
        let stars = StarRenderer::new(device, queue, target_format, sample_count, &scene.stars)?;
        let depth = DepthBuffer::new(device, width, height, sample_count);
        let msaa = (sample_count > 1)
            .then(|| MsaaTarget::new(device, target_format, width, height, sample_count));

        Ok(Self {
            moon,
            stars,
            depth,
            msaa,
        })
    }

    /// Follow a surface resize.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, width, height);
        }
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn sample_count(&self) -> u32 {
        self.depth.sample_count()
    }

    /// Upload per-frame transforms and the star animation uniforms.
    pub fn prepare(&self, queue: &wgpu::Queue, scene: &SkyScene, camera: &Camera) {
        if let (Some(renderer), Some(moon)) = (&self.moon, &scene.moon) {
            renderer.update(queue, &camera.object_uniform(moon.model_matrix()));
        }

        let uniforms = scene
            .stars
            .material
            .uniforms
            .to_gpu(self.depth.width(), self.depth.height());
        self.stars.update(
            queue,
            &camera.object_uniform(scene.stars.model_matrix()),
            &uniforms,
        );
    }

    /// Record the sky pass into `frame`.
    pub fn encode(&self, frame: &mut FrameEncoder, scene: &SkyScene, camera: &Camera) {
        let [r, g, b] = scene.background;
        let mut builder = RenderPassBuilder::new()
            .clear_color(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            })
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("sky-pass");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa_resolve(msaa.view.clone());
        }

        let mut pass = frame.begin_render_pass(&builder);
        for kind in scene.draw_order(camera) {
            match kind {
                NodeKind::Moon => {
                    if let Some(moon) = &self.moon {
                        moon.render(&mut pass);
                    }
                }
                NodeKind::Stars => self.stars.render(&mut pass),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nocturne_config::Config;
    use nocturne_render::request_headless_device;

    #[test]
    fn test_sky_renderer_resize_follows_surface() {
        let Some((device, queue)) = request_headless_device() else {
            return;
        };
        let scene = SkyScene::from_config(&Config::default());
        let mut renderer = SkyRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            1,
            &scene,
            1280,
            720,
        )
        .unwrap();
        assert!(renderer.moon.is_some());
        assert!(renderer.msaa.is_none());

        renderer.resize(&device, 800, 600);
        assert_eq!((renderer.depth().width(), renderer.depth().height()), (800, 600));

        let camera = Camera::default();
        renderer.prepare(&queue, &scene, &camera);
    }

    #[test]
    fn test_multisampled_targets_share_sample_count() {
        let Some((device, queue)) = request_headless_device() else {
            return;
        };
        let scene = SkyScene::from_config(&Config::default());
        let mut renderer = SkyRenderer::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            4,
            &scene,
            1280,
            720,
        )
        .unwrap();
        assert_eq!(renderer.sample_count(), 4);
        assert_eq!(renderer.msaa.as_ref().map(MsaaTarget::sample_count), Some(4));

        renderer.resize(&device, 640, 480);
        let msaa = renderer.msaa.as_ref().unwrap();
        assert_eq!((msaa.width(), msaa.height()), (640, 480));
        assert_eq!(renderer.depth().sample_count(), 4);
    }
}
