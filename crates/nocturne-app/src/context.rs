//! The single owner of camera, scene and GPU resources.

use std::sync::Arc;

use glam::Vec3;
use nocturne_config::Config;
use nocturne_render::{
    Camera, FrameEncoder, RenderContext, SurfaceError, SurfaceResizeEvent, SurfaceWrapper,
    init_render_context_blocking,
};
use nocturne_sky::{SkyRenderer, SkyScene};
use tracing::{info, instrument, warn};
use winit::window::Window;

use crate::error::AppError;
use crate::render_loop::FrameSink;

/// GPU half of the context. Absent until a window exists.
struct GpuState {
    render: RenderContext,
    sky: SkyRenderer,
}

/// Application context borrowed by the render loop on every tick.
///
/// Without a GPU attached, frames are accepted and dropped, which keeps the
/// animation state testable on machines without a display.
pub struct SkyContext {
    pub camera: Camera,
    pub scene: SkyScene,
    surface: SurfaceWrapper,
    /// Requested MSAA sample count. The adapter may lower it on attach.
    msaa_samples: u32,
    gpu: Option<GpuState>,
}

impl SkyContext {
    /// Build the camera and scene. The surface starts at the configured
    /// window size until a real window reports its own.
    pub fn new(config: &Config) -> Self {
        let surface = SurfaceWrapper::new(config.window.width, config.window.height, 1.0);
        let size = surface.physical_size();
        let camera = Camera::perspective(
            config.camera.fov_y_degrees,
            size.aspect_ratio(),
            config.camera.near,
            config.camera.far,
        )
        .with_position(Vec3::from_array(config.camera.position));

        Self {
            camera,
            scene: SkyScene::from_config(config),
            surface,
            msaa_samples: config.window.msaa_samples,
            gpu: None,
        }
    }

    /// Create the GPU context for `window` and upload the scene.
    #[instrument(skip_all)]
    pub fn attach_gpu(&mut self, window: Arc<Window>, vsync: bool) -> Result<(), AppError> {
        let inner = window.inner_size();
        self.surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        let size = self.surface.physical_size();
        self.camera
            .set_aspect_ratio(size.width as f32, size.height as f32);

        let render = init_render_context_blocking(window, vsync)?;
        let sample_count = render.supported_sample_count(self.msaa_samples);
        let sky = SkyRenderer::new(
            &render.device,
            &render.queue,
            render.surface_format,
            sample_count,
            &self.scene,
            size.width,
            size.height,
        )?;
        info!(
            width = size.width,
            height = size.height,
            msaa = sky.sample_count(),
            "GPU attached"
        );

        self.gpu = Some(GpuState { render, sky });
        Ok(())
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn surface(&self) -> &SurfaceWrapper {
        &self.surface
    }

    /// Follow a window resize. Only the camera aspect, the surface and the
    /// depth buffer change; time and star positions stay untouched.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<SurfaceResizeEvent> {
        let event = self.surface.handle_resize(width, height)?;
        self.apply_resize(&event);
        Some(event)
    }

    /// Follow a DPI change, which arrives with a new physical size.
    pub fn rescale(
        &mut self,
        scale_factor: f64,
        width: u32,
        height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let event = self
            .surface
            .handle_scale_factor_changed(scale_factor, width, height)?;
        self.apply_resize(&event);
        Some(event)
    }

    fn apply_resize(&mut self, event: &SurfaceResizeEvent) {
        let size = event.physical;
        self.camera
            .set_aspect_ratio(size.width as f32, size.height as f32);

        if let Some(gpu) = &mut self.gpu {
            gpu.render.resize(size.width, size.height);
            gpu.sky.resize(&gpu.render.device, size.width, size.height);
        }

        info!(
            width = size.width,
            height = size.height,
            scale = event.scale_factor,
            "Surface resized"
        );
    }
}

impl FrameSink for SkyContext {
    type Error = SurfaceError;

    fn set_elapsed_time(&mut self, seconds: f32) {
        self.scene.set_elapsed_time(seconds);
    }

    /// Draw one frame. A lost surface or a timeout skips the frame; only
    /// running out of memory is reported.
    fn render_frame(&mut self) -> Result<(), SurfaceError> {
        let Some(gpu) = &self.gpu else {
            return Ok(());
        };

        let surface_texture = match gpu.render.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                warn!("Surface acquisition timed out, skipping frame");
                return Ok(());
            }
            Err(SurfaceError::Lost) => {
                warn!("Surface still lost after reconfigure, skipping frame");
                return Ok(());
            }
            Err(err @ SurfaceError::OutOfMemory) => return Err(err),
        };

        gpu.sky.prepare(&gpu.render.queue, &self.scene, &self.camera);
        let mut frame = FrameEncoder::new(&gpu.render.device, surface_texture);
        gpu.sky.encode(&mut frame, &self.scene, &self.camera);
        frame.submit(&gpu.render.queue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::render_loop::{RenderLoop, StopSignal};

    fn night_sky_config() -> Config {
        let mut config = Config::default();
        config.stars.point_count = 400;
        config.stars.range = [110.0, 60.0, 30.0];
        config.stars.size = 700.0;
        config.stars.seed = Some(7);
        config
    }

    #[test]
    fn test_context_without_gpu() {
        let context = SkyContext::new(&Config::default());
        assert!(!context.has_gpu());
        let size = context.surface().physical_size();
        assert_eq!((size.width, size.height), (1280, 720));
        assert!((context.camera.aspect_ratio() - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_msaa_samples_from_config() {
        assert_eq!(SkyContext::new(&Config::default()).msaa_samples, 4);

        let mut config = Config::default();
        config.window.msaa_samples = 1;
        assert_eq!(SkyContext::new(&config).msaa_samples, 1);
    }

    #[test]
    fn test_camera_from_config() {
        let context = SkyContext::new(&Config::default());
        assert_eq!(context.camera.position, Vec3::new(0.0, 0.0, 4.0));
        assert!((context.camera.fov_y - 40f32.to_radians()).abs() < 1e-6);
        assert_eq!(context.camera.near, 0.1);
        assert_eq!(context.camera.far, 1000.0);
    }

    #[test]
    fn test_first_tick_at_zero_gives_half_alpha() {
        let mut context = SkyContext::new(&night_sky_config());
        let mut render_loop = RenderLoop::new(ManualClock::new(), 0.0);

        assert_eq!(render_loop.tick(&mut context), Ok(true));
        assert_eq!(context.scene.elapsed_time(), 0.0);
        assert_eq!(context.scene.stars.field().len(), 400);

        let alpha = context.scene.stars.alpha(0).unwrap();
        assert!((alpha - 0.5).abs() < 1e-6, "alpha_0 = {alpha}");
    }

    #[test]
    fn test_ticks_publish_clock_to_scene() {
        let stop = StopSignal::new();
        let mut context = SkyContext::new(&night_sky_config());
        let mut render_loop =
            RenderLoop::new(ManualClock::new(), 0.0).with_stop_signal(stop.clone());

        for _ in 0..3 {
            render_loop.clock_mut().advance(0.75);
            render_loop.tick(&mut context).unwrap();
        }
        assert!((context.scene.elapsed_time() - 2.25).abs() < 1e-6);

        stop.stop();
        assert_eq!(render_loop.tick(&mut context), Ok(false));
        assert_eq!(render_loop.frame_count(), 3);
    }

    #[test]
    fn test_resize_updates_aspect_only() {
        let mut context = SkyContext::new(&night_sky_config());
        let mut render_loop = RenderLoop::new(ManualClock::new(), 0.0);
        render_loop.clock_mut().advance(3.0);
        render_loop.tick(&mut context).unwrap();

        let positions = context.scene.stars.field().positions().to_vec();
        let time = context.scene.elapsed_time();

        let event = context.resize(800, 600).unwrap();
        assert_eq!((event.physical.width, event.physical.height), (800, 600));
        assert!((context.camera.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(context.scene.elapsed_time(), time);
        assert_eq!(context.scene.stars.field().positions(), positions.as_slice());
    }

    #[test]
    fn test_last_resize_wins() {
        let mut context = SkyContext::new(&Config::default());
        context.resize(640, 480);
        context.resize(1920, 1080);
        context.resize(1000, 500);
        assert!((context.camera.aspect_ratio() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_size_resize_is_ignored() {
        let mut context = SkyContext::new(&Config::default());
        assert!(context.resize(1280, 720).is_none());
    }

    #[test]
    fn test_minimized_window_keeps_valid_aspect() {
        let mut context = SkyContext::new(&Config::default());
        context.resize(0, 0);
        assert!(context.camera.aspect_ratio().is_finite());
        assert!(context.camera.aspect_ratio() > 0.0);
    }

    #[test]
    fn test_rescale_tracks_scale_factor() {
        let mut context = SkyContext::new(&Config::default());
        let event = context.rescale(2.0, 2560, 1440).unwrap();
        assert_eq!(event.scale_factor, 2.0);
        assert_eq!(context.surface().logical_size(), (1280.0, 720.0));
    }
}
