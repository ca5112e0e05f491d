//! Surface sizing that normalizes platform-specific resize behavior.
//!
//! Wayland can report a zero-size window before the compositor assigns one,
//! and HiDPI displays change the physical size when the scale factor moves.
//! [`SurfaceWrapper`] tracks the physical size the GPU surface must use and
//! reports a [`SurfaceResizeEvent`] only when it actually changes.

/// Minimum surface dimension (prevents zero-size panics).
pub const MIN_SURFACE_DIMENSION: u32 = 1;

/// Physical pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl PhysicalSize {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Produced when the surface dimensions or scale factor change.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceResizeEvent {
    /// New physical pixel dimensions.
    pub physical: PhysicalSize,
    /// Current scale factor.
    pub scale_factor: f64,
}

/// Tracks the physical size of the window surface.
///
/// Dimensions are clamped to 1×1 so a minimized window still yields a valid
/// surface configuration.
pub struct SurfaceWrapper {
    size: PhysicalSize,
    scale_factor: f64,
}

impl SurfaceWrapper {
    /// Creates a wrapper from the initial physical size and scale factor.
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            size: clamp_size(physical_width, physical_height),
            scale_factor,
        }
    }

    /// Handle a window resize. Returns an event if the dimensions changed.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let size = clamp_size(physical_width, physical_height);
        if size == self.size {
            return None;
        }

        self.size = size;

        Some(SurfaceResizeEvent {
            physical: size,
            scale_factor: self.scale_factor,
        })
    }

    /// Handle a scale factor change, which arrives with a new physical size.
    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    /// Current physical pixel dimensions for surface configuration.
    pub fn physical_size(&self) -> PhysicalSize {
        self.size
    }

    /// Current logical size (physical / scale factor).
    pub fn logical_size(&self) -> (f64, f64) {
        (
            self.size.width as f64 / self.scale_factor,
            self.size.height as f64 / self.scale_factor,
        )
    }

    /// Current scale factor.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_surface_waits_for_compositor() {
        let mut wrapper = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 1,
                height: 1
            }
        );

        let event = wrapper.handle_resize(1920, 1080).expect("size changed");
        assert_eq!(event.physical.width, 1920);
        assert_eq!(event.physical.height, 1080);
    }

    #[test]
    fn test_no_event_on_same_dimensions() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        assert!(wrapper.handle_resize(1920, 1080).is_none());
    }

    #[test]
    fn test_last_resize_wins() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        wrapper.handle_resize(1024, 768);
        wrapper.handle_resize(640, 480);
        assert_eq!(
            wrapper.physical_size(),
            PhysicalSize {
                width: 640,
                height: 480
            }
        );
    }

    #[test]
    fn test_scale_factor_change_updates_physical_size() {
        let mut wrapper = SurfaceWrapper::new(1920, 1080, 1.0);
        let event = wrapper
            .handle_scale_factor_changed(2.0, 3840, 2160)
            .expect("size changed");
        assert_eq!(event.physical.width, 3840);
        assert_eq!(event.scale_factor, 2.0);

        let (lw, lh) = wrapper.logical_size();
        assert!((lw - 1920.0).abs() < 1e-9);
        assert!((lh - 1080.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_dimensions_clamped_to_one() {
        let mut wrapper = SurfaceWrapper::new(800, 600, 1.0);
        assert!(wrapper.handle_resize(0, 0).is_some());
        let size = wrapper.physical_size();
        assert_eq!((size.width, size.height), (1, 1));
    }

    #[test]
    fn test_aspect_ratio() {
        let size = PhysicalSize {
            width: 1600,
            height: 900,
        };
        assert!((size.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
