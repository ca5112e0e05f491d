//! Scene light descriptions.
//!
//! The moon gradient and star materials are unlit, so these lights are scene
//! data only: they are built from configuration, logged, and exposed for
//! materials that choose to read them.

use glam::Vec3;
use nocturne_config::{LightsConfig, rgb};

/// Uniform light applied equally to every surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    /// Linear RGB color.
    pub color: Vec3,
}

/// Infinitely distant light shining from `position` toward the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    /// Linear RGB color, not premultiplied by intensity.
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Normalized direction pointing FROM the light toward its target.
    /// Falls back to straight down when the light sits at the origin.
    pub fn direction(&self) -> Vec3 {
        (-self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }

    /// Color scaled by intensity.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// The three lights of the night sky.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLights {
    pub ambient: AmbientLight,
    /// White light placed at the moon.
    pub moon_light: DirectionalLight,
    /// Dim white key light.
    pub key_light: DirectionalLight,
}

impl SceneLights {
    pub fn from_config(config: &LightsConfig, moon_position: Vec3) -> Self {
        Self {
            ambient: AmbientLight {
                color: Vec3::from_array(rgb(config.ambient_color)),
            },
            moon_light: DirectionalLight {
                position: moon_position,
                color: Vec3::ONE,
                intensity: config.moon_light_intensity,
            },
            key_light: DirectionalLight {
                position: Vec3::from_array(config.key_light_position),
                color: Vec3::ONE,
                intensity: config.key_light_intensity,
            },
        }
    }

    pub(crate) fn log_summary(&self) {
        log::debug!(
            "Lights: ambient {:?}, moon light {:?} toward {:?}, key light {:?} toward {:?}",
            self.ambient.color.to_array(),
            self.moon_light.radiance().to_array(),
            self.moon_light.direction().to_array(),
            self.key_light.radiance().to_array(),
            self.key_light.direction().to_array(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lights() -> SceneLights {
        SceneLights::from_config(&LightsConfig::default(), Vec3::new(-3.0, 4.0, -20.0))
    }

    #[test]
    fn test_ambient_color_from_hex() {
        let ambient = lights().ambient.color;
        assert!((ambient.x - 127.0 / 255.0).abs() < 1e-6);
        assert!((ambient.y - 70.0 / 255.0).abs() < 1e-6);
        assert!((ambient.z - 171.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_moon_light_follows_moon() {
        let lights = lights();
        assert_eq!(lights.moon_light.position, Vec3::new(-3.0, 4.0, -20.0));
        assert_eq!(lights.moon_light.intensity, 0.8);
        let dir = lights.moon_light.direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.z > 0.0, "moon light should shine toward the viewer");
    }

    #[test]
    fn test_key_light() {
        let key = lights().key_light;
        assert_eq!(key.intensity, 0.2);
        let expected = Vec3::new(-1.0, -1.0, -1.0).normalize();
        assert!((key.direction() - expected).length() < 1e-6);
        assert_eq!(key.radiance(), Vec3::splat(0.2));
    }

    #[test]
    fn test_light_at_origin_points_down() {
        let light = DirectionalLight {
            position: Vec3::ZERO,
            color: Vec3::ONE,
            intensity: 1.0,
        };
        assert_eq!(light.direction(), Vec3::NEG_Y);
    }
}
