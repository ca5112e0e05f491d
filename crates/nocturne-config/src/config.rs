//! Configuration structs with scene defaults and RON persistence.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Viewing camera.
    pub camera: CameraConfig,
    /// Twinkling star field.
    pub stars: StarsConfig,
    /// Gradient-shaded moon.
    pub moon: MoonConfig,
    /// Scene light descriptions.
    pub lights: LightsConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
    /// MSAA sample count (1 disables multisampling).
    pub msaa_samples: u32,
}

/// Perspective camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Camera position in world space.
    pub position: [f32; 3],
}

/// Star field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarsConfig {
    /// Number of stars.
    pub point_count: u32,
    /// Full width of the box the stars are scattered in, per axis.
    pub range: [f32; 3],
    /// Base sprite size; the on-screen size is `size / camera_distance` pixels.
    pub size: f32,
    /// Base tint as `0xRRGGBB`.
    pub color: u32,
    /// Position of the star group in world space.
    pub position: [f32; 3],
    /// Side length of the circular sprite mask in texels.
    pub sprite_resolution: u32,
    /// Fixed seed for a reproducible field. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Moon configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoonConfig {
    /// Whether the moon is part of the scene.
    pub enabled: bool,
    /// Sphere radius.
    pub radius: f32,
    /// Longitudinal segments.
    pub width_segments: u32,
    /// Latitudinal segments.
    pub height_segments: u32,
    /// Position in world space.
    pub position: [f32; 3],
    /// Euler rotation (XYZ order) in radians.
    pub rotation: [f32; 3],
    /// Gradient color below the band, `0xRRGGBB`.
    pub color_a: u32,
    /// Gradient color above the band, `0xRRGGBB`.
    pub color_b: u32,
}

/// Scene light configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightsConfig {
    /// Ambient light color, `0xRRGGBB`.
    pub ambient_color: u32,
    /// Intensity of the white directional light placed at the moon.
    pub moon_light_intensity: f32,
    /// Intensity of the white key light.
    pub key_light_intensity: f32,
    /// Position of the key light.
    pub key_light_position: [f32; 3],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file in debug builds.
    pub log_to_file: bool,
    /// Seconds between frame statistics log lines (0 disables them).
    pub stats_interval_secs: f32,
}

/// Convert a `0xRRGGBB` color into normalized RGB components.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Nocturne".to_string(),
            msaa_samples: 4,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 40.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 0.0, 4.0],
        }
    }
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            point_count: 400,
            range: [110.0, 60.0, 30.0],
            size: 700.0,
            color: 0xffffff,
            position: [0.0, 0.0, -50.0],
            sprite_resolution: 128,
            seed: None,
        }
    }
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 2.0,
            width_segments: 32,
            height_segments: 32,
            position: [-3.0, 4.0, -20.0],
            rotation: [-FRAC_PI_2, -FRAC_PI_6, FRAC_PI_4],
            color_a: 0x000000,
            color_b: 0xffffff,
        }
    }
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0x7f46ab,
            moon_light_intensity: 0.8,
            key_light_intensity: 0.2,
            key_light_position: [1.0, 1.0, 1.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
            stats_interval_secs: 5.0,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Path of `config.ron` inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::path_in(config_dir);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = Self::path_in(config_dir);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("point_count: 400"));
        assert!(ron_str.contains("sprite_resolution: 128"));
    }

    #[test]
    fn test_default_scene_values() {
        let config = Config::default();
        assert_eq!(config.stars.point_count, 400);
        assert_eq!(config.stars.range, [110.0, 60.0, 30.0]);
        assert_eq!(config.stars.size, 700.0);
        assert_eq!(config.stars.position[2], -50.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 4.0]);
        assert_eq!(config.moon.position, [-3.0, 4.0, -20.0]);
        assert_eq!(config.window.msaa_samples, 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.stars.seed = Some(7);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), stars: (point_count: 12))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.stars.point_count, 12);
        assert_eq!(config.stars.range, StarsConfig::default().range);
        assert_eq!(config.moon, MoonConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(speed: 0.1)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_rgb_conversion() {
        assert_eq!(rgb(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = rgb(0x7f46ab);
        assert!((r - 127.0 / 255.0).abs() < 1e-6);
        assert!((g - 70.0 / 255.0).abs() < 1e-6);
        assert!((b - 171.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.stars.point_count = 1000;
        config.moon.enabled = false;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(Config::path_in(dir.path()).exists());
    }

    #[test]
    fn test_invalid_ron_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::path_in(dir.path()), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
