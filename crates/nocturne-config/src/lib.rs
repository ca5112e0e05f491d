//! Configuration system for Nocturne.
//!
//! Scene constants (star count, bounds, sprite size, tints, camera) live in a
//! RON file so they can be tuned without recompiling. Supports CLI overrides
//! via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, LightsConfig, MoonConfig, StarsConfig, WindowConfig, rgb,
};
pub use error::ConfigError;
