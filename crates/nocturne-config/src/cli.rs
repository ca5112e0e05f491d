//! Command-line argument parsing for Nocturne.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Nocturne command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nocturne", about = "Animated night sky with a moon and twinkling stars")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// MSAA sample count (1 disables multisampling).
    #[arg(long)]
    pub msaa: Option<u32>,

    /// Number of stars.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Base star sprite size.
    #[arg(long)]
    pub star_size: Option<f32>,

    /// Seed for a reproducible star field.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Leave the moon out of the scene.
    #[arg(long)]
    pub no_moon: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(samples) = args.msaa {
            self.window.msaa_samples = samples;
        }
        if let Some(count) = args.stars {
            self.stars.point_count = count;
        }
        if let Some(size) = args.star_size {
            self.stars.size = size;
        }
        if args.seed.is_some() {
            self.stars.seed = args.seed;
        }
        if args.no_moon {
            self.moon.enabled = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
