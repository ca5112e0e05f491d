//! Per-user directories for the configuration file and logs.

use std::io;
use std::path::{Path, PathBuf};

/// Directory name used under the OS configuration directory.
pub const APP_NAME: &str = "nocturne";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    /// A directory could not be created.
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where Nocturne keeps `config.ron` and its log file.
///
/// Resolves to `<config dir>/nocturne/config` and `<config dir>/nocturne/logs`
/// following OS conventions (XDG on Linux, Known Folders on Windows, Library
/// on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve the OS directories without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Resolve directories under `root` instead of the OS location.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Use `config_dir` as given, with logs in a `logs` folder beside it.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        let log_dir = config_dir.join("logs");
        Self {
            config_dir,
            log_dir,
        }
    }

    /// Resolve from an optional `--config` override, falling back to the OS
    /// location.
    pub fn from_override(config_dir: Option<&Path>) -> Result<Self, PlatformError> {
        match config_dir {
            Some(dir) => Ok(Self::with_config_dir(dir.to_path_buf())),
            None => Self::resolve(),
        }
    }

    /// Create both directories on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
