//! Everything that happens before logging exists: directories and config.

use nocturne_config::{CliArgs, Config, ConfigError};

use crate::error::AppError;
use crate::platform::PlatformDirs;

/// Result of startup: where files live and the config to run with.
#[derive(Debug)]
pub struct Startup {
    pub dirs: PlatformDirs,
    pub config: Config,
    /// Load failure that was tolerated by falling back to defaults. Logged
    /// once the subscriber is installed.
    pub config_fallback: Option<ConfigError>,
}

/// Resolve and create the directories, load the config and apply the CLI
/// overrides.
///
/// A config directory named with `--config` must hold a usable config; the
/// default location falls back to [`Config::default`] instead.
pub fn prepare(args: &CliArgs) -> Result<Startup, AppError> {
    let dirs = PlatformDirs::from_override(args.config.as_deref())?;
    dirs.create_dirs()?;

    let (mut config, config_fallback) = load_config(&dirs, args.config.is_some())?;
    config.apply_cli_overrides(args);

    Ok(Startup {
        dirs,
        config,
        config_fallback,
    })
}

/// Load `config.ron` from `dirs`. Errors are returned only when `explicit`.
pub fn load_config(
    dirs: &PlatformDirs,
    explicit: bool,
) -> Result<(Config, Option<ConfigError>), ConfigError> {
    match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => Ok((config, None)),
        Err(err) if explicit => Err(err),
        Err(err) => Ok((Config::default(), Some(err))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformError;
    use clap::Parser;

    fn args_for(dir: &std::path::Path, extra: &[&str]) -> CliArgs {
        let mut argv = vec!["nocturne", "--config", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_prepare_creates_config_and_applies_overrides() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nocturne");
        let startup = prepare(&args_for(&dir, &["--stars", "12", "--msaa", "1"])).unwrap();

        assert_eq!(startup.dirs.config_dir, dir);
        assert!(startup.dirs.log_dir.is_dir());
        assert!(Config::path_in(&dir).exists());
        assert!(startup.config_fallback.is_none());
        assert_eq!(startup.config.stars.point_count, 12);
        assert_eq!(startup.config.window.msaa_samples, 1);
    }

    #[test]
    fn test_explicit_dir_with_bad_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(Config::path_in(dir.path()), "not ron {{{").unwrap();

        let err = prepare(&args_for(dir.path(), &[])).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_uncreatable_dir_is_platform_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, b"file, not a directory").unwrap();

        let err = prepare(&args_for(&blocker, &[])).unwrap_err();
        assert!(matches!(
            err,
            AppError::Platform(PlatformError::CreateDir { .. })
        ));
    }

    #[test]
    fn test_default_location_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_config_dir(dir.path().to_path_buf());
        std::fs::write(Config::path_in(&dirs.config_dir), "(window: 3)").unwrap();

        let (config, fallback) = load_config(&dirs, false).unwrap();
        assert_eq!(config.stars.point_count, Config::default().stars.point_count);
        assert!(matches!(fallback, Some(ConfigError::Parse { .. })));

        assert!(load_config(&dirs, true).is_err());
    }
}
