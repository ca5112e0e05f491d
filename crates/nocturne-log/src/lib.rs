//! Structured logging for Nocturne.
//!
//! Console output with uptime timestamps and module paths, plus a JSON log file
//! in debug builds. `log` records from the library crates and wgpu are bridged
//! into the same subscriber.

use nocturne_config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "nocturne.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - whether file logging is allowed at all
/// * `config` - optional configuration providing `debug.log_level` and `debug.log_to_file`
///
/// `RUST_LOG` always wins over the configured level.
///
/// ```no_run
/// use nocturne_config::Config;
///
/// let config = Config::default();
/// nocturne_log::init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let file_logging = config.is_none_or(|c| c.debug.log_to_file);
    if debug_build
        && file_logging
        && let Some(log_path) = log_dir.map(log_file_path)
        && let Some(parent) = log_path.parent()
        && std::fs::create_dir_all(parent).is_ok()
        && let Ok(log_file) = std::fs::File::create(&log_path)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter directive derived from the config, falling back to [`DEFAULT_FILTER`].
///
/// A bare level such as `"debug"` keeps wgpu and naga at `warn` so shader
/// validation chatter does not drown out the scene logs.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() && !level.contains(',') && !level.contains('=') => {
            format!("{level},wgpu=warn,naga=warn")
        }
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Location of the JSON log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}
