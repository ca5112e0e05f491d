use clap::Parser;
use nocturne_app::AppError;
use nocturne_config::CliArgs;

fn main() {
    let args = CliArgs::parse();

    let startup = match nocturne_app::startup::prepare(&args) {
        Ok(startup) => startup,
        Err(err) => {
            // No config yet, so log to the console only.
            nocturne_log::init_logging(None, false, None);
            report(&err);
            std::process::exit(1);
        }
    };
    let dirs = startup.dirs;
    let config = startup.config;

    nocturne_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    if let Some(err) = startup.config_fallback {
        tracing::warn!("Using default config: {err}");
    }
    tracing::info!(
        config_dir = %dirs.config_dir.display(),
        stars = config.stars.point_count,
        moon = config.moon.enabled,
        msaa = config.window.msaa_samples,
        "Starting Nocturne"
    );

    if let Err(err) = nocturne_app::run(config) {
        report(&err);
        std::process::exit(1);
    }
}

fn report(err: &AppError) {
    tracing::error!("{err}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        tracing::error!("  caused by: {cause}");
        source = cause.source();
    }
}
