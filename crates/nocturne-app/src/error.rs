//! Top-level application error.

use nocturne_config::ConfigError;
use nocturne_render::{RenderContextError, SurfaceError, TextureError};

use crate::platform::PlatformError;

/// Every failure that ends the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("failed to upload star sprite: {0}")]
    Texture(#[from] TextureError),

    #[error("frame rendering failed: {0}")]
    Surface(#[from] SurfaceError),
}
