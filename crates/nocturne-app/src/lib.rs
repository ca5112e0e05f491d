//! Nocturne application: the clock, the render loop, the application
//! context, startup and the winit window that drives them.

pub mod clock;
pub mod context;
pub mod error;
pub mod platform;
pub mod render_loop;
pub mod startup;
pub mod window;

pub use clock::{Clock, ManualClock, TimeSource};
pub use context::SkyContext;
pub use error::AppError;
pub use platform::{APP_NAME, PlatformDirs, PlatformError};
pub use render_loop::{FrameSink, FrameStats, LoopState, RenderLoop, StopSignal};
pub use startup::{Startup, load_config, prepare};
pub use window::{AppState, run, run_with_stop_signal, window_attributes_from_config};
