//! Window creation and winit event handling.

use std::sync::Arc;

use nocturne_config::{Config, WindowConfig};
use tracing::{error, info, instrument};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::clock::Clock;
use crate::context::SkyContext;
use crate::error::AppError;
use crate::render_loop::{LoopState, RenderLoop, StopSignal};

/// Window attributes for the configured size, title and fullscreen mode.
pub fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.width as f64,
            config.height as f64,
        ))
        .with_fullscreen(config.fullscreen.then_some(Fullscreen::Borderless(None)))
}

/// winit handler tying the window to the [`SkyContext`] and [`RenderLoop`].
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    context: SkyContext,
    render_loop: RenderLoop<Clock>,
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let context = SkyContext::new(&config);
        let render_loop = RenderLoop::new(Clock::new(), config.debug.stats_interval_secs as f64);
        Self {
            config,
            window: None,
            context,
            render_loop,
            fatal: None,
        }
    }

    /// Share an externally owned stop signal with the loop.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.render_loop = self.render_loop.with_stop_signal(stop);
        self
    }

    pub fn context(&self) -> &SkyContext {
        &self.context
    }

    pub fn loop_state(&self) -> LoopState {
        self.render_loop.state()
    }

    pub fn frame_count(&self) -> u64 {
        self.render_loop.frame_count()
    }

    /// The error that ended the event loop, if any.
    pub fn take_fatal(&mut self) -> Option<AppError> {
        self.fatal.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        self.render_loop.stop_signal().stop();
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        match self.render_loop.tick(&mut self.context) {
            Ok(true) => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Ok(false) => {
                info!(frames = self.render_loop.frame_count(), "Stop requested");
                event_loop.exit();
            }
            Err(err) => self.fail(event_loop, err.into()),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = window_attributes_from_config(&self.config.window);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fail(event_loop, err.into());
                return;
            }
        };
        info!(
            title = %self.config.window.title,
            fullscreen = self.config.window.fullscreen,
            "Window created"
        );

        if let Err(err) = self
            .context
            .attach_gpu(Arc::clone(&window), self.config.window.vsync)
        {
            self.fail(event_loop, err);
            return;
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(frames = self.render_loop.frame_count(), "Close requested");
                self.render_loop.stop_signal().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.context.resize(size.width, size.height);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.context.rescale(scale_factor, size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and run until it closes or a fatal error occurs.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    run_with_stop_signal(config, StopSignal::new())
}

/// [`run`] with a stop signal that other threads may set.
#[instrument(skip_all)]
pub fn run_with_stop_signal(config: Config, stop: StopSignal) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config).with_stop_signal(stop);
    event_loop.run_app(&mut app)?;

    match app.take_fatal() {
        Some(err) => Err(err),
        None => {
            info!(frames = app.frame_count(), "Event loop exited");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let config = WindowConfig {
            width: 800,
            height: 600,
            title: "Night".to_string(),
            ..WindowConfig::default()
        };
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Night");
        assert_eq!(
            attrs.inner_size,
            Some(winit::dpi::LogicalSize::new(800.0, 600.0).into())
        );
        assert!(attrs.fullscreen.is_none());
    }

    #[test]
    fn test_fullscreen_is_borderless() {
        let config = WindowConfig {
            fullscreen: true,
            ..WindowConfig::default()
        };
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }

    #[test]
    fn test_app_state_starts_idle_without_window() {
        let mut app = AppState::new(Config::default());
        assert_eq!(app.loop_state(), LoopState::Idle);
        assert_eq!(app.frame_count(), 0);
        assert!(!app.context().has_gpu());
        assert!(app.take_fatal().is_none());
    }

    #[test]
    fn test_app_state_shares_stop_signal() {
        let stop = StopSignal::new();
        let app = AppState::new(Config::default()).with_stop_signal(stop.clone());
        stop.stop();
        assert!(app.render_loop.is_stopped());
    }
}
