//! Per-frame driver: read the clock, publish the elapsed time, render.
//!
//! The loop owns its [`TimeSource`] and borrows a [`FrameSink`] for each tick,
//! so the same state machine drives the winit window and headless tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::clock::{Clock, TimeSource};

/// Receives the clock reading and draws one frame.
pub trait FrameSink {
    type Error;

    /// Publish the elapsed seconds to whatever animates with time.
    fn set_elapsed_time(&mut self, seconds: f32);

    /// Draw the scene as it stands after [`FrameSink::set_elapsed_time`].
    fn render_frame(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created but never ticked.
    Idle,
    /// At least one tick has run. There is no way back to `Idle`.
    Running,
}

/// Shared flag that ends the loop. Safe to set from any thread.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Frame counter that reports the average FPS once per interval.
#[derive(Debug, Clone)]
pub struct FrameStats {
    interval: f64,
    window_start: f64,
    frames_in_window: u64,
    last_fps: Option<f64>,
}

impl FrameStats {
    /// `interval` is in seconds. Zero or negative disables reporting.
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            window_start: 0.0,
            frames_in_window: 0,
            last_fps: None,
        }
    }

    /// Count a frame finished at `now`. Returns the FPS when a window closes.
    pub fn record(&mut self, now: f64) -> Option<f64> {
        if self.interval <= 0.0 {
            return None;
        }

        self.frames_in_window += 1;
        let span = now - self.window_start;
        if span < self.interval {
            return None;
        }

        let fps = self.frames_in_window as f64 / span;
        self.window_start = now;
        self.frames_in_window = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    /// FPS of the last completed window.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }
}

/// Idle/Running state machine around a clock.
pub struct RenderLoop<C: TimeSource = Clock> {
    clock: C,
    state: LoopState,
    frame_count: u64,
    last_elapsed: f64,
    stop: StopSignal,
    stats: FrameStats,
}

impl<C: TimeSource> RenderLoop<C> {
    /// Create an idle loop. `stats_interval` is the FPS report period in
    /// seconds.
    pub fn new(clock: C, stats_interval: f64) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            frame_count: 0,
            last_elapsed: 0.0,
            stop: StopSignal::new(),
            stats: FrameStats::new(stats_interval),
        }
    }

    /// Replace the stop signal, e.g. with one shared by a test or a signal
    /// handler.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Run one tick. Returns `Ok(false)` without touching the sink once the
    /// stop signal is set.
    pub fn tick<S: FrameSink>(&mut self, sink: &mut S) -> Result<bool, S::Error> {
        if self.stop.is_stopped() {
            return Ok(false);
        }

        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            info!("Render loop running");
        }

        let elapsed = self.clock.elapsed_secs();
        self.last_elapsed = elapsed;
        sink.set_elapsed_time(elapsed as f32);
        sink.render_frame()?;

        self.frame_count += 1;
        if let Some(fps) = self.stats.record(elapsed) {
            info!(
                frames = self.frame_count,
                fps = (fps * 10.0).round() / 10.0,
                "Frame statistics"
            );
        }

        Ok(true)
    }

    /// Tick until the stop signal is set. Returns the number of ticks run by
    /// this call.
    pub fn run_until_stopped<S: FrameSink>(&mut self, sink: &mut S) -> Result<u64, S::Error> {
        let start = self.frame_count;
        while self.tick(sink)? {}
        debug!(ticks = self.frame_count - start, "Render loop stopped");
        Ok(self.frame_count - start)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clock reading used by the most recent tick.
    pub fn last_elapsed(&self) -> f64 {
        self.last_elapsed
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
