//! Monotonic time sources for the render loop.

use std::time::Instant;

/// Seconds elapsed since the source was created. Readings never decrease.
pub trait TimeSource {
    fn elapsed_secs(&mut self) -> f64;
}

/// Wall clock backed by [`Instant`]. Starts at zero on creation and never
/// pauses or resets.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for Clock {
    fn elapsed_secs(&mut self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Deterministic clock for tests and headless runs.
///
/// Each reading returns the current time and then advances it by `step`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
    step: f64,
}

impl ManualClock {
    /// A clock frozen at zero until [`ManualClock::advance`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that moves forward by `step` seconds after every reading.
    pub fn stepping(step: f64) -> Self {
        Self {
            now: 0.0,
            step: step.max(0.0),
        }
    }

    /// Move the clock forward. Negative amounts are ignored.
    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds.max(0.0);
    }

    pub fn now(&self) -> f64 {
        self.now
    }
}

impl TimeSource for ManualClock {
    fn elapsed_secs(&mut self) -> f64 {
        let reading = self.now;
        self.now += self.step;
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = Clock::new();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(a >= 0.0);
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let mut clock = ManualClock::new();
        assert_eq!(clock.elapsed_secs(), 0.0);
        assert_eq!(clock.elapsed_secs(), 0.0);
    }

    #[test]
    fn test_manual_clock_advance_ignores_negative() {
        let mut clock = ManualClock::new();
        clock.advance(1.5);
        clock.advance(-10.0);
        assert_eq!(clock.elapsed_secs(), 1.5);
    }

    #[test]
    fn test_stepping_clock() {
        let mut clock = ManualClock::stepping(0.25);
        let readings: Vec<f64> = (0..4).map(|_| clock.elapsed_secs()).collect();
        assert_eq!(readings, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(clock.now(), 1.0);
    }
}
