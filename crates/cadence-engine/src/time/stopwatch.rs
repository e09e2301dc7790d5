use std::time::Duration;

use super::source::{TimePoint, TimeSource};

/// Start/stop timer over any [`TimeSource`].
///
/// A stopwatch is running while its end mark is unset. Stopping freezes the
/// reading until the next `start`, `restart` or `reset`.
#[derive(Debug, Clone)]
pub struct Stopwatch<C: TimeSource> {
    clock: C,
    start: TimePoint,
    end: Option<TimePoint>,
}

impl<C: TimeSource> Stopwatch<C> {
    /// Creates a stopwatch that is already running.
    pub fn new(clock: C) -> Self {
        let start = clock.now();
        Self { clock, start, end: None }
    }

    /// Resumes measuring from zero. No-op while running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.start = self.clock.now();
        self.end = None;
    }

    /// Freezes the reading. No-op while stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.end = Some(self.clock.now());
    }

    /// Returns the elapsed time and starts measuring again from zero.
    pub fn restart(&mut self) -> Duration {
        self.stop();
        let elapsed = self.elapsed();
        self.end = None;
        self.start = self.clock.now();
        elapsed
    }

    /// Sets the reading back to zero, keeping the running/stopped status.
    pub fn reset(&mut self) {
        self.start = self.clock.now();
        if self.end.is_some() {
            self.end = Some(self.start);
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    pub fn elapsed(&self) -> Duration {
        match self.end {
            Some(end) => end.saturating_duration_since(self.start),
            None => self.clock.elapsed(self.start),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed_seconds() * 1_000.0
    }
}
