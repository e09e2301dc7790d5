use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Opaque monotonic timestamp.
///
/// Measured from the origin of the [`TimeSource`] that produced it; only
/// differences between points of the same source are meaningful.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimePoint(Duration);

impl TimePoint {
    pub const fn from_duration(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    pub const fn since_origin(self) -> Duration {
        self.0
    }

    /// Time from `earlier` to `self`, zero if `earlier` is actually later.
    pub fn saturating_duration_since(self, earlier: TimePoint) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

/// Monotonic clock consumed by the runtime.
pub trait TimeSource {
    /// Current reading.
    fn now(&self) -> TimePoint;

    /// Elapsed time since `since`.
    fn elapsed(&self, since: TimePoint) -> Duration {
        self.now().saturating_duration_since(since)
    }

    /// Elapsed time since `since`, in seconds.
    fn elapsed_seconds(&self, since: TimePoint) -> f64 {
        self.elapsed(since).as_secs_f64()
    }
}

/// Wall-clock-immune clock backed by `std::time::Instant`.
#[derive(Debug, Copy, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> TimePoint {
        TimePoint(Instant::now().saturating_duration_since(self.origin))
    }
}

/// Hand-driven clock.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the runtime.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Advances by `secs` seconds. Negative or non-finite values are ignored.
    pub fn advance_secs(&self, secs: f64) {
        if let Ok(by) = Duration::try_from_secs_f64(secs) {
            self.advance(by);
        }
    }

    pub fn set(&self, since_origin: Duration) {
        self.now.set(since_origin);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> TimePoint {
        TimePoint(self.now.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_reading() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.now();

        handle.advance_secs(0.5);

        assert_eq!(clock.elapsed(start), Duration::from_millis(500));
        assert_eq!(clock.elapsed_seconds(start), 0.5);
    }

    #[test]
    fn manual_clock_ignores_negative_advance() {
        let clock = ManualClock::new();
        clock.advance_secs(-1.0);
        clock.advance_secs(f64::NAN);
        assert_eq!(clock.now(), TimePoint::default());
    }

    #[test]
    fn set_jumps_both_ways() {
        let clock = ManualClock::new();
        clock.set(Duration::from_secs(10));
        let mark = clock.now();

        clock.set(Duration::from_secs(4));
        assert_eq!(clock.now(), TimePoint::from_duration(Duration::from_secs(4)));
        assert_eq!(clock.elapsed(mark), Duration::ZERO);

        clock.set(Duration::from_secs(12));
        assert_eq!(clock.elapsed(mark), Duration::from_secs(2));
    }

    #[test]
    fn elapsed_saturates_for_future_points() {
        let clock = ManualClock::new();
        let future = TimePoint::from_duration(Duration::from_secs(3));
        assert_eq!(clock.elapsed(future), Duration::ZERO);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
