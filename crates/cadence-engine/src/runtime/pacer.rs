use std::time::Duration;

use super::config::RuntimeConfig;
use super::error::ConfigError;

/// Largest interpolation factor ever reported; `alpha` stays strictly below 1.
pub const MAX_ALPHA: f64 = 0.999_999;

/// Outcome of one [`FramePacer::advance`] call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStep {
    /// Measured frame time after the `max_timestep` clamp.
    pub delta: Duration,

    /// Fixed updates performed this frame.
    pub fixed_updates: usize,

    /// Interpolation factor for rendering, in `[0, 1)`.
    pub alpha: f64,

    /// The update cap was hit and leftover lag was discarded.
    pub lag_dropped: bool,
}

impl FrameStep {
    pub fn delta_secs(&self) -> f64 {
        self.delta.as_secs_f64()
    }
}

/// Fixed-timestep accumulator with spiral-of-death protection.
///
/// The accumulator is kept as a `Duration` so that feeding whole multiples
/// of the fixed step yields exact tick counts with no float drift.
/// Invariant: `accumulator < fixed_timestep` after every `advance`.
#[derive(Debug, Clone)]
pub struct FramePacer {
    fixed: Duration,
    max: Duration,
    max_updates: usize,
    accumulator: Duration,
    last_delta: Duration,
}

impl FramePacer {
    /// Builds a pacer from `config`, rejecting zero steps or a zero update cap.
    pub fn new(config: &RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            fixed: config.fixed_timestep,
            max: config.max_timestep,
            max_updates: config.max_updates_per_tick,
            accumulator: Duration::ZERO,
            last_delta: Duration::ZERO,
        })
    }

    /// Feeds one frame's raw elapsed time.
    ///
    /// Calls `fixed_update` with the fixed step (in seconds) once per
    /// simulated tick, oldest first.
    pub fn advance<F>(&mut self, raw: Duration, mut fixed_update: F) -> FrameStep
    where
        F: FnMut(f64),
    {
        let delta = raw.min(self.max);
        self.last_delta = delta;
        self.accumulator += delta;

        let dt = self.fixed.as_secs_f64();
        let mut performed = 0;
        while self.accumulator >= self.fixed && performed < self.max_updates {
            self.accumulator -= self.fixed;
            performed += 1;
            fixed_update(dt);
        }

        let lag_dropped = self.accumulator >= self.fixed;
        if lag_dropped {
            let rem = self.accumulator.as_nanos() % self.fixed.as_nanos();
            self.accumulator = Duration::from_nanos(rem as u64);
        }

        FrameStep {
            delta,
            fixed_updates: performed,
            alpha: self.alpha(),
            lag_dropped,
        }
    }

    /// How far the accumulator sits between two fixed ticks.
    pub fn alpha(&self) -> f64 {
        if self.accumulator.is_zero() {
            return 0.0;
        }
        (self.accumulator.as_secs_f64() / self.fixed.as_secs_f64()).min(MAX_ALPHA)
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    pub fn fixed_timestep(&self) -> Duration {
        self.fixed
    }

    /// Drops any owed simulation time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last_delta = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(10);

    fn pacer(max_updates: usize) -> FramePacer {
        FramePacer::new(
            &RuntimeConfig::default()
                .with_fixed_timestep(STEP)
                .with_max_timestep(Duration::from_secs(1))
                .with_max_updates_per_tick(max_updates),
        )
        .unwrap()
    }

    fn advance_counting(p: &mut FramePacer, raw: Duration) -> (FrameStep, Vec<f64>) {
        let mut dts = Vec::new();
        let step = p.advance(raw, |dt| dts.push(dt));
        (step, dts)
    }

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn zero_fixed_step_is_rejected() {
        let config = RuntimeConfig {
            fixed_timestep: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(FramePacer::new(&config).unwrap_err(), ConfigError::ZeroFixedTimestep);
    }

    #[test]
    fn zero_update_cap_is_rejected_not_bumped() {
        let config = RuntimeConfig {
            max_updates_per_tick: 0,
            ..Default::default()
        };
        assert_eq!(FramePacer::new(&config).unwrap_err(), ConfigError::ZeroMaxUpdates);
    }

    // ── spiral of death ──────────────────────────────────────────────────

    #[test]
    fn updates_per_frame_never_exceed_cap() {
        let mut p = pacer(3);
        let raws = [0, 1, 9, 10, 11, 29, 30, 31, 95, 250, 5_000, 40, 3, 1_000];

        for ms in raws {
            let (step, dts) = advance_counting(&mut p, Duration::from_millis(ms));
            assert!(step.fixed_updates <= 3, "raw {ms}ms ran {} updates", step.fixed_updates);
            assert_eq!(step.fixed_updates, dts.len());
            assert!(p.accumulator() < STEP, "raw {ms}ms left {:?}", p.accumulator());
        }
    }

    #[test]
    fn excess_lag_collapses_to_remainder() {
        let mut p = pacer(2);
        let (step, _) = advance_counting(&mut p, Duration::from_millis(35));

        assert_eq!(step.fixed_updates, 2);
        assert!(step.lag_dropped);
        assert_eq!(p.accumulator(), Duration::from_millis(5));
        assert!((step.alpha - 0.5).abs() < 1e-9);
    }

    // ── determinism ──────────────────────────────────────────────────────

    #[test]
    fn whole_multiples_give_exact_tick_counts() {
        for k in 0..=15u32 {
            let mut p = pacer(10);
            let (step, dts) = advance_counting(&mut p, STEP * k);

            assert_eq!(step.fixed_updates, (k as usize).min(10), "k = {k}");
            assert!(dts.iter().all(|&dt| dt == STEP.as_secs_f64()));
        }
    }

    #[test]
    fn partial_frames_accumulate() {
        let mut p = pacer(10);

        let (first, _) = advance_counting(&mut p, Duration::from_millis(6));
        assert_eq!(first.fixed_updates, 0);

        let (second, _) = advance_counting(&mut p, Duration::from_millis(6));
        assert_eq!(second.fixed_updates, 1);
        assert_eq!(p.accumulator(), Duration::from_millis(2));
    }

    // ── clamp ────────────────────────────────────────────────────────────

    #[test]
    fn stall_is_equivalent_to_max_timestep() {
        let mut stalled = pacer(200);
        let mut capped = pacer(200);

        let a = stalled.advance(Duration::from_secs(30), |_| {});
        let b = capped.advance(Duration::from_secs(1), |_| {});

        assert_eq!(a, b);
        assert_eq!(a.delta, Duration::from_secs(1));
        assert_eq!(stalled.accumulator(), capped.accumulator());
    }

    #[test]
    fn variable_delta_is_not_rounded_to_step() {
        let mut p = pacer(10);
        let step = p.advance(Duration::from_millis(15), |_| {});
        assert_eq!(step.delta, Duration::from_millis(15));
        assert_eq!(p.last_delta(), Duration::from_millis(15));
    }

    // ── interpolation ────────────────────────────────────────────────────

    #[test]
    fn alpha_stays_in_unit_range() {
        let mut p = pacer(4);
        for us in [0, 1, 9_999, 10_000, 10_001, 19_999, 123_456, 999_999] {
            let step = p.advance(Duration::from_micros(us), |_| {});
            assert!((0.0..1.0).contains(&step.alpha), "alpha {}", step.alpha);
        }
    }

    #[test]
    fn alpha_is_zero_on_exact_tick() {
        let mut p = pacer(4);
        let step = p.advance(STEP, |_| {});
        assert_eq!(step.alpha, 0.0);
    }

    #[test]
    fn reset_discards_owed_time() {
        let mut p = pacer(4);
        p.advance(Duration::from_millis(7), |_| {});
        p.reset();
        assert_eq!(p.accumulator(), Duration::ZERO);
        assert_eq!(p.alpha(), 0.0);
    }
}
