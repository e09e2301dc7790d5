use std::time::Duration;

use super::error::ConfigError;

/// Temporal contract of the loop.
///
/// Window and graphics options belong to the platform; only these values
/// shape pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Simulation step handed to every `on_fixed_update`.
    pub fixed_timestep: Duration,

    /// Upper bound on a single frame's measured delta. Longer stalls are
    /// truncated to this value.
    pub max_timestep: Duration,

    /// Fixed updates allowed per frame before excess lag is discarded.
    pub max_updates_per_tick: usize,

    /// Presentation is synced to the display. When false, the loop yields
    /// briefly on very short frames instead of spinning.
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            max_timestep: Duration::from_secs(1),
            max_updates_per_tick: 10,
            vsync: true,
        }
    }
}

impl RuntimeConfig {
    /// Sets the fixed step from a tick rate in Hz.
    pub fn with_tick_rate(mut self, hz: u32) -> Self {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / f64::from(hz.max(1)));
        self
    }

    pub fn with_fixed_timestep(mut self, step: Duration) -> Self {
        self.fixed_timestep = step;
        self
    }

    pub fn with_max_timestep(mut self, max: Duration) -> Self {
        self.max_timestep = max;
        self
    }

    pub fn with_max_updates_per_tick(mut self, max: usize) -> Self {
        self.max_updates_per_tick = max;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Checks the hard preconditions.
    ///
    /// `max_timestep < fixed_timestep` is legal but means a single frame can
    /// never owe a full step; it is logged as a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_timestep.is_zero() {
            return Err(ConfigError::ZeroFixedTimestep);
        }
        if self.max_timestep.is_zero() {
            return Err(ConfigError::ZeroMaxTimestep);
        }
        if self.max_updates_per_tick == 0 {
            return Err(ConfigError::ZeroMaxUpdates);
        }
        if self.max_timestep < self.fixed_timestep {
            log::warn!(
                "max_timestep ({:?}) is shorter than fixed_timestep ({:?})",
                self.max_timestep,
                self.fixed_timestep
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = RuntimeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_updates_per_tick, 10);
        assert_eq!(config.max_timestep, Duration::from_secs(1));
    }

    #[test]
    fn zero_values_are_rejected() {
        let zero_fixed = RuntimeConfig::default().with_fixed_timestep(Duration::ZERO);
        assert_eq!(zero_fixed.validate(), Err(ConfigError::ZeroFixedTimestep));

        let zero_max = RuntimeConfig::default().with_max_timestep(Duration::ZERO);
        assert_eq!(zero_max.validate(), Err(ConfigError::ZeroMaxTimestep));

        let zero_updates = RuntimeConfig::default().with_max_updates_per_tick(0);
        assert_eq!(zero_updates.validate(), Err(ConfigError::ZeroMaxUpdates));
    }

    #[test]
    fn tick_rate_sets_fixed_step() {
        let config = RuntimeConfig::default().with_tick_rate(50);
        assert_eq!(config.fixed_timestep, Duration::from_millis(20));
    }

    #[test]
    fn short_max_timestep_is_only_a_warning() {
        let config = RuntimeConfig::default()
            .with_fixed_timestep(Duration::from_millis(20))
            .with_max_timestep(Duration::from_millis(10));
        assert!(config.validate().is_ok());
    }
}
