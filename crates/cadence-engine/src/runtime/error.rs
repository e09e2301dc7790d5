use thiserror::Error;

/// Invalid [`RuntimeConfig`](super::RuntimeConfig) values.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("fixed_timestep must be greater than zero")]
    ZeroFixedTimestep,
    #[error("max_timestep must be greater than zero")]
    ZeroMaxTimestep,
    #[error("max_updates_per_tick must be at least 1")]
    ZeroMaxUpdates,
}

/// Errors reported by [`Runtime`](super::Runtime).
///
/// Every variant leaves the runtime in the state it was in before the call.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime not initialized")]
    NotInitialized,
    #[error("runtime already running")]
    AlreadyRunning,
    #[error("invalid runtime config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("platform initialization failed: {0:#}")]
    Platform(anyhow::Error),
}
