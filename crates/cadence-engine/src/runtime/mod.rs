//! Frame pacing loop.
//!
//! [`Runtime`] owns the platform and the clock and drives an [`App`](crate::core::App)
//! with a fixed simulation step, a variable update and an interpolated render.
//! The stepping arithmetic lives in [`FramePacer`] so it can be exercised without
//! a platform.

mod config;
mod error;
mod pacer;
mod runner;

pub use config::RuntimeConfig;
pub use error::{ConfigError, RuntimeError};
pub use pacer::{FramePacer, FrameStep, MAX_ALPHA};
pub use runner::Runtime;
