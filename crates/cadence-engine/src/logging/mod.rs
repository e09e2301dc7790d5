//! Logging setup.
//!
//! Everything in the engine reports through the `log` facade. This module only
//! installs the `env_logger` backend for binaries that want one.

mod init;

pub use init::{init_logging, LoggingConfig};
