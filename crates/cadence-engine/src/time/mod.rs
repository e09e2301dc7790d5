//! Time subsystem.
//!
//! The runtime never reads the OS clock directly; it goes through a [`TimeSource`]
//! so that tests and replays can drive frames with exact deltas.
//! - [`SystemClock`] for real runs
//! - [`ManualClock`] for tests, advanced by hand
//! - [`Stopwatch`] for ad-hoc measurements on top of either

mod source;
mod stopwatch;

pub use source::{ManualClock, SystemClock, TimePoint, TimeSource};
pub use stopwatch::Stopwatch;
