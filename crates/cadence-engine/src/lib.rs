//! Cadence engine crate.
//!
//! Frame pacing with a fixed-step accumulator, a layered state stack driven by
//! that loop, and a weak-reference resource cache. Windowing and GPU live
//! behind the `platform` traits.

pub mod core;
pub mod event;
pub mod logging;
pub mod platform;
pub mod resource;
pub mod runtime;
pub mod state;
pub mod time;
