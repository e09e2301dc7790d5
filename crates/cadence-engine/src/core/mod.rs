//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (pacing loop) and the
//! application: the [`App`] lifecycle hooks and the [`LoopCtx`] handed to each
//! of them. A `StateManager` is one implementation of `App`; a plain struct is
//! another.

mod app;
mod ctx;

pub use app::App;
pub use ctx::LoopCtx;
