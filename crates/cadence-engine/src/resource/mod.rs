//! Weak-reference resource cache.
//!
//! [`ResourceCache`] loads assets lazily by key and hands out shared `Arc`
//! handles, but only keeps `Weak` references itself: an asset lives exactly as
//! long as somebody outside the cache holds it.

mod cache;

pub use cache::{Loader, ResourceCache};
