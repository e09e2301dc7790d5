//! Layered application states.
//!
//! A [`StateManager`] holds a stack of [`State`]s (screens, menus, overlays).
//! Structural changes are queued and committed only at frame boundaries, so a
//! state may push, pop or replace layers from inside its own callbacks.
//!
//! Composition rules, from the topmost modal layer:
//! - events go top-down and stop after the first modal layer
//! - updates run from the topmost modal upward (only the top layer if none is modal)
//! - rendering is like updates, except a modal with `allow_render_below` renders
//!   the whole stack

mod base;
mod ctx;
mod layer;
mod manager;

pub use base::State;
pub use ctx::StateCtx;
pub use layer::LayerFlags;
pub use manager::StateManager;
