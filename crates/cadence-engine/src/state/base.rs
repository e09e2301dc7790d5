use crate::event::Event;

use super::ctx::StateCtx;

/// One layer's worth of application behavior.
///
/// Lifecycle: created unattached, `on_enter` when its push is committed,
/// `on_exit` when its pop/replace/clear is committed, then dropped.
pub trait State {
    fn on_enter(&mut self);

    fn on_exit(&mut self);

    /// Returning `false` vetoes an application quit.
    fn on_quit_requested(&mut self) -> bool {
        true
    }

    fn on_event(&mut self, ctx: &mut StateCtx<'_>, event: &Event);

    fn on_fixed_update(&mut self, ctx: &mut StateCtx<'_>, dt: f64);

    fn on_update(&mut self, ctx: &mut StateCtx<'_>, dt: f64);

    fn on_render(&mut self, ctx: &mut StateCtx<'_>, alpha: f64);

    /// Name used in stack diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
