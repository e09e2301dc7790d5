use crate::event::Event;

use super::ctx::LoopCtx;

/// Application contract driven by `Runtime::run`.
///
/// Within one frame the runtime calls, in order: `on_frame_start`, `on_event`
/// for each pending event, `on_fixed_update` zero or more times, `on_update`
/// once, `on_render` once, `on_frame_end`.
pub trait App {
    /// Frame boundary before any dispatch.
    fn on_frame_start(&mut self) {}

    fn on_event(&mut self, ctx: &mut LoopCtx, event: &Event);

    /// Simulation step; `dt` is always exactly the configured fixed timestep.
    fn on_fixed_update(&mut self, ctx: &mut LoopCtx, dt: f64);

    /// Once per frame with the frame's clamped elapsed time.
    fn on_update(&mut self, ctx: &mut LoopCtx, dt: f64);

    /// `alpha` in `[0, 1)`: progress from the last fixed step toward the next.
    fn on_render(&mut self, ctx: &mut LoopCtx, alpha: f64);

    /// Frame boundary after rendering.
    fn on_frame_end(&mut self) {}

    /// Asked before the loop stops. Returning `false` vetoes the quit.
    fn on_quit_requested(&mut self) -> bool {
        true
    }
}
