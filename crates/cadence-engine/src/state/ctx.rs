use std::collections::VecDeque;

use crate::core::LoopCtx;

use super::base::State;
use super::layer::{LayerFlags, PendingOp};

/// Context handed to [`State`] callbacks.
///
/// Stack operations issued here are queued behind any already pending ones
/// and committed at the next frame boundary; the dispatch in progress keeps
/// running against the current layers.
pub struct StateCtx<'a> {
    pending: &'a mut VecDeque<PendingOp>,
    loop_ctx: &'a mut LoopCtx,
}

impl<'a> StateCtx<'a> {
    pub(crate) fn new(pending: &'a mut VecDeque<PendingOp>, loop_ctx: &'a mut LoopCtx) -> Self {
        Self { pending, loop_ctx }
    }

    pub fn push<S: State + 'static>(&mut self, state: S, flags: LayerFlags) {
        self.pending.push_back(PendingOp::Push { state: Box::new(state), flags });
    }

    pub fn push_modal<S: State + 'static>(&mut self, state: S, allow_render_below: bool) {
        self.push(state, LayerFlags::new(true, allow_render_below));
    }

    pub fn replace_top<S: State + 'static>(&mut self, state: S, flags: LayerFlags) {
        self.pending.push_back(PendingOp::ReplaceTop { state: Box::new(state), flags });
    }

    pub fn pop(&mut self) {
        self.pending.push_back(PendingOp::Pop);
    }

    pub fn clear(&mut self) {
        self.pending.push_back(PendingOp::Clear);
    }

    /// Asks the runtime to stop; see [`LoopCtx::quit`].
    pub fn quit(&mut self) {
        self.loop_ctx.quit();
    }

    pub fn frame_index(&self) -> u64 {
        self.loop_ctx.frame_index()
    }
}
