use std::collections::VecDeque;

use crate::core::{App, LoopCtx};
use crate::event::Event;

use super::base::State;
use super::ctx::StateCtx;
use super::layer::{Layer, LayerFlags, PendingOp};

/// Stack of [`State`] layers with deferred structural mutation.
///
/// `push`, `replace_top`, `pop` and `clear` only queue an operation. The queue
/// is committed in FIFO order by [`on_enter_frame`](Self::on_enter_frame) and
/// [`on_exit_frame`](Self::on_exit_frame), never while a dispatch is walking
/// the layers. Index 0 is the bottom of the stack.
///
/// `StateManager` implements [`App`], committing at both frame boundaries, so
/// it can be handed straight to `Runtime::run`.
#[derive(Default)]
pub struct StateManager {
    layers: Vec<Layer>,
    pending: VecDeque<PendingOp>,
    iterating: bool,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `state` as the new top layer.
    pub fn push<S: State + 'static>(&mut self, state: S, flags: LayerFlags) {
        self.push_boxed(Box::new(state), flags);
    }

    pub fn push_boxed(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.pending.push_back(PendingOp::Push { state, flags });
    }

    /// Queues a modal layer. With `allow_render_below` the layers beneath keep
    /// rendering (but stop updating).
    pub fn push_modal<S: State + 'static>(&mut self, state: S, allow_render_below: bool) {
        self.push(state, LayerFlags::new(true, allow_render_below));
    }

    /// Queues removal of the current top (if any) followed by a push of `state`.
    pub fn replace_top<S: State + 'static>(&mut self, state: S, flags: LayerFlags) {
        self.replace_top_boxed(Box::new(state), flags);
    }

    pub fn replace_top_boxed(&mut self, state: Box<dyn State>, flags: LayerFlags) {
        self.pending.push_back(PendingOp::ReplaceTop { state, flags });
    }

    /// Queues removal of the top layer. Committing it on an empty stack does nothing.
    pub fn pop(&mut self) {
        self.pending.push_back(PendingOp::Pop);
    }

    /// Queues removal of every layer.
    pub fn clear(&mut self) {
        self.pending.push_back(PendingOp::Clear);
    }

    /// Commits pending operations before the frame's dispatch begins.
    pub fn on_enter_frame(&mut self) {
        self.commit();
    }

    /// Commits pending operations after the frame's dispatch ends.
    pub fn on_exit_frame(&mut self) {
        self.commit();
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Committed layers; queued pushes are not counted.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Operations waiting for the next commit.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn top_flags(&self) -> Option<LayerFlags> {
        self.layers.last().map(|layer| layer.flags)
    }

    /// Layer names, bottom to top.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.state.name()).collect()
    }

    /// Asks the active slice, top-down, whether the application may quit.
    ///
    /// The first `false` vetoes. An empty stack always allows quitting.
    pub fn on_quit_requested(&mut self) -> bool {
        let Some(start) = self.update_start_index() else {
            return true;
        };

        self.iterating = true;
        let allow = self.layers[start..]
            .iter_mut()
            .rev()
            .all(|layer| layer.state.on_quit_requested());
        self.iterating = false;

        allow
    }

    /// Delivers `event` top-down, stopping after the first modal layer.
    pub fn on_event(&mut self, ctx: &mut LoopCtx, event: &Event) {
        if self.layers.is_empty() {
            return;
        }

        self.iterating = true;
        let mut sctx = StateCtx::new(&mut self.pending, ctx);
        for layer in self.layers.iter_mut().rev() {
            layer.state.on_event(&mut sctx, event);
            if layer.flags.modal {
                break;
            }
        }
        self.iterating = false;
    }

    pub fn on_fixed_update(&mut self, ctx: &mut LoopCtx, dt: f64) {
        if let Some(start) = self.update_start_index() {
            self.dispatch_from(start, ctx, |state, sctx| state.on_fixed_update(sctx, dt));
        }
    }

    pub fn on_update(&mut self, ctx: &mut LoopCtx, dt: f64) {
        if let Some(start) = self.update_start_index() {
            self.dispatch_from(start, ctx, |state, sctx| state.on_update(sctx, dt));
        }
    }

    pub fn on_render(&mut self, ctx: &mut LoopCtx, alpha: f64) {
        if let Some(start) = self.render_start_index() {
            self.dispatch_from(start, ctx, |state, sctx| state.on_render(sctx, alpha));
        }
    }

    /// Calls `f` on layers `start..`, bottom-up.
    fn dispatch_from<F>(&mut self, start: usize, ctx: &mut LoopCtx, mut f: F)
    where
        F: FnMut(&mut dyn State, &mut StateCtx<'_>),
    {
        self.iterating = true;
        let mut sctx = StateCtx::new(&mut self.pending, ctx);
        for layer in &mut self.layers[start..] {
            f(layer.state.as_mut(), &mut sctx);
        }
        self.iterating = false;
    }

    fn topmost_modal_index(&self) -> Option<usize> {
        self.layers.iter().rposition(|layer| layer.flags.modal)
    }

    /// First layer that updates: the topmost modal, else the top.
    fn update_start_index(&self) -> Option<usize> {
        let top = self.layers.len().checked_sub(1)?;
        Some(self.topmost_modal_index().unwrap_or(top))
    }

    /// First layer that renders.
    fn render_start_index(&self) -> Option<usize> {
        let top = self.layers.len().checked_sub(1)?;
        match self.topmost_modal_index() {
            Some(modal) if self.layers[modal].flags.allow_render_below => Some(0),
            Some(modal) => Some(modal),
            None => Some(top),
        }
    }

    fn commit(&mut self) {
        if self.iterating {
            return;
        }

        while let Some(op) = self.pending.pop_front() {
            match op {
                PendingOp::Push { state, flags } => self.enter(state, flags),
                PendingOp::ReplaceTop { state, flags } => {
                    self.exit_top();
                    self.enter(state, flags);
                }
                PendingOp::Pop => self.exit_top(),
                PendingOp::Clear => {
                    while let Some(layer) = self.layers.pop() {
                        Self::exit(layer);
                    }
                }
            }
        }
    }

    fn enter(&mut self, mut state: Box<dyn State>, flags: LayerFlags) {
        log::debug!(
            "state enter: {} (modal: {}, render below: {})",
            state.name(),
            flags.modal,
            flags.allow_render_below
        );
        state.on_enter();
        self.layers.push(Layer { state, flags });
    }

    fn exit_top(&mut self) {
        if let Some(layer) = self.layers.pop() {
            Self::exit(layer);
        }
    }

    fn exit(mut layer: Layer) {
        log::debug!("state exit: {}", layer.state.name());
        layer.state.on_exit();
    }
}

impl App for StateManager {
    fn on_frame_start(&mut self) {
        self.on_enter_frame();
    }

    fn on_event(&mut self, ctx: &mut LoopCtx, event: &Event) {
        StateManager::on_event(self, ctx, event);
    }

    fn on_fixed_update(&mut self, ctx: &mut LoopCtx, dt: f64) {
        StateManager::on_fixed_update(self, ctx, dt);
    }

    fn on_update(&mut self, ctx: &mut LoopCtx, dt: f64) {
        StateManager::on_update(self, ctx, dt);
    }

    fn on_render(&mut self, ctx: &mut LoopCtx, alpha: f64) {
        StateManager::on_render(self, ctx, alpha);
    }

    fn on_frame_end(&mut self) {
        self.on_exit_frame();
    }

    fn on_quit_requested(&mut self) -> bool {
        StateManager::on_quit_requested(self)
    }
}
