use super::base::State;

/// Composition flags of a stack layer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct LayerFlags {
    /// Consumes events and pauses the layers beneath it.
    pub modal: bool,

    /// When this is the topmost modal, the layers beneath it still render.
    pub allow_render_below: bool,
}

impl LayerFlags {
    pub const fn new(modal: bool, allow_render_below: bool) -> Self {
        Self { modal, allow_render_below }
    }

    /// Modal layer that hides everything beneath it.
    pub const fn modal() -> Self {
        Self::new(true, false)
    }

    /// Modal layer drawn over the layers beneath it.
    pub const fn overlay() -> Self {
        Self::new(true, true)
    }
}

pub(crate) struct Layer {
    pub(crate) state: Box<dyn State>,
    pub(crate) flags: LayerFlags,
}

/// Queued structural change, applied at the next commit.
pub(crate) enum PendingOp {
    Push { state: Box<dyn State>, flags: LayerFlags },
    ReplaceTop { state: Box<dyn State>, flags: LayerFlags },
    Pop,
    Clear,
}
