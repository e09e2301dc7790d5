/// Loop context passed to every [`App`](super::App) callback.
///
/// Requests are buffered and applied by the runtime after the current
/// callback returns.
#[derive(Debug, Default)]
pub struct LoopCtx {
    frame_index: u64,
    quit_requested: bool,
}

impl LoopCtx {
    pub(crate) fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            quit_requested: false,
        }
    }

    /// Asks the runtime to stop.
    ///
    /// Takes effect at the end of the current frame unless the application's
    /// `on_quit_requested` vetoes it.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    /// Index of the frame being processed, starting at 0.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Consumes a pending quit request.
    pub(crate) fn take_quit(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_request_is_visible_until_taken() {
        let mut ctx = LoopCtx::new(7);
        assert!(!ctx.is_quit_requested());

        ctx.quit();
        assert!(ctx.is_quit_requested());
        assert_eq!(ctx.frame_index(), 7);

        assert!(ctx.take_quit());
        assert!(!ctx.is_quit_requested());
        assert!(!ctx.take_quit());
    }
}
