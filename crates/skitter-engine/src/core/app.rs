use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the game.
pub trait App {
    /// Called once per rendered frame, after pending window events were applied
    /// to the input state.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the window is closed by the platform (close button)
    /// before the runtime exits.
    fn on_close_requested(&mut self) {}
}
