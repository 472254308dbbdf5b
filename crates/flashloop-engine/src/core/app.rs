use crate::input::InputEvent;
use crate::time::Wake;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for every translated input event, before the next frame.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called whenever the host is woken for a frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// What the host must wait for before calling [`on_frame`](Self::on_frame)
    /// again. `Wake::Idle` parks the host until the next input event.
    fn wake(&self) -> Wake;
}
