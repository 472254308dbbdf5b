use std::time::Instant;

use crate::canvas::Canvas;

/// Per-frame context passed to `core::App::on_frame`.
///
/// The canvas persists across frames; whatever is left in it when the
/// callback returns is presented.
pub struct FrameCtx<'a> {
    pub now: Instant,
    pub canvas: &'a mut Canvas,
}

impl<'a> FrameCtx<'a> {
    pub fn new(now: Instant, canvas: &'a mut Canvas) -> Self {
        Self { now, canvas }
    }
}
