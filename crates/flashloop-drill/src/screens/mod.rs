//! Drill screens.
//!
//! Each screen is a `LoopController<Canvas>` built from a `LoopConfig`; the
//! [`Stage`](crate::stage::Stage) decides when each one runs.

mod countdown;
mod drill;
mod pause;
mod stats;

pub use countdown::{COUNTDOWN_FROM, Countdown, countdown_screen};
pub use drill::{DrillState, MAX_ANSWER_LEN, ReportSlot, drill_screen};
pub use pause::{draw_pause_band, pause_screen};
pub use stats::{FADE_IN, StatsBanner, stats_screen};

use crate::problems::Problem;
use crate::stage::Stage;

/// Queues countdown → drill → stats on `stage`.
///
/// The returned slot holds the report once the drill has stopped.
pub fn queue_session(stage: &mut Stage, problems: Vec<Problem>) -> ReportSlot {
    let report = ReportSlot::default();
    let total = problems.len();

    stage.push(|target, _| countdown_screen(target));

    let slot = report.clone();
    stage.push(move |target, handle| drill_screen(target, problems, handle, slot));

    let slot = report.clone();
    stage.push(move |target, _| {
        let correct = slot.borrow().as_ref().map_or(0, |r| r.correct.len());
        stats_screen(target, correct, total)
    });

    report
}
