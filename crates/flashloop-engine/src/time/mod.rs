//! Time subsystem.
//!
//! Frame scheduling without coupling to any runtime:
//! - one `FrameClock` per loop controller
//! - the host polls `wake()` and delivers due frames with `begin`/`end`

mod frame_clock;

pub use frame_clock::{
    Cadence, Flow, FrameClock, FrameTime, Wake, INTERVAL_THRESHOLD, REFRESH_CLAMP, TIMER_SLACK,
};
