//! Lifecycle-managed frame loops.
//!
//! A [`LoopController`] wraps one [`FrameClock`](crate::time::FrameClock) with
//! an `init → run ⇄ pause → stop` state machine, splits every frame into a
//! throttled tick and an unthrottled render, and keeps its input listeners
//! registered on an [`EventTarget`](crate::input::EventTarget) for as long as
//! it is alive.

mod config;
mod controller;

pub use config::LoopConfig;
pub use controller::{LoopController, LoopHandle, LoopState};
pub use crate::time::Flow;
