//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, presents the app's
//! canvas through `pixels`, and wakes the app according to its clocks.

mod runtime;
mod translate;

pub use runtime::{Runtime, RuntimeConfig};
