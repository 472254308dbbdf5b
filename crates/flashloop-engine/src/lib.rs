//! Flashloop engine crate.
//!
//! Frame clocks, lifecycle-managed loop controllers, input targets, a CPU
//! canvas and the winit host that drives them.

pub mod time;
pub mod looping;
pub mod input;
pub mod core;
pub mod window;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod canvas;
