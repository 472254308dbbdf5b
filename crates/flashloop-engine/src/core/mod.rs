//! Core engine-facing contracts.
//!
//! This module defines the interface between the window host and the
//! application layer. Apps never see winit types; they receive translated
//! input events and a canvas to draw into, and tell the host when to wake
//! them next.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
