//! Paint model for the CPU canvas.
//!
//! Geometry types remain in `coords`.

mod color;

pub use color::Color;
