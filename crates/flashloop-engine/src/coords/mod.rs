//! Geometry types shared by the canvas and screens.
//!
//! Canonical space:
//! - surface pixels
//! - origin top-left
//! - +X right, +Y down

mod rect;
mod vec2;

pub use rect::Rect;
pub use vec2::Vec2;
