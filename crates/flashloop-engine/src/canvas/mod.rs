//! CPU drawing surface and text.
//!
//! Screens render into a [`Canvas`]; the window host presents it.

mod font;
mod surface;

pub use font::{FontLoadError, Typeface};
pub use surface::Canvas;
