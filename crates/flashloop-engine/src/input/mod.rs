//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window host translates platform events into `InputEvent`s and hands
//! them to an [`EventTarget`]; loop controllers register their listeners there.

mod target;
mod types;

pub use target::{EventTarget, Listener, ListenerId, ListenerRegistry};
pub use types::{
    EventKind,
    InputEvent,
    Key,
    KeyEvent,
    KeyEventKind,
    Modifiers,
    MouseButton,
    PointerEvent,
    PointerEventKind,
};
