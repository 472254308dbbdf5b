use std::fmt;

/// Keyboard key identifier.
///
/// The host maps platform keycodes into these variants where possible.
/// For unsupported keys, use `Key::Unknown(u32)` with a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Delete,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits (main row and keypad both map here)
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl Key {
    /// Numeric value for digit keys.
    pub fn digit(self) -> Option<u8> {
        Some(match self {
            Key::Digit0 => 0,
            Key::Digit1 => 1,
            Key::Digit2 => 2,
            Key::Digit3 => 3,
            Key::Digit4 => 4,
            Key::Digit5 => 5,
            Key::Digit6 => 6,
            Key::Digit7 => 7,
            Key::Digit8 => 8,
            Key::Digit9 => 9,
            _ => return None,
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Keyboard event phase.
///
/// `Press` is the character-producing phase and carries `text`; `Down` and
/// `Up` are the physical transitions.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyEventKind {
    Press,
    Down,
    Up,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: Key,
    /// Committed character for `Press` events.
    pub text: Option<char>,
    pub modifiers: Modifiers,
    /// True when event is a key-repeat.
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(kind: KeyEventKind, key: Key) -> Self {
        Self {
            kind,
            key,
            text: None,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    pub fn with_text(mut self, text: char) -> Self {
        self.text = Some(text);
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
}

/// Pointer event in surface pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
    /// Button for `Down`/`Up`; `None` for moves.
    pub button: Option<MouseButton>,
    pub modifiers: Modifiers,
}

/// Platform-agnostic input events emitted by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Key(k) => match k.kind {
                KeyEventKind::Press => EventKind::KeyPress,
                KeyEventKind::Down => EventKind::KeyDown,
                KeyEventKind::Up => EventKind::KeyUp,
            },
            InputEvent::Pointer(p) => match p.kind {
                PointerEventKind::Down => EventKind::MouseDown,
                PointerEventKind::Up => EventKind::MouseUp,
                PointerEventKind::Move => EventKind::MouseMove,
            },
        }
    }
}

/// Listener registration category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    KeyPress,
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
}

impl EventKind {
    pub const KEYS: [EventKind; 3] = [EventKind::KeyPress, EventKind::KeyDown, EventKind::KeyUp];

    pub const POINTER: [EventKind; 3] =
        [EventKind::MouseDown, EventKind::MouseUp, EventKind::MouseMove];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_follows_phase() {
        let down = InputEvent::Key(KeyEvent::new(KeyEventKind::Down, Key::Space));
        assert_eq!(down.kind(), EventKind::KeyDown);

        let moved = InputEvent::Pointer(PointerEvent {
            kind: PointerEventKind::Move,
            x: 1.0,
            y: 2.0,
            button: None,
            modifiers: Modifiers::default(),
        });
        assert_eq!(moved.kind(), EventKind::MouseMove);
    }

    #[test]
    fn digits_have_values() {
        assert_eq!(Key::Digit7.digit(), Some(7));
        assert_eq!(Key::A.digit(), None);
    }
}
