use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::input::{
    InputEvent, Key, KeyEvent, KeyEventKind, Modifiers, MouseButton, PointerEvent,
    PointerEventKind,
};

/// Host-side state needed to complete winit events.
///
/// winit reports modifiers and cursor position separately from the events
/// that need them, so both are tracked here.
#[derive(Debug, Default)]
pub(crate) struct InputTracker {
    modifiers: Modifiers,
    pointer: (f32, f32),
}

impl InputTracker {
    /// Translates a winit `WindowEvent` into zero or more engine events.
    ///
    /// Coordinates are physical pixels, matching the canvas.
    pub(crate) fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                Vec::new()
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = (position.x as f32, position.y as f32);
                vec![self.pointer_event(PointerEventKind::Move, None)]
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let kind = match state {
                    ElementState::Pressed => PointerEventKind::Down,
                    ElementState::Released => PointerEventKind::Up,
                };
                vec![self.pointer_event(kind, Some(map_mouse_button(*button)))]
            }

            WindowEvent::KeyboardInput { event, .. } => key_events(
                map_key(event.physical_key),
                event.text.as_deref(),
                event.state == ElementState::Pressed,
                event.repeat,
                self.modifiers,
            )
            .into_iter()
            .map(InputEvent::Key)
            .collect(),

            _ => Vec::new(),
        }
    }

    fn pointer_event(&self, kind: PointerEventKind, button: Option<MouseButton>) -> InputEvent {
        let (x, y) = self.pointer;
        InputEvent::Pointer(PointerEvent {
            kind,
            x,
            y,
            button,
            modifiers: self.modifiers,
        })
    }
}

/// Splits one platform key transition into engine key events.
///
/// A press yields `Down`, followed by `Press` when it produced a character.
/// Control characters other than Enter's carriage return do not count.
pub(crate) fn key_events(
    key: Key,
    text: Option<&str>,
    pressed: bool,
    repeat: bool,
    modifiers: Modifiers,
) -> Vec<KeyEvent> {
    let base = |kind| KeyEvent {
        kind,
        key,
        text: None,
        modifiers,
        repeat,
    };

    if !pressed {
        return vec![base(KeyEventKind::Up)];
    }

    let mut out = vec![base(KeyEventKind::Down)];
    let ch = text
        .and_then(|t| t.chars().next())
        .filter(|c| !c.is_control() || (key == Key::Enter && *c == '\r'));
    if let Some(c) = ch {
        out.push(base(KeyEventKind::Press).with_text(c));
    }
    out
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

pub(crate) fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,
        KeyCode::Delete => Key::Delete,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 | KeyCode::Numpad0 => Key::Digit0,
        KeyCode::Digit1 | KeyCode::Numpad1 => Key::Digit1,
        KeyCode::Digit2 | KeyCode::Numpad2 => Key::Digit2,
        KeyCode::Digit3 | KeyCode::Numpad3 => Key::Digit3,
        KeyCode::Digit4 | KeyCode::Numpad4 => Key::Digit4,
        KeyCode::Digit5 | KeyCode::Numpad5 => Key::Digit5,
        KeyCode::Digit6 | KeyCode::Numpad6 => Key::Digit6,
        KeyCode::Digit7 | KeyCode::Numpad7 => Key::Digit7,
        KeyCode::Digit8 | KeyCode::Numpad8 => Key::Digit8,
        KeyCode::Digit9 | KeyCode::Numpad9 => Key::Digit9,

        other => Key::Unknown(other as u32),
    }
}
