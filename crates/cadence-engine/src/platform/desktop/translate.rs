use std::collections::VecDeque;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, Ime, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::Window;

use crate::event::{ButtonState, Event, Key, Modifiers, MouseButton, WheelDelta};

/// Translates one winit `WindowEvent` into zero or more engine events.
///
/// `modifiers` is the tracked modifier state; winit 0.30 only reports it
/// through `ModifiersChanged`.
pub(super) fn translate_window_event(
    window: &Window,
    modifiers: &mut Modifiers,
    event: &WindowEvent,
    out: &mut VecDeque<Event>,
) {
    match event {
        WindowEvent::CloseRequested => out.push_back(Event::Quit),

        WindowEvent::Resized(size) => out.push_back(Event::Resized {
            width: size.width,
            height: size.height,
        }),

        WindowEvent::ScaleFactorChanged { .. } => {
            let size = window.inner_size();
            out.push_back(Event::Resized {
                width: size.width,
                height: size.height,
            });
        }

        WindowEvent::ModifiersChanged(m) => {
            *modifiers = map_modifiers(m.state());
            out.push_back(Event::ModifiersChanged(*modifiers));
        }

        WindowEvent::Focused(f) => out.push_back(Event::Focused(*f)),

        WindowEvent::CursorLeft { .. } => out.push_back(Event::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            out.push_back(Event::PointerMoved { x, y });
        }

        WindowEvent::MouseInput { state, button, .. } => out.push_back(Event::PointerButton {
            button: map_mouse_button(*button),
            state: map_state(*state),
            modifiers: *modifiers,
        }),

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => WheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    WheelDelta::Pixel { x, y }
                }
            };
            out.push_back(Event::Wheel {
                delta,
                modifiers: *modifiers,
            });
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let state = map_state(event.state);
            out.push_back(Event::Key {
                key: map_key(event.physical_key),
                state,
                modifiers: *modifiers,
                repeat: event.repeat,
            });

            // Plain typed text; IME composition arrives through `Ime::Commit`.
            if state == ButtonState::Pressed && !modifiers.ctrl && !modifiers.meta {
                if let Some(text) = event.text.as_ref().filter(|t| !t.chars().any(char::is_control)) {
                    out.push_back(Event::Text(text.to_string()));
                }
            }
        }

        WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
            out.push_back(Event::Text(text.clone()));
        }

        _ => {}
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_state(s: ElementState) -> ButtonState {
    match s {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
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

fn map_key(pk: PhysicalKey) -> Key {
    let code = match pk {
        PhysicalKey::Code(code) => code,
        // NativeKeyCode has no stable numeric form.
        PhysicalKey::Unidentified(_) => return Key::Unknown(0),
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

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

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_digits_and_function_keys_map_directly() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Key::W);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit7)), Key::Digit7);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F11)), Key::F11);
    }

    #[test]
    fn left_and_right_modifier_keys_collapse() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ShiftRight)), Key::Shift);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ControlLeft)), Key::Control);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::NumpadEnter)), Key::Enter);
    }

    #[test]
    fn unmapped_keys_keep_their_code() {
        let key = map_key(PhysicalKey::Code(KeyCode::CapsLock));
        assert_eq!(key, Key::Unknown(KeyCode::CapsLock as u32));
    }

    #[test]
    fn modifier_state_maps_each_flag() {
        let m = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert_eq!(
            m,
            Modifiers { shift: true, ctrl: false, alt: false, meta: true }
        );
    }

    #[test]
    fn mouse_buttons_keep_other_index() {
        assert_eq!(map_mouse_button(WinitMouseButton::Other(7)), MouseButton::Other(7));
        assert_eq!(map_state(ElementState::Released), ButtonState::Released);
    }
}
