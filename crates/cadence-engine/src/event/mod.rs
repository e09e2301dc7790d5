//! Platform-agnostic events.
//!
//! Event sources translate window-system events into [`Event`]; applications and
//! states never see winit types.

mod input;

pub use input::{ButtonState, Key, Modifiers, MouseButton, WheelDelta};

/// A single event delivered to `App::on_event` / `State::on_event`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The platform asked the application to close. Never forwarded to
    /// `on_event`; the runtime turns it into a quit request instead.
    Quit,

    /// Drawable size changed, in physical pixels. The render backend has
    /// already been reset to this size when the event is dispatched.
    Resized { width: u32, height: u32 },

    Focused(bool),

    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: ButtonState,
        modifiers: Modifiers,
        /// True when the event is an OS key-repeat.
        repeat: bool,
    },

    /// Pointer position in logical pixels.
    PointerMoved { x: f32, y: f32 },

    /// Pointer left the window surface.
    PointerLeft,

    PointerButton {
        button: MouseButton,
        state: ButtonState,
        modifiers: Modifiers,
    },

    Wheel {
        delta: WheelDelta,
        modifiers: Modifiers,
    },

    /// Committed text input.
    Text(String),
}

impl Event {
    /// True for a key press of `key`, ignoring OS repeats.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        matches!(
            self,
            Event::Key { key: k, state: ButtonState::Pressed, repeat: false, .. } if *k == key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: ButtonState, repeat: bool) -> Event {
        Event::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn key_pressed_matches_fresh_press_only() {
        assert!(key(Key::Escape, ButtonState::Pressed, false).is_key_pressed(Key::Escape));
        assert!(!key(Key::Escape, ButtonState::Pressed, true).is_key_pressed(Key::Escape));
        assert!(!key(Key::Escape, ButtonState::Released, false).is_key_pressed(Key::Escape));
        assert!(!key(Key::Space, ButtonState::Pressed, false).is_key_pressed(Key::Escape));
        assert!(!Event::Quit.is_key_pressed(Key::Escape));
    }
}
