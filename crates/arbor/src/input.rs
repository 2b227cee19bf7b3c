//! Keyboard and mouse state.
//!
//! [`Input`] tracks which keys or buttons are held, went down this frame, or
//! went up this frame. The scene feeds it from the [`Event`](crate::event::Event)s
//! it dispatches and clears the per-frame edges at the end of each update.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::event::Event;
use crate::math::Vec2;

/// Held / just-pressed / just-released sets for one kind of input.
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
    just_released: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    pub fn just_released(&self, input: T) -> bool {
        self.just_released.contains(&input)
    }

    /// Whether any input is currently held.
    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub(crate) fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    pub(crate) fn release(&mut self, input: T) {
        if self.pressed.remove(&input) {
            self.just_released.insert(input);
        }
    }

    /// Drop everything, held inputs included. Used on focus loss.
    pub(crate) fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }

    pub(crate) fn clear_just(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the scene knows about the player's devices.
#[derive(Default)]
pub struct InputState {
    pub keys: Input<KeyCode>,
    pub mouse: Input<MouseButton>,
    /// Cursor position in window coordinates.
    pub cursor: Vec2,
    /// Wheel movement accumulated this frame.
    pub wheel: Vec2,
    /// Text typed this frame.
    pub text: String,
}

impl InputState {
    /// Fold one event into the state.
    pub(crate) fn apply(&mut self, event: &Event) {
        match event {
            Event::KeyPressed { key, .. } => self.keys.press(*key),
            Event::KeyReleased { key } => self.keys.release(*key),
            Event::TextInput(text) => self.text.push_str(text),
            Event::MousePressed { position, button } => {
                self.cursor = *position;
                self.mouse.press(*button);
            }
            Event::MouseReleased { position, button } => {
                self.cursor = *position;
                self.mouse.release(*button);
            }
            Event::MouseMoved { position, .. } => self.cursor = *position,
            Event::WheelMoved { delta } => self.wheel += *delta,
            Event::Focus(false) => {
                self.keys.reset();
                self.mouse.reset();
            }
            Event::Focus(true) | Event::Resize { .. } | Event::Visible(_) | Event::Quit => {}
        }
    }

    /// End-of-frame cleanup of edge-triggered state.
    pub(crate) fn end_frame(&mut self) {
        self.keys.clear_just();
        self.mouse.clear_just();
        self.wheel = Vec2::ZERO;
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_edges() {
        let mut input = Input::new();
        input.press(KeyCode::Space);
        assert!(input.pressed(KeyCode::Space));
        assert!(input.just_pressed(KeyCode::Space));

        input.clear_just();
        input.press(KeyCode::Space);
        assert!(!input.just_pressed(KeyCode::Space), "held key is not re-pressed");

        input.release(KeyCode::Space);
        assert!(input.just_released(KeyCode::Space));
        assert!(!input.pressed(KeyCode::Space));
    }

    #[test]
    fn events_update_state() {
        let mut state = InputState::default();
        state.apply(&Event::MousePressed {
            position: Vec2::new(3.0, 4.0),
            button: MouseButton::Left,
        });
        state.apply(&Event::WheelMoved { delta: Vec2::new(0.0, 1.0) });
        state.apply(&Event::TextInput("hi".into()));
        assert_eq!(state.cursor, Vec2::new(3.0, 4.0));
        assert!(state.mouse.pressed(MouseButton::Left));
        assert_eq!(state.wheel.y, 1.0);
        assert_eq!(state.text, "hi");

        state.end_frame();
        assert!(state.mouse.pressed(MouseButton::Left));
        assert!(!state.mouse.just_pressed(MouseButton::Left));
        assert_eq!(state.wheel, Vec2::ZERO);
        assert!(state.text.is_empty());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        state.apply(&Event::KeyPressed { key: KeyCode::KeyW, repeat: false });
        state.apply(&Event::Focus(false));
        assert!(!state.keys.any_pressed());
    }
}
