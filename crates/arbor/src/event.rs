//! Input and window events delivered to every component.
//!
//! The host loop (a winit event loop, a test, a replay file) translates its
//! own events into [`Event`]s and hands them to
//! [`Scene::dispatch`](crate::scene::Scene::dispatch). Keys and buttons use
//! winit's types so a winit host needs no mapping table.

use crate::input::{KeyCode, MouseButton};
use crate::math::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyPressed { key: KeyCode, repeat: bool },
    KeyReleased { key: KeyCode },
    TextInput(String),
    MousePressed { position: Vec2, button: MouseButton },
    MouseReleased { position: Vec2, button: MouseButton },
    MouseMoved { position: Vec2, delta: Vec2 },
    WheelMoved { delta: Vec2 },
    Focus(bool),
    Resize { width: u32, height: u32 },
    Visible(bool),
    Quit,
}

impl Event {
    /// Stable lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::KeyPressed { .. } => "keypressed",
            Event::KeyReleased { .. } => "keyreleased",
            Event::TextInput(_) => "textinput",
            Event::MousePressed { .. } => "mousepressed",
            Event::MouseReleased { .. } => "mousereleased",
            Event::MouseMoved { .. } => "mousemoved",
            Event::WheelMoved { .. } => "wheelmoved",
            Event::Focus(_) => "focus",
            Event::Resize { .. } => "resize",
            Event::Visible(_) => "visible",
            Event::Quit => "quit",
        }
    }
}
