//! Shared, read-only state visible to every component.

use crate::input::InputState;
use crate::math::Vec2;

/// Read-only process-wide state, owned and written by the [`Scene`](crate::scene::Scene).
#[derive(Default)]
pub struct Globals {
    /// `game.debug` from the active settings.
    pub(crate) debug: bool,
    /// Completed update passes since the scene was created.
    pub(crate) frame: u64,
    /// Seconds of update time since the scene was created.
    pub(crate) elapsed: f64,
    pub(crate) window_size: Vec2,
    pub(crate) input: InputState,
}

impl Globals {
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }
}
