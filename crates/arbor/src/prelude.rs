//! Convenience re-exports — `use arbor::prelude::*` for the common items.

pub use crate::backend::{HeadlessWindow, WindowBackend};
pub use crate::builder::build_object;
pub use crate::camera::{CAMERA, Camera, CameraController};
pub use crate::description::{
    ComponentDescription, ObjectDescription, PrefabDescription, Prefabs, SceneDescription,
};
pub use crate::ecs::{
    Arguments, Capability, Component, ComponentContext, Entity, FromArguments, Requirement,
};
pub use crate::error::{Error, Result};
pub use crate::event::Event;
pub use crate::globals::Globals;
pub use crate::input::{Input, InputState, KeyCode, MouseButton};
pub use crate::math::{Transform, Vec2};
pub use crate::scene::{Scene, SceneSource, SceneState, SettingsSource};
pub use crate::script::ScriptRegistry;
pub use crate::settings::{GameSettings, GraphicsSettings, Settings, WindowSettings};
pub use crate::source::{DirectorySource, MemorySource, SourceLoader};

#[cfg(feature = "diagnostics")]
pub use crate::diag::SceneSnapshot;
