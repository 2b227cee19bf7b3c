//! # Arbor — Entity/Component Runtime
//!
//! A scene graph of transforms, objects carrying ordered, dependency-checked
//! components, and a builder that turns declarative scene data (with prefabs
//! and argument overrides) into live objects.
//!
//! Start with `use arbor::prelude::*`, register your component scripts in a
//! [`ScriptRegistry`](script::ScriptRegistry), and
//! [`load`](scene::Scene::load) a scene.

pub mod backend;
pub mod builder;
pub mod camera;
pub mod description;
pub mod ecs;
pub mod error;
pub mod event;
pub mod globals;
pub mod input;
pub mod math;
pub mod prelude;
pub mod scene;
pub mod script;
pub mod settings;
pub mod source;

#[cfg(feature = "diagnostics")]
pub mod diag;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
