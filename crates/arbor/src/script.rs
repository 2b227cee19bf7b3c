//! Script identifiers → component factories.
//!
//! Scene data names components by script identifier (`"body"`, `"camera"`).
//! The [`ScriptRegistry`] is filled at startup and turns an identifier plus its
//! [`Arguments`] into a boxed component. An identifier with no factory is a
//! configuration error raised at build time.
//!
//! ```ignore
//! let mut scripts = ScriptRegistry::new();
//! scripts.register_type::<Body>("body");
//! scripts.register("spinner", |args| Ok(Box::new(Spinner::new(args.get_or("Spinner", "rate", 90.0)?))));
//! ```

use std::collections::HashMap;

use crate::camera::Camera;
use crate::ecs::{Arguments, Component, FromArguments};
use crate::error::{Error, Result};

pub type ScriptFactory = Box<dyn Fn(&Arguments) -> Result<Box<dyn Component>>>;

pub struct ScriptRegistry {
    factories: HashMap<String, ScriptFactory>,
}

impl ScriptRegistry {
    /// A registry with the built-in scripts (`camera`).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_type::<Camera>("camera");
        registry
    }

    /// A registry with nothing in it.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) a factory under `id`.
    pub fn register(
        &mut self,
        id: &str,
        factory: impl Fn(&Arguments) -> Result<Box<dyn Component>> + 'static,
    ) -> &mut Self {
        if self.factories.insert(id.to_string(), Box::new(factory)).is_some() {
            log::debug!("script `{id}` re-registered");
        }
        self
    }

    /// Register a component type built through [`FromArguments`].
    pub fn register_type<T: Component + FromArguments>(&mut self, id: &str) -> &mut Self {
        self.register(id, |arguments| Ok(Box::new(T::from_arguments(arguments)?)))
    }

    pub fn with_type<T: Component + FromArguments>(mut self, id: &str) -> Self {
        self.register_type::<T>(id);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the component registered under `id`.
    pub fn create(&self, id: &str, arguments: &Arguments) -> Result<Box<dyn Component>> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| Error::UnknownScript(id.to_string()))?;
        factory(arguments)
    }
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}
