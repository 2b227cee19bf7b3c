//! # Components — Composable Behavior
//!
//! A [`Component`] is a behavior unit attached to exactly one object. It
//! names the [`Capability`] it fulfills, declares which other capabilities it
//! works with, and receives lifecycle callbacks (`awake`, `update`, `draw`,
//! `on_event`) through a [`ComponentContext`].
//!
//! ## Dependencies
//!
//! [`Component::works_with`] returns a list of [`Requirement`]s. When the
//! component is attached, each requirement is matched against the components
//! *already* on the owner, in attach order, and the first match is bound under
//! the requirement's name. Inside callbacks the bound component is reached with
//! [`ComponentContext::dependency`]:
//!
//! ```ignore
//! impl Component for Shooter {
//!     fn capability(&self) -> Capability { SHOOTER }
//!     fn works_with(&self) -> Vec<Requirement> {
//!         vec![Requirement::new("body", BODY)]
//!     }
//!     fn update(&mut self, ctx: &mut ComponentContext<'_>, dt: f32, _first: bool) -> Result<()> {
//!         let speed = ctx.dependency::<Body>("body").map(|b| b.speed).unwrap_or(0.0);
//!         // ...
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Declaration order is dependency order: a component cannot depend on one
//! attached after it.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::Entity;
use super::hierarchy::compute_global_transform;
use crate::camera::CameraController;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::globals::Globals;
use crate::math::Transform;
use crate::scene::Scene;

// ── Capability ───────────────────────────────────────────────────────────

/// A stable tag naming the role a component fulfills.
///
/// Capabilities are what other components ask for in their requirements, and
/// what scene-wide queries filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// ── Requirement ──────────────────────────────────────────────────────────

/// A co-component a component needs on its owner, bound under `name`.
#[derive(Clone, Copy)]
pub struct Requirement {
    pub name: &'static str,
    pub capability: Capability,
    /// Narrows the candidates that provide `capability`.
    pub filter: Option<fn(&(dyn Component + 'static)) -> bool>,
}

impl Requirement {
    pub fn new(name: &'static str, capability: Capability) -> Self {
        Self {
            name,
            capability,
            filter: None,
        }
    }

    pub fn filtered(mut self, filter: fn(&(dyn Component + 'static)) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn matches(&self, component: &(dyn Component + 'static)) -> bool {
        component.provides(self.capability) && self.filter.is_none_or(|f| f(component))
    }
}

// ── Component trait ──────────────────────────────────────────────────────

/// Upcast helper so `dyn Component` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behavior unit attached to an object.
///
/// All callbacks have no-op defaults; implement the ones the component needs.
pub trait Component: AsAny {
    /// The primary capability this component fulfills.
    fn capability(&self) -> Capability;

    /// Every capability this component can stand in for, read once at attach
    /// time. Override to fulfill more than one (e.g. a `CircleCollider` that is
    /// also a `Collider`).
    fn capabilities(&self) -> Vec<Capability> {
        vec![self.capability()]
    }

    /// Short type name used in diagnostics and error messages.
    fn type_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Co-components this one needs, resolved once at attach time.
    fn works_with(&self) -> Vec<Requirement> {
        Vec::new()
    }

    /// Called once after attach, when every dependency is bound.
    fn awake(&mut self, _ctx: &mut ComponentContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Per-frame update. `first_update` is `true` only during the scene's
    /// first update pass, after every object of the scene has been built.
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _dt: f32, _first_update: bool) -> Result<()> {
        Ok(())
    }

    /// Per-frame draw. `debug` asks for debug overlays.
    fn draw(&mut self, _ctx: &mut ComponentContext<'_>, _debug: bool) {}

    /// Input/window event notification.
    fn on_event(&mut self, _ctx: &mut ComponentContext<'_>, _event: &Event) {}

    /// Expose the camera interface if this component is a camera.
    fn as_camera(&mut self) -> Option<&mut dyn CameraController> {
        None
    }
}

impl dyn Component {
    /// Whether this component can stand in for `capability`.
    pub fn provides(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    pub fn is<T: Component>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ── Arguments ────────────────────────────────────────────────────────────

/// Named construction arguments of a component, as found in scene data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Raw value of an argument. `null` counts as absent.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fail with every missing name at once if any of `names` is absent.
    pub fn require(&self, component: &str, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.contains(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingArguments {
                component: component.to_string(),
                missing,
            })
        }
    }

    /// Typed read of an optional argument.
    pub fn get<T: DeserializeOwned>(&self, component: &str, name: &str) -> Result<Option<T>> {
        let Some(value) = self.value(name) else {
            return Ok(None);
        };
        T::deserialize(value)
            .map(Some)
            .map_err(|e| Error::InvalidArgument {
                component: component.to_string(),
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Typed read with a fallback for absent arguments.
    pub fn get_or<T: DeserializeOwned>(&self, component: &str, name: &str, default: T) -> Result<T> {
        Ok(self.get(component, name)?.unwrap_or(default))
    }

    /// Typed read of an argument that must be present.
    pub fn required<T: DeserializeOwned>(&self, component: &str, name: &str) -> Result<T> {
        self.require(component, &[name])?;
        self.get(component, name)?.ok_or_else(|| Error::MissingArguments {
            component: component.to_string(),
            missing: vec![name.to_string()],
        })
    }

    /// Shallow merge: every key of `overrides` replaces or extends ours.
    pub fn merge(&mut self, overrides: &Arguments) {
        for (name, value) in &overrides.0 {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Construct a component from its scene-data arguments.
pub trait FromArguments: Sized {
    fn from_arguments(arguments: &Arguments) -> Result<Self>;
}

// ── ComponentContext ─────────────────────────────────────────────────────

/// What a component sees during a callback: its owner, its bound
/// dependencies, the shared [`Globals`], and the scene itself.
///
/// The component being called is temporarily taken out of its slot, so it can
/// freely borrow the rest of the scene (including other components of its
/// owner) through this context. While it runs, reference-returning queries
/// skip it; capability checks such as [`ObjectData::count`] and
/// requirement binding still see it.
///
/// [`ObjectData::count`]: super::ObjectData::count
pub struct ComponentContext<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) owner: Entity,
    pub(crate) slot: usize,
}

impl<'a> ComponentContext<'a> {
    /// The object this component is attached to.
    pub fn owner(&self) -> Entity {
        self.owner
    }

    /// The owner's name, or `""` if the owner has been destroyed.
    pub fn name(&self) -> &str {
        self.scene.name_of(self.owner).unwrap_or("")
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    pub fn globals(&self) -> &Globals {
        self.scene.globals()
    }

    /// The owner's local transform.
    pub fn transform(&self) -> Option<&Transform> {
        self.scene.transform(self.owner)
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.scene.transform_mut(self.owner)
    }

    /// The owner's global transform, computed from its current ancestor chain.
    pub fn global_transform(&self) -> Option<Transform> {
        compute_global_transform(self.scene.tree(), self.owner)
    }

    /// The component bound under `name` by this component's requirements.
    pub fn dependency_dyn(&self, name: &str) -> Option<&(dyn Component + 'static)> {
        let object = self.scene.tree().get(self.owner)?.object.as_ref()?;
        let index = object.slots.get(self.slot)?.bindings.get(name)?;
        object.slots.get(index)?.component.as_deref()
    }

    pub fn dependency<T: Component>(&self, name: &str) -> Option<&T> {
        self.dependency_dyn(name)?.downcast_ref::<T>()
    }

    pub fn dependency_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        let object = self.scene.tree.get_mut(self.owner)?.object.as_mut()?;
        let index = object.slots.get(self.slot)?.bindings.get(name)?;
        object
            .slots
            .get_mut(index)?
            .component
            .as_deref_mut()?
            .downcast_mut::<T>()
    }
}
