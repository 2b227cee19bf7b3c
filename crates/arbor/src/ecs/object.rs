//! # Objects — Entities That Carry Components
//!
//! An object is a tree node with an [`ObjectData`] payload: a name and an
//! ordered list of component slots. Objects are created through the
//! [`Scene`], which registers them immediately.
//!
//! ## Slots and the take/put-back pattern
//!
//! ```text
//! ObjectData
//!   slots: [ ComponentSlot { component: Some(Box<dyn Component>), bindings } , ... ]
//! ```
//!
//! Before a callback runs, the component is taken out of its slot (leaving
//! `None`), so the callback can hold `&mut self` while its [`ComponentContext`]
//! holds `&mut Scene`. Afterwards it is put back, unless the owner was
//! destroyed or its components were cleared in the meantime, in which case
//! the component is dropped.
//!
//! Each slot also keeps the capabilities its component reported at attach
//! time, so capability checks and requirement binding still count a
//! component while it is out of its slot.
//!
//! ## Fan-out order
//!
//! Update, draw, and event dispatch visit components in attach order. Update
//! and dispatch then recurse into children in child-list order
//! (components first, children second).

use super::component::{Capability, Component, ComponentContext, Requirement};
use super::entity::Entity;
use super::hierarchy::{compute_global_transform, refresh_global_transform};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::math::Transform;
use crate::scene::Scene;

/// Requirement name → index of the bound slot on the same object.
#[derive(Debug, Clone, Default)]
pub(crate) struct Bindings(Vec<(&'static str, usize)>);

impl Bindings {
    fn bind(&mut self, name: &'static str, slot: usize) {
        self.0.push((name, slot));
    }

    pub(crate) fn get(&self, name: &str) -> Option<usize> {
        self.0.iter().find(|(n, _)| *n == name).map(|&(_, slot)| slot)
    }
}

pub(crate) struct ComponentSlot {
    pub(crate) component: Option<Box<dyn Component>>,
    pub(crate) bindings: Bindings,
    capabilities: Vec<Capability>,
    type_name: &'static str,
}

/// The component-carrying part of an object node.
pub struct ObjectData {
    pub(crate) name: String,
    pub(crate) tracked: bool,
    pub(crate) slots: Vec<ComponentSlot>,
}

impl ObjectData {
    pub(crate) fn new(name: &str, tracked: bool) -> Self {
        Self {
            name: name.to_string(),
            tracked,
            slots: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the object is listed in the scene registry.
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    /// Number of attached components.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether any attached component provides `capability`, counting one
    /// whose callback is currently running.
    pub fn has(&self, capability: Capability) -> bool {
        self.slots.iter().any(|slot| slot.capabilities.contains(&capability))
    }

    /// How many attached components provide `capability`, counting one whose
    /// callback is currently running.
    pub fn count(&self, capability: Capability) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.capabilities.contains(&capability))
            .count()
    }

    /// Attached components in attach order. A component currently running a
    /// callback is borrowed by that callback and skipped.
    pub fn components(&self) -> impl Iterator<Item = &(dyn Component + 'static)> {
        self.slots.iter().filter_map(|slot| slot.component.as_deref())
    }

    /// First component providing `capability`.
    pub fn get_component(&self, capability: Capability) -> Option<&(dyn Component + 'static)> {
        self.components().find(|c| c.provides(capability))
    }

    /// Every component providing `capability`, in attach order.
    pub fn get_components(&self, capability: Capability) -> Vec<&(dyn Component + 'static)> {
        self.components().filter(|c| c.provides(capability)).collect()
    }

    /// First component of concrete type `T`.
    pub fn component<T: Component>(&self) -> Option<&T> {
        self.components().find_map(|c| c.downcast_ref::<T>())
    }

    pub fn component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.component.as_deref_mut())
            .find_map(|c| c.downcast_mut::<T>())
    }

    /// First slot satisfying `requirement`, in attach order.
    ///
    /// A running component binds on its recorded capabilities alone. If the
    /// requirement carries a filter, the first such candidate cannot be
    /// checked and its type name is returned as the error.
    fn resolve(&self, requirement: &Requirement) -> std::result::Result<Option<usize>, &'static str> {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot.component.as_deref() {
                Some(component) if requirement.matches(component) => return Ok(Some(index)),
                Some(_) => {}
                None if slot.capabilities.contains(&requirement.capability) => {
                    return match requirement.filter {
                        None => Ok(Some(index)),
                        Some(_) => Err(slot.type_name),
                    };
                }
                None => {}
            }
        }
        Ok(None)
    }
}

// ── Object operations on the scene ───────────────────────────────────────

impl Scene {
    /// Create an object at scene level. Tracked objects are appended to the
    /// registry right away; untracked ones (such as the camera) are part of
    /// the tree but invisible to registry queries.
    pub fn create_object(&mut self, name: &str, transform: Transform, track: bool) -> Entity {
        let root = self.root();
        let object = self.tree.spawn(transform, Some(root));
        if let Some(node) = self.tree.get_mut(object) {
            node.object = Some(ObjectData::new(name, track));
        }
        if let Some(node) = self.tree.get_mut(root) {
            node.children.push(object);
        }
        if track {
            self.registry.push(object);
        }
        log::debug!("created object `{name}` ({object}), tracked: {track}");
        object
    }

    /// Attach a component to `object`, binding its requirements against the
    /// components already attached, then run its `awake` callback.
    ///
    /// If any requirement is unmet the component is not attached and the
    /// error lists every missing capability. If `awake` fails the component
    /// is detached again, together with anything its `awake` attached.
    pub fn add_component(&mut self, object: Entity, component: Box<dyn Component>) -> Result<()> {
        let node = self.tree.get_mut(object).ok_or(Error::DeadEntity(object))?;
        let data = node.object.as_mut().ok_or(Error::NotAnObject(object))?;

        let mut bindings = Bindings::default();
        let mut missing = Vec::new();
        for requirement in component.works_with() {
            match data.resolve(&requirement) {
                Ok(Some(slot)) => bindings.bind(requirement.name, slot),
                Ok(None) => missing.push(requirement.capability.name().to_string()),
                Err(busy) => {
                    return Err(Error::ComponentBusy {
                        component: component.type_name().to_string(),
                        object: data.name.clone(),
                        busy: busy.to_string(),
                    });
                }
            }
        }
        if !missing.is_empty() {
            return Err(Error::MissingDependencies {
                component: component.type_name().to_string(),
                object: data.name.clone(),
                missing,
            });
        }

        log::debug!("attached {} to `{}`", component.type_name(), data.name);
        let slot = data.slots.len();
        data.slots.push(ComponentSlot {
            capabilities: component.capabilities(),
            type_name: component.type_name(),
            component: Some(component),
            bindings,
        });

        let awake = self
            .with_component(object, slot, |component, ctx| component.awake(ctx))
            .unwrap_or(Ok(()));
        if awake.is_err() {
            if let Some(data) = self.object_mut(object) {
                log::debug!("detaching slot {slot} of `{}` after a failed awake", data.name);
                data.slots.truncate(slot);
            }
        }
        awake
    }

    /// Drop every component of `object`.
    pub fn clear_components(&mut self, object: Entity) {
        if let Some(data) = self.tree.get_mut(object).and_then(|n| n.object.as_mut()) {
            data.slots.clear();
        }
    }

    pub fn object(&self, object: Entity) -> Option<&ObjectData> {
        self.tree.get(object)?.object.as_ref()
    }

    pub fn object_mut(&mut self, object: Entity) -> Option<&mut ObjectData> {
        self.tree.get_mut(object)?.object.as_mut()
    }

    pub fn get_component(&self, object: Entity, capability: Capability) -> Option<&(dyn Component + 'static)> {
        self.object(object)?.get_component(capability)
    }

    pub fn get_components(&self, object: Entity, capability: Capability) -> Vec<&(dyn Component + 'static)> {
        self.object(object)
            .map(|o| o.get_components(capability))
            .unwrap_or_default()
    }

    pub fn component<T: Component>(&self, object: Entity) -> Option<&T> {
        self.object(object)?.component::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, object: Entity) -> Option<&mut T> {
        self.object_mut(object)?.component_mut::<T>()
    }

    /// Run `f` on the component in `slot` of `owner`, with the component taken
    /// out of the scene for the duration of the call.
    ///
    /// Returns `None` if there is no such component (or it is already running).
    pub(crate) fn with_component<R>(
        &mut self,
        owner: Entity,
        slot: usize,
        f: impl FnOnce(&mut (dyn Component + 'static), &mut ComponentContext<'_>) -> R,
    ) -> Option<R> {
        let mut component = self
            .tree
            .get_mut(owner)?
            .object
            .as_mut()?
            .slots
            .get_mut(slot)?
            .component
            .take()?;

        let result = {
            let mut ctx = ComponentContext {
                scene: self,
                owner,
                slot,
            };
            f(component.as_mut(), &mut ctx)
        };

        let home = self
            .tree
            .get_mut(owner)
            .and_then(|n| n.object.as_mut())
            .and_then(|o| o.slots.get_mut(slot));
        match home {
            Some(home) if home.component.is_none() => home.component = Some(component),
            _ => log::trace!(
                "dropping {} whose owner {owner} went away during its callback",
                component.type_name()
            ),
        }
        Some(result)
    }

    pub(crate) fn slot_count(&self, entity: Entity) -> usize {
        self.object(entity).map_or(0, ObjectData::len)
    }

    /// Label used when annotating update failures.
    pub(crate) fn label(&self, entity: Entity) -> String {
        match self.name_of(entity) {
            Some(name) => name.to_string(),
            None => format!("entity {entity}"),
        }
    }

    /// Update one entity: refresh its global transform, update its components
    /// in attach order, then recurse into its children.
    ///
    /// A failure in a child is annotated with the child's name and handle and
    /// passed upward.
    pub(crate) fn update_entity(&mut self, entity: Entity, dt: f32, first_update: bool) -> Result<()> {
        refresh_global_transform(&mut self.tree, entity);

        for slot in 0..self.slot_count(entity) {
            let outcome =
                self.with_component(entity, slot, |c, ctx| c.update(ctx, dt, first_update));
            if let Some(result) = outcome {
                result?;
            }
            if !self.tree.is_alive(entity) {
                return Ok(());
            }
        }

        for child in self.tree.children(entity).to_vec() {
            if !self.tree.is_alive(child) {
                continue;
            }
            let name = self.label(child);
            self.update_entity(child, dt, first_update)
                .map_err(|source| Error::Update {
                    name,
                    entity: child,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    /// Draw one object's components in attach order. Children are not
    /// visited; every tracked object is drawn from the registry.
    pub(crate) fn draw_object(&mut self, object: Entity, debug: bool) {
        if let Some(global) = compute_global_transform(&self.tree, object) {
            if let Some(node) = self.tree.get_mut(object) {
                node.global = global;
            }
        }
        for slot in 0..self.slot_count(object) {
            self.with_component(object, slot, |c, ctx| c.draw(ctx, debug));
            if !self.tree.is_alive(object) {
                return;
            }
        }
    }

    /// Deliver `event` to the entity's components, then to its children.
    pub(crate) fn dispatch_to(&mut self, entity: Entity, event: &Event) {
        for slot in 0..self.slot_count(entity) {
            self.with_component(entity, slot, |c, ctx| c.on_event(ctx, event));
            if !self.tree.is_alive(entity) {
                return;
            }
        }
        for child in self.tree.children(entity).to_vec() {
            if self.tree.is_alive(child) {
                self.dispatch_to(child, event);
            }
        }
    }
}
