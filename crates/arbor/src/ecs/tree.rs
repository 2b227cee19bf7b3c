//! # Tree — The Node Arena
//!
//! [`Tree`] owns every node of a scene. Nodes are addressed by [`Entity`]
//! handles and linked into a hierarchy through three fields:
//!
//! ```text
//! EntityNode
//!   children: Vec<Entity>    ← owned, ordered (insertion = update order)
//!   parent:   Option<Entity> ← back-reference, non-owning
//!   scene:    Option<Entity> ← back-reference to the scene root, non-owning
//! ```
//!
//! A node sitting directly under the scene root usually has `parent == None`
//! and `scene == Some(root)`: it is placed at scene level without tracking
//! the root as its parent. Global transforms then compose against the root's
//! global transform (see [`hierarchy`](super::hierarchy)).
//!
//! Reparenting is always a move. [`Tree::add_child`] detaches the child from
//! its old parent *and* from the scene-level list before appending it, so a
//! node is never listed under two parents.

use super::entity::{Entity, EntityAllocator};
use super::object::ObjectData;
use crate::error::{Error, Result};
use crate::math::Transform;

/// A node in the scene tree: a local transform, its derived global
/// transform, links, and (for objects) the attached components.
pub struct EntityNode {
    pub(crate) transform: Transform,
    pub(crate) global: Transform,
    pub(crate) parent: Option<Entity>,
    pub(crate) scene: Option<Entity>,
    pub(crate) children: Vec<Entity>,
    pub(crate) object: Option<ObjectData>,
}

impl EntityNode {
    pub(crate) fn new(transform: Transform, scene: Option<Entity>) -> Self {
        Self {
            transform,
            global: transform,
            parent: None,
            scene,
            children: Vec::new(),
            object: None,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The global transform computed during the last update or draw pass.
    pub fn global_transform(&self) -> &Transform {
        &self.global
    }

    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    pub fn scene(&self) -> Option<Entity> {
        self.scene
    }

    pub fn children(&self) -> &[Entity] {
        &self.children
    }

    pub fn object(&self) -> Option<&ObjectData> {
        self.object.as_ref()
    }
}

/// Arena of [`EntityNode`]s with hierarchy operations.
pub struct Tree {
    allocator: EntityAllocator,
    nodes: Vec<Option<EntityNode>>,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            nodes: Vec::new(),
        }
    }

    /// Create a detached node. `scene` is the root it belongs to, if any.
    pub fn spawn(&mut self, transform: Transform, scene: Option<Entity>) -> Entity {
        self.spawn_node(EntityNode::new(transform, scene))
    }

    pub(crate) fn spawn_node(&mut self, node: EntityNode) -> Entity {
        let entity = self.allocator.allocate();
        let index = entity.index as usize;
        if index == self.nodes.len() {
            self.nodes.push(Some(node));
        } else {
            self.nodes[index] = Some(node);
        }
        entity
    }

    /// Free a node's slot and return its data. Children and links are left
    /// untouched; callers tear those down first.
    pub(crate) fn despawn(&mut self, entity: Entity) -> Option<EntityNode> {
        if !self.allocator.deallocate(entity) {
            return None;
        }
        self.nodes[entity.index as usize].take()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.allocator.alive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, entity: Entity) -> Option<&EntityNode> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get(entity.index as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, entity: Entity) -> Option<&mut EntityNode> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get_mut(entity.index as usize)?.as_mut()
    }

    /// Iterate over every live node in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &EntityNode)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            let node = node.as_ref()?;
            let generation = self.allocator.generation(index as u32)?;
            Some((Entity::new(index as u32, generation), node))
        })
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.get(entity)?.parent
    }

    /// Children in insertion order. Empty for dead handles.
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.get(entity).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// The node this one hangs from: its tracked parent, or else its scene root.
    pub(crate) fn attachment(&self, entity: Entity) -> Option<Entity> {
        let node = self.get(entity)?;
        node.parent.or(node.scene.filter(|&root| root != entity))
    }

    /// Returns `true` if `ancestor` is above `entity` in the hierarchy.
    pub fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.attachment(entity);
        let mut steps = 0;
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                log::warn!("cycle detected above {entity} while walking ancestors");
                return false;
            }
            current = self.attachment(node);
        }
        false
    }

    /// Remove `child` from its parent's list and from its scene-level
    /// placement, and clear its parent back-reference.
    pub fn detach(&mut self, child: Entity) {
        let Some(node) = self.get_mut(child) else {
            return;
        };
        let parent = node.parent.take();
        let scene = node.scene;
        for holder in [parent, scene].into_iter().flatten() {
            if let Some(holder) = self.get_mut(holder) {
                holder.children.retain(|&c| c != child);
            }
        }
    }

    /// Append `child` to `parent`'s children, moving it from wherever it was.
    ///
    /// With `track_parent` the child's parent back-reference is set; without
    /// it the child is listed under `parent` but keeps no parent link (used
    /// for scene-level placement under the root).
    pub fn add_child(&mut self, parent: Entity, child: Entity, track_parent: bool) -> Result<()> {
        if parent == child {
            return Err(Error::SelfParent(child));
        }
        for entity in [parent, child] {
            if !self.is_alive(entity) {
                return Err(Error::DeadEntity(entity));
            }
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::Cycle { parent, child });
        }

        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if track_parent {
            if let Some(node) = self.get_mut(child) {
                node.parent = Some(parent);
            }
        }
        Ok(())
    }

    /// Remove `child` from `parent`'s children. Returns `false` if it was not
    /// listed there. The child's parent back-reference is cleared.
    pub fn remove_child(&mut self, parent: Entity, child: Entity) -> bool {
        let Some(node) = self.get_mut(parent) else {
            return false;
        };
        let Some(position) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(position);
        if let Some(child_node) = self.get_mut(child) {
            if child_node.parent == Some(parent) {
                child_node.parent = None;
            }
        }
        true
    }

    /// All descendants of `entity` in depth-first pre-order (excluding `entity`).
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack: Vec<Entity> = self.children(entity).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
