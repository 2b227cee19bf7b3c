//! # Hierarchy — Global Transform Maintenance
//!
//! Every node has a local [`Transform`] and a derived global one. The global
//! transform is recomputed before each update and each draw; nothing relies on
//! last frame's value because any ancestor may have moved since.
//!
//! A node composes against the global transform of what it hangs from:
//!
//! - its tracked parent, if it has one,
//! - otherwise the scene root it belongs to,
//! - otherwise nothing. A node with neither is its own root and its global
//!   transform equals its local one (this is how the scene root itself is
//!   handled, and any node that has been detached from a scene).
//!
//! ```ignore
//! let parent = tree.spawn(Transform::from_xy(100.0, 50.0), Some(root));
//! let child = tree.spawn(Transform::from_xy(10.0, 0.0), Some(root));
//! tree.add_child(parent, child, true)?;
//!
//! propagate_transforms(&mut tree, root);
//! // child's global position is (110, 50)
//! ```

use super::entity::Entity;
use super::tree::Tree;
use crate::math::Transform;

/// Recompute `entity`'s global transform from its own local transform and
/// the *cached* global transform of what it hangs from.
///
/// Callers walking the tree top-down (the update pass) refresh parents before
/// children, so the cached parent value is always current.
pub fn refresh_global_transform(tree: &mut Tree, entity: Entity) -> Option<Transform> {
    let local = tree.get(entity)?.transform;
    let global = match tree.attachment(entity).and_then(|above| tree.get(above)) {
        Some(above) => local.compose(&above.global),
        None => local,
    };
    tree.get_mut(entity)?.global = global;
    Some(global)
}

/// Compute `entity`'s global transform from scratch by walking its whole
/// ancestor chain, ignoring any cached values.
pub fn compute_global_transform(tree: &Tree, entity: Entity) -> Option<Transform> {
    let mut chain = vec![tree.get(entity)?.transform];
    let mut current = tree.attachment(entity);
    while let Some(above) = current {
        let Some(node) = tree.get(above) else { break };
        if chain.len() > tree.len() {
            log::warn!("ancestor chain of {entity} does not terminate; stopping at {above}");
            break;
        }
        chain.push(node.transform);
        current = tree.attachment(above);
    }

    let mut chain = chain.into_iter().rev();
    let top = chain.next()?;
    Some(chain.fold(top, |parent, local| local.compose(&parent)))
}

/// Refresh the global transform of `root` and every descendant, depth-first.
pub fn propagate_transforms(tree: &mut Tree, root: Entity) {
    refresh_global_transform(tree, root);
    for entity in tree.descendants(root) {
        refresh_global_transform(tree, entity);
    }
}
