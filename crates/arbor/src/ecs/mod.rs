//! # Scene Tree and Components
//!
//! The runtime's data model: an arena of nodes linked into a hierarchy, some
//! of which are objects carrying ordered, dependency-checked components.
//!
//! ## Module Overview
//!
//! - [`entity`] — Generational handles
//! - [`tree`] — Node arena, parent/child links, reparenting
//! - [`hierarchy`] — Global transform computation
//! - [`component`] — Component trait, capabilities, arguments, callback context
//! - [`object`] — Component slots and per-object update/draw/dispatch

pub mod component;
pub mod entity;
pub mod hierarchy;
pub mod object;
pub mod tree;

pub use component::{
    Arguments, AsAny, Capability, Component, ComponentContext, FromArguments, Requirement,
};
pub use entity::Entity;
pub use hierarchy::{compute_global_transform, propagate_transforms, refresh_global_transform};
pub use object::ObjectData;
pub use tree::{EntityNode, Tree};
