//! # Camera — The View Collaborator
//!
//! The scene talks to its camera through [`CameraController`]:
//!
//! ```text
//! update:  for child in root.children { camera.apply(child); child.update(..) }
//! draw:    for object in registry     { camera.set(object); object.draw(..); camera.unset() }
//! ```
//!
//! The camera is an ordinary object built from a component description (by
//! default `{ "script": "camera" }`) but it is not tracked in the registry.
//! Any component can act as the camera by returning itself from
//! [`Component::as_camera`].

use crate::ecs::hierarchy::compute_global_transform;
use crate::ecs::{Arguments, Capability, Component, ComponentContext, Entity, FromArguments};
use crate::error::Result;
use crate::math::{Transform, Vec2, rotate_about};
use crate::scene::Scene;

pub const CAMERA: Capability = Capability::new("Camera");

/// Calls the scene makes on its camera around update and draw.
pub trait CameraController {
    /// Called for every scene-level child before it is updated.
    fn apply(&mut self, scene: &Scene, entity: Entity);

    /// Called before a tracked object is drawn.
    fn set(&mut self, scene: &Scene, object: Entity);

    /// Called after that object is drawn.
    fn unset(&mut self);
}

/// The built-in camera: follows its owner's global transform and maps world
/// points into view space.
#[derive(Debug, Clone)]
pub struct Camera {
    pub zoom: f32,
    pub offset: Vec2,
    owner: Option<Entity>,
    view: Transform,
    active: Option<Entity>,
}

impl Camera {
    pub fn new(zoom: f32, offset: Vec2) -> Self {
        Self {
            zoom,
            offset,
            owner: None,
            view: Transform::IDENTITY,
            active: None,
        }
    }

    /// The camera owner's global transform as of the last `apply`.
    pub fn view(&self) -> &Transform {
        &self.view
    }

    /// The object being drawn, between `set` and `unset`.
    pub fn active(&self) -> Option<Entity> {
        self.active
    }

    /// Map a world-space point into view space.
    pub fn to_view(&self, point: Vec2) -> Vec2 {
        let relative = point - self.view.position - self.offset;
        rotate_about(relative, Vec2::ZERO, -self.view.rotation()) * self.zoom
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0, Vec2::ZERO)
    }
}

impl FromArguments for Camera {
    fn from_arguments(arguments: &Arguments) -> Result<Self> {
        let zoom = arguments.get_or("Camera", "zoom", 1.0)?;
        let offset = arguments.get_or("Camera", "offset", Vec2::ZERO)?;
        Ok(Self::new(zoom, offset))
    }
}

impl Component for Camera {
    fn capability(&self) -> Capability {
        CAMERA
    }

    fn awake(&mut self, ctx: &mut ComponentContext<'_>) -> Result<()> {
        self.owner = Some(ctx.owner());
        Ok(())
    }

    fn as_camera(&mut self) -> Option<&mut dyn CameraController> {
        Some(self)
    }
}

impl CameraController for Camera {
    fn apply(&mut self, scene: &Scene, _entity: Entity) {
        if let Some(view) = self.owner.and_then(|owner| compute_global_transform(scene.tree(), owner)) {
            self.view = view;
        }
    }

    fn set(&mut self, _scene: &Scene, object: Entity) {
        self.active = Some(object);
    }

    fn unset(&mut self) {
        self.active = None;
    }
}
