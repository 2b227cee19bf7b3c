//! 2D math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) so users don't need to depend on
//! it directly. The [`Transform`] type carries position, size, and rotation
//! for every node in the scene tree.
//!
//! ## Conventions
//!
//! - Rotation is in **degrees** and always normalized into `[0, 360)`.
//! - `size` is a per-axis scale factor, not a pixel size.
//! - Positive rotation turns `+X` toward `+Y`.

pub use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate `point` around `origin` by `degrees`.
pub fn rotate_about(point: Vec2, origin: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - origin;
    origin + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// A 2D transform: position, size, and rotation.
///
/// Used both as a node's local transform and as its derived global
/// transform. The rotation field is private so it stays normalized; read it
/// with [`rotation`](Transform::rotation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformRepr", into = "TransformRepr")]
pub struct Transform {
    pub position: Vec2,
    pub size: Vec2,
    rotation: f32,
}

impl Transform {
    /// Identity transform (origin, unit size, no rotation).
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        size: Vec2::ONE,
        rotation: 0.0,
    };

    pub fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation: normalize_degrees(rotation),
        }
    }

    /// Create a transform at the given position.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::IDENTITY
        }
    }

    /// Return a copy with the given size.
    pub fn with_size(mut self, x: f32, y: f32) -> Self {
        self.size = Vec2::new(x, y);
        self
    }

    /// Return a copy with the given rotation (degrees).
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.set_rotation(degrees);
        self
    }

    /// Rotation in degrees, within `[0, 360)`.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Add `degrees` to the current rotation.
    pub fn rotate(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Compose this local transform with its parent's global transform.
    ///
    /// - rotation: `local + parent`, normalized
    /// - size: component-wise `local * parent`
    /// - position: `parent.position + rotate(local.position * parent.size, parent.rotation)`
    pub fn compose(&self, parent: &Transform) -> Transform {
        let scaled = self.position * parent.size;
        Transform {
            position: parent.position + rotate_about(scaled, Vec2::ZERO, parent.rotation),
            size: self.size * parent.size,
            rotation: normalize_degrees(self.rotation + parent.rotation),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Wire shape of a [`Transform`]: every field optional, rotation unnormalized.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct TransformRepr {
    position: Vec2,
    size: Vec2,
    rotation: f32,
}

impl Default for TransformRepr {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl From<TransformRepr> for Transform {
    fn from(repr: TransformRepr) -> Self {
        Transform::new(repr.position, repr.size, repr.rotation)
    }
}

impl From<Transform> for TransformRepr {
    fn from(t: Transform) -> Self {
        Self {
            position: t.position,
            size: t.size,
            rotation: t.rotation,
        }
    }
}
