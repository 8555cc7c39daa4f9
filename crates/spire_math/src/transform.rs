//! Position + rotation transform

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// World transform of a character or environment object.
///
/// Scale is never touched by gameplay so it is not carried here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    /// Create a new transform
    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Create from position only
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Set rotation (builder pattern)
    #[inline]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Transform a point from local to world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Transform a direction (ignores position)
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Local +X in world space
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y in world space
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate this transform around `pivot` by `rotation`, moving the position
    /// along the arc and turning the orientation by the same amount.
    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        self.position = pivot + rotation * (self.position - pivot);
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Copy of this transform rotated around `pivot`
    pub fn rotated_around(&self, pivot: Vec3, rotation: Quat) -> Self {
        let mut scratch = *self;
        scratch.rotate_around(pivot, rotation);
        scratch
    }

    /// Interpolate between two transforms (linear position, spherical rotation)
    pub fn lerp(&self, other: &Transform, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
        }
    }

    /// Translate in world space
    pub fn translate_world(&mut self, offset: Vec3) {
        self.position += offset;
    }
}
