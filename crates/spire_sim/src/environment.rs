//! Level geometry and trigger volumes that turn with the tower

use spire_core::EntityId;
use spire_math::{Aabb, Quat, Transform, Vec3};
use spire_physics::{CollisionLayer, ZoneKind};

/// What an environment object contributes to the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvironmentShape {
    /// Collision box on a layer
    Solid(CollisionLayer),
    /// Trigger volume
    Zone(ZoneKind),
}

/// A box placed in the level.
///
/// The box is kept in local space around its transform so repeated partial
/// rotations do not grow it; [`bounds`](Self::bounds) is recomputed from the
/// current transform each time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentObject {
    pub id: EntityId,
    pub shape: EnvironmentShape,
    local: Aabb,
    transform: Transform,
}

impl EnvironmentObject {
    /// Place an object covering `bounds`
    pub fn new(id: EntityId, shape: EnvironmentShape, bounds: Aabb) -> Self {
        Self {
            id,
            shape,
            local: Aabb::from_center_half_extents(Vec3::ZERO, bounds.half_extents()),
            transform: Transform::from_position(bounds.center()),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World-space box enclosing the object
    pub fn bounds(&self) -> Aabb {
        self.local
            .rotated_around(Vec3::ZERO, self.transform.rotation)
            .translate(self.transform.position)
    }

    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        self.transform.rotate_around(pivot, rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use spire_math::consts::FRAC_PI_2;

    fn wall() -> EnvironmentObject {
        EnvironmentObject::new(
            EntityId::new(1, 0),
            EnvironmentShape::Solid(CollisionLayer::WALL),
            Aabb::new(Vec3::new(4.0, 0.0, -1.0), Vec3::new(5.0, 3.0, 1.0)),
        )
    }

    #[test]
    fn test_bounds_start_where_placed() {
        let object = wall();
        let bounds = object.bounds();
        assert_abs_diff_eq!(bounds.min.x, 4.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.max.y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_small_steps_do_not_grow_the_box() {
        let mut object = wall();
        let step = Quat::from_rotation_y(FRAC_PI_2 / 10.0);
        for _ in 0..10 {
            object.rotate_around(Vec3::ZERO, step);
        }

        // A quarter turn maps x onto -z
        let bounds = object.bounds();
        let half = bounds.half_extents();
        assert_abs_diff_eq!(half.x, 1.0, epsilon = 1e-3);
        assert_abs_diff_eq!(half.z, 0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(bounds.center().z, -4.5, epsilon = 1e-3);
    }
}
