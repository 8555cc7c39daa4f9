//! Physics queries (raycasting)

use crate::error::{PhysicsError, Result};
use crate::layers::{CollisionLayer, LayerMask};
use spire_core::EntityId;
use spire_math::{ray_aabb, Aabb, Vec3};
use std::collections::BTreeMap;

/// Result of a raycast query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Hit point in world space
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Distance from ray origin
    pub distance: f32,
    /// Layer of the collider that was hit
    pub layer: CollisionLayer,
    /// Entity owning the collider, `None` for level geometry
    pub entity: Option<EntityId>,
}

/// Raycast service consumed by characters and NPCs
pub trait PhysicsQuery {
    /// Cast a ray and return the nearest hit on a layer in `mask`
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RaycastHit>;

    /// Whether anything on `mask` lies between two points
    fn blocked(&self, from: Vec3, to: Vec3, mask: LayerMask) -> bool {
        let delta = to - from;
        let distance = delta.length();
        if distance <= f32::EPSILON {
            return false;
        }
        self.raycast(from, delta / distance, distance, mask).is_some()
    }
}

/// A box collider on a single layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub bounds: Aabb,
    pub layer: CollisionLayer,
    pub entity: Option<EntityId>,
}

/// Query world made of axis-aligned boxes.
///
/// Static boxes are level geometry. Body boxes belong to entities and are
/// moved every tick with [`BoxWorld::set_body`].
#[derive(Debug, Default)]
pub struct BoxWorld {
    statics: Vec<BoxCollider>,
    bodies: BTreeMap<EntityId, BoxCollider>,
}

impl BoxWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add level geometry, returning its index
    pub fn add_static(&mut self, bounds: Aabb, layer: CollisionLayer) -> usize {
        self.statics.push(BoxCollider { bounds, layer, entity: None });
        self.statics.len() - 1
    }

    /// Level geometry
    pub fn statics(&self) -> &[BoxCollider] {
        &self.statics
    }

    /// Insert or move an entity's body box
    pub fn set_body(&mut self, entity: EntityId, bounds: Aabb, layer: CollisionLayer) {
        self.bodies.insert(entity, BoxCollider { bounds, layer, entity: Some(entity) });
    }

    /// Remove an entity's body box
    pub fn remove_body(&mut self, entity: EntityId) -> Result<BoxCollider> {
        self.bodies.remove(&entity).ok_or(PhysicsError::BodyNotFound(entity))
    }

    /// Get an entity's body box
    pub fn body(&self, entity: EntityId) -> Option<&BoxCollider> {
        self.bodies.get(&entity)
    }

    /// Entities whose body box overlaps `bounds`, in id order
    pub fn overlapping_bodies(&self, bounds: &Aabb, mask: LayerMask) -> Vec<EntityId> {
        self.bodies
            .iter()
            .filter(|(_, c)| mask.contains(c.layer) && c.bounds.intersects(bounds))
            .map(|(id, _)| *id)
            .collect()
    }
}

impl PhysicsQuery for BoxWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        self.statics
            .iter()
            .chain(self.bodies.values())
            .filter(|c| mask.contains(c.layer))
            .filter_map(|c| {
                ray_aabb(origin, direction, &c.bounds, max_distance).map(|(distance, normal)| RaycastHit {
                    point: origin + direction * distance,
                    normal,
                    distance,
                    layer: c.layer,
                    entity: c.entity,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Three-point ground probe.
///
/// Casts straight down from `pivot`, `pivot - side` and `pivot + side`; the
/// character is grounded if any of the three rays hits within `distance`.
/// Returns the closest of the hits.
pub fn ground_probe<Q: PhysicsQuery + ?Sized>(
    query: &Q,
    pivot: Vec3,
    side: Vec3,
    distance: f32,
    mask: LayerMask,
) -> Option<RaycastHit> {
    [pivot - side, pivot, pivot + side]
        .iter()
        .filter_map(|origin| query.raycast(*origin, Vec3::NEG_Y, distance, mask))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn floor_world() -> BoxWorld {
        let mut world = BoxWorld::new();
        world.add_static(
            Aabb::new(Vec3::new(-10.0, -1.0, -1.0), Vec3::new(10.0, 0.0, 1.0)),
            CollisionLayer::GROUND,
        );
        world.add_static(
            Aabb::new(Vec3::new(5.0, 0.0, -1.0), Vec3::new(6.0, 4.0, 1.0)),
            CollisionLayer::WALL,
        );
        world
    }

    #[test]
    fn test_raycast_returns_nearest() {
        let world = floor_world();
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 20.0, LayerMask::ALL)
            .expect("should hit wall");
        assert_eq!(hit.layer, CollisionLayer::WALL);
        assert_abs_diff_eq!(hit.distance, 5.0, epsilon = 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_X);
    }

    #[test]
    fn test_raycast_respects_mask() {
        let world = floor_world();
        let mask = CollisionLayer::GROUND.as_mask();
        assert!(world.raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 20.0, mask).is_none());
    }

    #[test]
    fn test_body_hits_report_entity() {
        let mut world = floor_world();
        let id = EntityId::new(7, 0);
        world.set_body(
            id,
            Aabb::from_center_half_extents(Vec3::new(2.0, 1.0, 0.0), Vec3::splat(0.5)),
            CollisionLayer::PLAYER,
        );
        let hit = world
            .raycast(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 20.0, LayerMask::ALL)
            .expect("should hit body");
        assert_eq!(hit.entity, Some(id));
        assert!(world.remove_body(id).is_ok());
        assert_eq!(world.remove_body(id), Err(PhysicsError::BodyNotFound(id)));
    }

    #[test]
    fn test_ground_probe_any_of_three() {
        let world = floor_world();
        let side = Vec3::new(0.3, 0.0, 0.0);
        // Pivot hangs past the floor edge but the inner sample still lands
        assert!(ground_probe(&world, Vec3::new(10.2, 0.3, 0.0), side, 0.5, LayerMask::SOLID).is_some());
        assert!(ground_probe(&world, Vec3::new(10.5, 0.3, 0.0), side, 0.5, LayerMask::SOLID).is_none());
        assert!(ground_probe(&world, Vec3::new(0.0, 3.0, 0.0), side, 0.5, LayerMask::SOLID).is_none());
    }

    #[test]
    fn test_blocked_between_points() {
        let world = floor_world();
        assert!(world.blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(8.0, 1.0, 0.0), LayerMask::SOLID));
        assert!(!world.blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 0.0), LayerMask::SOLID));
    }
}
