//! Axis-aligned boxes and the slab ray test

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if a point is inside (inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check overlap with another box
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x
            && self.min.y <= other.max.y && self.max.y >= other.min.y
            && self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Copy moved by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Axis-aligned box enclosing this box after rotating it around `pivot`
    pub fn rotated_around(&self, pivot: Vec3, rotation: Quat) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let moved = pivot + rotation * (corner - pivot);
            min = min.min(moved);
            max = max.max(moved);
        }
        Self::new(min, max)
    }
}

/// Ray vs box using the slab method.
///
/// `direction` must be normalized. Returns the distance to the entry point and
/// the face normal, or `None` if the box is missed, lies behind the origin, or
/// is farther than `max_distance`. A ray starting inside the box reports its
/// exit face.
pub fn ray_aabb(origin: Vec3, direction: Vec3, aabb: &Aabb, max_distance: f32) -> Option<(f32, Vec3)> {
    let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);

    let t1 = (aabb.min.x - origin.x) * inv.x;
    let t2 = (aabb.max.x - origin.x) * inv.x;
    let t3 = (aabb.min.y - origin.y) * inv.y;
    let t4 = (aabb.max.y - origin.y) * inv.y;
    let t5 = (aabb.min.z - origin.z) * inv.z;
    let t6 = (aabb.max.z - origin.z) * inv.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    let t = if tmin < 0.0 { tmax } else { tmin };
    if t > max_distance {
        return None;
    }

    let point = origin + direction * t;
    let epsilon = 1e-4;
    let normal = if (point.x - aabb.min.x).abs() < epsilon {
        Vec3::NEG_X
    } else if (point.x - aabb.max.x).abs() < epsilon {
        Vec3::X
    } else if (point.y - aabb.min.y).abs() < epsilon {
        Vec3::NEG_Y
    } else if (point.y - aabb.max.y).abs() < epsilon {
        Vec3::Y
    } else if (point.z - aabb.min.z).abs() < epsilon {
        Vec3::NEG_Z
    } else {
        Vec3::Z
    };

    Some((t, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_ray_hits_top_face() {
        let hit = ray_aabb(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, &unit_box(), 10.0);
        let (t, normal) = hit.expect("should hit");
        assert_abs_diff_eq!(t, 4.0, epsilon = 1e-5);
        assert_eq!(normal, Vec3::Y);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        assert!(ray_aabb(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, &unit_box(), 3.0).is_none());
    }

    #[test]
    fn test_ray_behind_origin_misses() {
        assert!(ray_aabb(Vec3::new(0.0, 5.0, 0.0), Vec3::Y, &unit_box(), 100.0).is_none());
    }

    #[test]
    fn test_contains_and_intersects() {
        let a = unit_box();
        assert!(a.contains_point(Vec3::ZERO));
        assert!(!a.contains_point(Vec3::new(2.0, 0.0, 0.0)));
        let b = a.translate(Vec3::new(1.5, 0.0, 0.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&a.translate(Vec3::new(3.0, 0.0, 0.0))));
    }

    #[test]
    fn test_rotated_around_swaps_extents() {
        let a = Aabb::new(Vec3::new(1.0, 0.0, -0.5), Vec3::new(3.0, 1.0, 0.5));
        let r = a.rotated_around(Vec3::ZERO, Quat::from_rotation_y(core::f32::consts::FRAC_PI_2));
        assert_abs_diff_eq!(r.min.x, -0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(r.max.x, 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(r.min.z, -3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(r.max.z, -1.0, epsilon = 1e-5);
    }
}
