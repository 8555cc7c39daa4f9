//! # spire_math - Spire Math
//!
//! Small, dependency-light math for a 2.5D playfield:
//! - `Vec3` positions and velocities (the planar variant simply keeps `z == 0`)
//! - `Quat` rotations and `Transform` (position + rotation)
//! - `Aabb` boxes with a slab ray test
//! - `MovementLine`, the closed patrol/movement polyline service

pub mod vector;
pub mod quaternion;
pub mod transform;
pub mod bounds;
pub mod line;

pub use vector::*;
pub use quaternion::*;
pub use transform::*;
pub use bounds::*;
pub use line::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move `current` toward `target` by at most `max_delta`
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

pub mod prelude {
    pub use crate::vector::Vec3;
    pub use crate::quaternion::Quat;
    pub use crate::transform::Transform;
    pub use crate::bounds::{Aabb, ray_aabb};
    pub use crate::line::{LineError, MovementLine};
    pub use crate::{radians, degrees, lerp, move_towards};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(0.0, -10.0, 4.0), -4.0);
    }

    #[test]
    fn test_angle_conversion() {
        assert!((radians(180.0) - consts::PI).abs() < 1e-6);
        assert!((degrees(consts::FRAC_PI_2) - 90.0).abs() < 1e-4);
    }
}
