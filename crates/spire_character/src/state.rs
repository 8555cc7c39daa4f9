//! Movement states and the horizontal axis model

use serde::{Deserialize, Serialize};
use spire_math::{Transform, Vec3};

/// Locomotion or lock mode of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementState {
    /// Free locomotion on the ground
    Walk,
    /// Boosted dash decelerated by friction
    Slide,
    /// Hidden behind a cover volume
    Cover,
    /// Airborne
    Jump,
    /// Terminal
    Dead,
    /// Stunned
    Immobile,
    /// Fading between two teleporter pads
    Teleporting,
    /// Driven by a tower rotation session
    Rotating,
}

impl MovementState {
    /// States that ignore movement input
    #[inline]
    pub fn is_locked(self) -> bool {
        matches!(
            self,
            Self::Cover | Self::Dead | Self::Immobile | Self::Teleporting | Self::Rotating
        )
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::Walk
    }
}

/// How the horizontal movement axis is derived.
///
/// The flat variant moves along world X. The ring variant moves along the
/// character's own local X, which turns with the character when the tower
/// rotates the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisModel {
    Planar,
    Ring,
}

impl AxisModel {
    /// Unit horizontal axis for a character at `transform`
    pub fn horizontal_axis(self, transform: &Transform) -> Vec3 {
        match self {
            Self::Planar => Vec3::X,
            Self::Ring => {
                let axis = transform.right().with_y(0.0).normalize_or_zero();
                if axis == Vec3::ZERO {
                    Vec3::X
                } else {
                    axis
                }
            }
        }
    }
}

impl Default for AxisModel {
    fn default() -> Self {
        Self::Ring
    }
}
