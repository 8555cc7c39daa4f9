//! Collision layers and query masks

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Walkable floor
    pub const GROUND: Self = Self(0);
    /// Solid wall that blocks movement and sight
    pub const WALL: Self = Self(1);
    /// Cover volume
    pub const COVER: Self = Self(2);
    /// Player character
    pub const PLAYER: Self = Self(3);
    /// Enemy characters
    pub const ENEMY: Self = Self(4);
    /// Projectiles
    pub const PROJECTILE: Self = Self(5);
    /// Trigger/sensor zones
    pub const TRIGGER: Self = Self(6);

    /// Create a custom layer
    pub const fn custom(id: u32) -> Self {
        Self(id)
    }

    /// Get the layer as a single-bit mask
    pub const fn as_mask(&self) -> LayerMask {
        LayerMask(1 << self.0)
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::GROUND
    }
}

/// Set of layers a query is allowed to hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Hits everything
    pub const ALL: Self = Self(u32::MAX);
    /// Hits nothing
    pub const NONE: Self = Self(0);
    /// Floor and walls, what ground probes and reachability checks stop on
    pub const SOLID: Self = Self(CollisionLayer::GROUND.as_mask().0 | CollisionLayer::WALL.as_mask().0);

    /// Build a mask from a list of layers
    pub fn from_layers(layers: &[CollisionLayer]) -> Self {
        layers.iter().fold(Self::NONE, |acc, l| acc | *l)
    }

    /// Check whether a layer is part of the mask
    #[inline]
    pub fn contains(&self, layer: CollisionLayer) -> bool {
        self.0 & layer.as_mask().0 != 0
    }

    /// Add a layer
    pub fn with(mut self, layer: CollisionLayer) -> Self {
        self.0 |= layer.as_mask().0;
        self
    }

    /// Remove a layer
    pub fn without(mut self, layer: CollisionLayer) -> Self {
        self.0 &= !layer.as_mask().0;
        self
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<CollisionLayer> for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: CollisionLayer) -> Self {
        self.with(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_membership() {
        let mask = LayerMask::from_layers(&[CollisionLayer::WALL, CollisionLayer::PLAYER]);
        assert!(mask.contains(CollisionLayer::WALL));
        assert!(mask.contains(CollisionLayer::PLAYER));
        assert!(!mask.contains(CollisionLayer::ENEMY));
        assert!(!mask.without(CollisionLayer::WALL).contains(CollisionLayer::WALL));
    }

    #[test]
    fn test_solid_mask() {
        assert!(LayerMask::SOLID.contains(CollisionLayer::GROUND));
        assert!(LayerMask::SOLID.contains(CollisionLayer::WALL));
        assert!(!LayerMask::SOLID.contains(CollisionLayer::COVER));
        assert_eq!(LayerMask::NONE | CollisionLayer::GROUND, CollisionLayer::GROUND.as_mask());
    }
}
