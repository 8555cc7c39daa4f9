//! Hitboxes owned by characters

use crate::damage::{Allegiance, DamageInfo, DamageType};
use serde::{Deserialize, Serialize};
use spire_core::EntityId;
use spire_math::{Aabb, Transform, Vec3};

/// Body part a hitbox covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    Body,
    Head,
}

/// Damage that got through a hitbox, ready to apply to its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHit {
    pub owner: EntityId,
    pub amount: f32,
    pub damage_type: DamageType,
}

/// A damageable region of a character.
///
/// `owner` is a back-reference only; the character owns the hitbox.
#[derive(Debug, Clone, PartialEq)]
pub struct HitBox {
    pub owner: EntityId,
    pub allegiance: Allegiance,
    pub part: BodyPart,
    pub multiplier: f32,
    pub enabled: bool,
    /// Center relative to the owner's transform
    pub offset: Vec3,
    pub half_extents: Vec3,
}

impl HitBox {
    /// Create an enabled body hitbox with a unit multiplier
    pub fn new(owner: EntityId, allegiance: Allegiance, part: BodyPart) -> Self {
        Self {
            owner,
            allegiance,
            part,
            multiplier: 1.0,
            enabled: true,
            offset: Vec3::ZERO,
            half_extents: Vec3::new(0.4, 0.9, 0.4),
        }
    }

    /// Set damage multiplier
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set local shape
    pub fn with_shape(mut self, offset: Vec3, half_extents: Vec3) -> Self {
        self.offset = offset;
        self.half_extents = half_extents;
        self
    }

    /// World-space bounds for the owner's transform
    pub fn bounds(&self, owner: &Transform) -> Aabb {
        let center = owner.transform_point(self.offset);
        Aabb::from_center_half_extents(center, self.half_extents).rotated_around(center, owner.rotation)
    }

    /// Filter and scale incoming damage.
    ///
    /// Returns `None` when the hitbox is disabled or allegiance filtering
    /// blocks the hit. Projectile damage on a head box becomes
    /// [`DamageType::ProjectileHead`].
    pub fn resolve(&self, damage: &DamageInfo) -> Option<ResolvedHit> {
        if !self.enabled {
            return None;
        }
        if !Allegiance::can_damage(damage.allegiance, self.allegiance) {
            return None;
        }

        let damage_type = match (self.part, damage.damage_type) {
            (BodyPart::Head, DamageType::Projectile) => DamageType::ProjectileHead,
            (_, other) => other,
        };

        Some(ResolvedHit {
            owner: self.owner,
            amount: damage.amount * self.multiplier,
            damage_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_head() -> HitBox {
        HitBox::new(EntityId::new(2, 0), Allegiance::Enemy, BodyPart::Head).with_multiplier(2.0)
    }

    #[test]
    fn test_disabled_never_hits() {
        let mut hitbox = enemy_head();
        hitbox.enabled = false;
        for allegiance in [Allegiance::Friendly, Allegiance::Neutral, Allegiance::Enemy] {
            let damage = DamageInfo::new(10.0, DamageType::Projectile).with_allegiance(allegiance);
            assert!(hitbox.resolve(&damage).is_none());
        }
    }

    #[test]
    fn test_headshot_upgrade_and_multiplier() {
        let damage = DamageInfo::new(10.0, DamageType::Projectile).with_allegiance(Allegiance::Friendly);
        let hit = enemy_head().resolve(&damage).expect("friendly vs enemy should hit");
        assert_eq!(hit.damage_type, DamageType::ProjectileHead);
        assert_eq!(hit.amount, 20.0);
        assert_eq!(hit.owner, EntityId::new(2, 0));
    }

    #[test]
    fn test_friendly_fire_blocked() {
        let damage = DamageInfo::new(10.0, DamageType::Explosion).with_allegiance(Allegiance::Enemy);
        assert!(enemy_head().resolve(&damage).is_none());
    }

    #[test]
    fn test_body_keeps_damage_type() {
        let body = HitBox::new(EntityId::new(1, 0), Allegiance::Neutral, BodyPart::Body);
        let damage = DamageInfo::new(5.0, DamageType::Projectile).with_allegiance(Allegiance::Neutral);
        let hit = body.resolve(&damage).expect("neutral always takes damage");
        assert_eq!(hit.damage_type, DamageType::Projectile);
    }

    #[test]
    fn test_bounds_follow_owner() {
        let body = HitBox::new(EntityId::new(1, 0), Allegiance::Neutral, BodyPart::Body)
            .with_shape(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 0.5));
        let bounds = body.bounds(&Transform::from_position(Vec3::new(3.0, 0.0, 0.0)));
        assert!(bounds.contains_point(Vec3::new(3.0, 1.5, 0.0)));
        assert!(!bounds.contains_point(Vec3::new(0.0, 1.0, 0.0)));
    }
}
