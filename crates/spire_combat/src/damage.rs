//! Damage types, allegiance filtering and damage information

use crate::health::AliveState;
use serde::{Deserialize, Serialize};
use spire_core::EntityId;

/// Which side a character or projectile fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allegiance {
    Friendly,
    Neutral,
    Enemy,
}

impl Allegiance {
    /// Whether damage from `source` applies to a target of allegiance `target`.
    ///
    /// Damage applies across differing allegiances, and always applies when
    /// either side is Neutral. Same non-neutral allegiance never damages.
    pub fn can_damage(source: Allegiance, target: Allegiance) -> bool {
        source != target || source == Allegiance::Neutral || target == Allegiance::Neutral
    }
}

impl Default for Allegiance {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Cause of damage, which also selects the death variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Fall,
    Melee,
    Projectile,
    /// Projectile damage that landed on a head hitbox
    ProjectileHead,
    Explosion,
    Fire,
    Acid,
}

impl DamageType {
    /// Terminal alive state for a death caused by this damage type
    pub fn death_state(self) -> AliveState {
        match self {
            Self::Fall => AliveState::DeadFall,
            Self::Melee => AliveState::DeadMelee,
            Self::Projectile => AliveState::DeadShot,
            Self::ProjectileHead => AliveState::DeadHeadShot,
            Self::Explosion => AliveState::DeadGibs,
            Self::Fire => AliveState::DeadBurnt,
            Self::Acid => AliveState::DeadAcid,
        }
    }
}

impl Default for DamageType {
    fn default() -> Self {
        Self::Projectile
    }
}

/// Information about a damage instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInfo {
    /// Base damage amount
    pub amount: f32,
    /// Type of damage
    pub damage_type: DamageType,
    /// Allegiance of whoever dealt the damage
    pub allegiance: Allegiance,
    /// Entity that caused the damage (if any)
    pub source: Option<EntityId>,
}

impl DamageInfo {
    /// Create new damage info from a neutral, anonymous source
    pub fn new(amount: f32, damage_type: DamageType) -> Self {
        Self {
            amount,
            damage_type,
            allegiance: Allegiance::Neutral,
            source: None,
        }
    }

    /// Set the source allegiance
    pub fn with_allegiance(mut self, allegiance: Allegiance) -> Self {
        self.allegiance = allegiance;
        self
    }

    /// Set the source entity
    pub fn with_source(mut self, entity: EntityId) -> Self {
        self.source = Some(entity);
        self
    }
}
