//! Spire Combat - health, hitboxes, weapons and projectiles
//!
//! # Features
//!
//! - Allegiance filtering with the Neutral-always-takes-damage rule
//! - One-way alive states chosen by damage cause
//! - Hitboxes with per-part multipliers and headshot upgrade
//! - Fall landings classified into soft, slide and fatal
//! - Weapons with a rate gate, magazine and reload timer
//! - Projectiles with falloff, repeat damage timers and sub-projectiles
//!
//! # Example
//!
//! ```ignore
//! use spire_combat::prelude::*;
//!
//! let mut health = HealthComponent::new(100.0).with_wounded_threshold(0.33);
//! health.apply_damage(70.0, DamageType::Projectile);
//! assert_eq!(health.state(), AliveState::Wounded);
//! ```

pub mod damage;
pub mod error;
pub mod fall;
pub mod health;
pub mod hitbox;
pub mod projectile;
pub mod spawner;
pub mod validate;
pub mod weapon;

pub mod prelude {
    pub use crate::damage::{Allegiance, DamageInfo, DamageType};
    pub use crate::error::{CombatError, Result};
    pub use crate::fall::{FallDamageConfig, Landing};
    pub use crate::health::{AliveState, HealthComponent, HealthEvent};
    pub use crate::hitbox::{BodyPart, HitBox, ResolvedHit};
    pub use crate::projectile::{
        DamageReceiver, Falloff, HitTarget, Projectile, ProjectileConfig, SubProjectile,
        SubProjectileTrigger, UNBOUNDED_REPEATS,
    };
    pub use crate::spawner::{InstanceHandle, PrefabHandle, SpawnKind, SpawnQueue, SpawnRequest, Spawner};
    pub use crate::weapon::{WeaponComponent, WeaponStats};
}

pub use prelude::*;
