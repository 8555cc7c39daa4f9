//! Health component and alive-state classification

use crate::damage::DamageType;
use serde::{Deserialize, Serialize};

/// Coarse, one-way health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliveState {
    Alive,
    Wounded,
    DeadFall,
    DeadMelee,
    DeadShot,
    DeadGibs,
    DeadBurnt,
    DeadAcid,
    DeadHeadShot,
}

impl AliveState {
    /// Alive or Wounded
    #[inline]
    pub fn is_alive(self) -> bool {
        matches!(self, Self::Alive | Self::Wounded)
    }

    /// Any terminal `Dead*` state
    #[inline]
    pub fn is_dead(self) -> bool {
        !self.is_alive()
    }
}

impl Default for AliveState {
    fn default() -> Self {
        Self::Alive
    }
}

/// Outcome of a damage or heal call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthEvent {
    /// Call had no effect (already dead)
    Ignored,
    /// Health dropped, state unchanged
    Damaged { amount: f32, health: f32 },
    /// Health dropped below the wounded threshold
    Wounded { amount: f32, health: f32 },
    /// Health crossed zero
    Died { cause: DamageType, state: AliveState },
    /// Health restored
    Healed { amount: f32, health: f32 },
    /// Healing lifted the character out of Wounded
    Recovered { amount: f32, health: f32 },
}

/// Health and alive state of a character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthComponent {
    /// Current health; may go negative on the killing blow
    pub current: f32,
    /// Starting health
    pub max: f32,
    /// Fraction of `max` below which the character counts as Wounded
    pub wounded_threshold: f32,
    /// Current classification
    #[serde(skip)]
    state: AliveState,
}

impl HealthComponent {
    /// Create a new health component
    pub fn new(max_health: f32) -> Self {
        Self {
            current: max_health,
            max: max_health,
            wounded_threshold: 0.33,
            state: AliveState::Alive,
        }
    }

    /// Set wounded threshold as a fraction of starting health
    pub fn with_wounded_threshold(mut self, fraction: f32) -> Self {
        self.wounded_threshold = fraction;
        self
    }

    /// Current alive state
    #[inline]
    pub fn state(&self) -> AliveState {
        self.state
    }

    /// Check if alive (Alive or Wounded)
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    /// Check if dead
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    /// Get health as a fraction of starting health
    pub fn health_percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Apply damage. No-op once dead; negative amounts are treated as zero.
    pub fn apply_damage(&mut self, amount: f32, damage_type: DamageType) -> HealthEvent {
        if self.is_dead() {
            return HealthEvent::Ignored;
        }

        let amount = amount.max(0.0);
        self.current -= amount;

        if self.current <= 0.0 {
            self.state = damage_type.death_state();
            return HealthEvent::Died {
                cause: damage_type,
                state: self.state,
            };
        }

        if self.state == AliveState::Alive && self.health_percent() < self.wounded_threshold {
            self.state = AliveState::Wounded;
            return HealthEvent::Wounded {
                amount,
                health: self.current,
            };
        }

        HealthEvent::Damaged {
            amount,
            health: self.current,
        }
    }

    /// Kill outright with the given cause. No-op once dead.
    pub fn kill(&mut self, damage_type: DamageType) -> HealthEvent {
        if self.is_dead() {
            return HealthEvent::Ignored;
        }
        self.current = self.current.min(0.0);
        self.state = damage_type.death_state();
        HealthEvent::Died {
            cause: damage_type,
            state: self.state,
        }
    }

    /// Heal up to starting health. No-op once dead.
    pub fn heal(&mut self, amount: f32) -> HealthEvent {
        if self.is_dead() {
            return HealthEvent::Ignored;
        }

        let old = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        let amount = self.current - old;

        if self.state == AliveState::Wounded && self.health_percent() >= self.wounded_threshold {
            self.state = AliveState::Alive;
            return HealthEvent::Recovered {
                amount,
                health: self.current,
            };
        }

        HealthEvent::Healed {
            amount,
            health: self.current,
        }
    }
}

impl Default for HealthComponent {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wounded_then_dead() {
        let mut health = HealthComponent::new(100.0).with_wounded_threshold(0.33);

        let event = health.apply_damage(70.0, DamageType::Projectile);
        assert_eq!(event, HealthEvent::Wounded { amount: 70.0, health: 30.0 });
        assert_eq!(health.state(), AliveState::Wounded);

        let event = health.apply_damage(40.0, DamageType::Projectile);
        assert_eq!(health.current, -10.0);
        assert_eq!(
            event,
            HealthEvent::Died { cause: DamageType::Projectile, state: AliveState::DeadShot }
        );
    }

    #[test]
    fn test_terminal_state_is_idempotent() {
        let mut health = HealthComponent::new(50.0);
        health.apply_damage(60.0, DamageType::Acid);
        assert_eq!(health.state(), AliveState::DeadAcid);

        assert_eq!(health.apply_damage(10.0, DamageType::Fire), HealthEvent::Ignored);
        assert_eq!(health.heal(100.0), HealthEvent::Ignored);
        assert_eq!(health.kill(DamageType::Fall), HealthEvent::Ignored);
        assert_eq!(health.state(), AliveState::DeadAcid);
        assert_eq!(health.current, -10.0);
    }

    #[test]
    fn test_health_monotonic_under_damage() {
        let mut health = HealthComponent::new(100.0);
        let mut last = health.current;
        for _ in 0..5 {
            health.apply_damage(15.0, DamageType::Melee);
            assert!(health.current <= last);
            last = health.current;
        }
        // Negative damage does not heal
        health.apply_damage(-20.0, DamageType::Melee);
        assert_eq!(health.current, last);
    }

    #[test]
    fn test_heal_recovers_from_wounded() {
        let mut health = HealthComponent::new(100.0).with_wounded_threshold(0.5);
        health.apply_damage(60.0, DamageType::Melee);
        assert_eq!(health.state(), AliveState::Wounded);

        let event = health.heal(100.0);
        assert_eq!(event, HealthEvent::Recovered { amount: 60.0, health: 100.0 });
        assert_eq!(health.state(), AliveState::Alive);
    }

    #[test]
    fn test_kill_keeps_cause() {
        let mut health = HealthComponent::new(100.0);
        health.kill(DamageType::Fall);
        assert_eq!(health.state(), AliveState::DeadFall);
        assert!(health.is_dead());
    }
}
