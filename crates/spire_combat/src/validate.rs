//! Setup-time checks for combat tuning

use crate::error::{CombatError, Result};
use crate::health::HealthComponent;
use crate::projectile::ProjectileConfig;
use crate::weapon::WeaponStats;

impl WeaponStats {
    /// Check the stats can drive the rate and reload timers
    pub fn validate(&self) -> Result<()> {
        if !(self.shots_per_second > 0.0) {
            return Err(CombatError::InvalidWeapon(format!(
                "shots_per_second must be positive, got {}",
                self.shots_per_second
            )));
        }
        if self.magazine_size == 0 {
            return Err(CombatError::InvalidWeapon("magazine_size must be at least 1".into()));
        }
        if self.reload_time < 0.0 {
            return Err(CombatError::InvalidWeapon(format!(
                "reload_time must not be negative, got {}",
                self.reload_time
            )));
        }
        self.projectile.validate()
    }
}

impl ProjectileConfig {
    /// Check lifetime and damage range
    pub fn validate(&self) -> Result<()> {
        if !(self.lifetime > 0.0) {
            return Err(CombatError::InvalidProjectile(format!(
                "lifetime must be positive, got {}",
                self.lifetime
            )));
        }
        if self.damage_high < self.damage_low {
            return Err(CombatError::InvalidProjectile(format!(
                "damage range is inverted ({} > {})",
                self.damage_low, self.damage_high
            )));
        }
        if let Some(sub) = &self.sub_projectile {
            sub.config.validate()?;
        }
        Ok(())
    }
}

impl HealthComponent {
    /// Check starting health and wounded threshold
    pub fn validate(&self) -> Result<()> {
        if !(self.max > 0.0) {
            return Err(CombatError::InvalidHealth(format!(
                "starting health must be positive, got {}",
                self.max
            )));
        }
        if !(0.0..=1.0).contains(&self.wounded_threshold) {
            return Err(CombatError::InvalidHealth(format!(
                "wounded threshold must be within [0, 1], got {}",
                self.wounded_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(WeaponStats::default().validate().is_ok());
        assert!(HealthComponent::default().validate().is_ok());
    }

    #[test]
    fn test_zero_rate_rejected() {
        let stats = WeaponStats::default().with_fire_rate(0.0);
        assert!(matches!(stats.validate(), Err(CombatError::InvalidWeapon(_))));
    }

    #[test]
    fn test_nested_sub_projectile_checked() {
        let bad = ProjectileConfig::default().with_lifetime(0.0);
        let config = ProjectileConfig::default()
            .with_sub_projectile(crate::projectile::SubProjectileTrigger::OnDestroy, bad);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_threshold_rejected() {
        let health = HealthComponent::new(100.0).with_wounded_threshold(1.5);
        assert!(health.validate().is_err());
    }
}
