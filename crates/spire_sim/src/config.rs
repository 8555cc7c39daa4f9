//! Simulation configuration
//!
//! Every section is optional in TOML; missing values fall back to their
//! defaults.
//!
//! ```toml
//! seed = 7
//! auto_turn_on_corner = true
//!
//! [physics]
//! timestep = 0.02
//!
//! [npc]
//! maintain_distance = 5.0
//!
//! [player_weapon]
//! magazine_size = 6
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use spire_ai::NpcConfig;
use spire_character::CharacterConfig;
use spire_combat::{HealthComponent, WeaponStats};
use spire_physics::PhysicsConfig;
use spire_tower::TowerConfig;
use std::path::Path;

/// Melee strike tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeConfig {
    pub damage: f32,
    /// How far in front of the character a strike lands
    pub reach: f32,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            damage: 25.0,
            reach: 1.2,
        }
    }
}

/// Top-level configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the world RNG
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub character: CharacterConfig,
    pub npc: NpcConfig,
    pub tower: TowerConfig,
    pub player_weapon: WeaponStats,
    pub npc_weapon: WeaponStats,
    pub melee: MeleeConfig,
    /// Start a turn as soon as the player steps on a corner, without
    /// waiting for the turn action
    pub auto_turn_on_corner: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            physics: PhysicsConfig::default(),
            character: CharacterConfig::default(),
            npc: NpcConfig::default(),
            tower: TowerConfig::default(),
            player_weapon: WeaponStats::default(),
            npc_weapon: WeaponStats::default().with_fire_rate(2.0),
            melee: MeleeConfig::default(),
            auto_turn_on_corner: false,
        }
    }
}

impl SimConfig {
    /// Read and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_character(mut self, character: CharacterConfig) -> Self {
        self.character = character;
        self
    }

    pub fn with_npc(mut self, npc: NpcConfig) -> Self {
        self.npc = npc;
        self
    }

    pub fn with_tower(mut self, tower: TowerConfig) -> Self {
        self.tower = tower;
        self
    }

    pub fn with_player_weapon(mut self, stats: WeaponStats) -> Self {
        self.player_weapon = stats;
        self
    }

    pub fn with_npc_weapon(mut self, stats: WeaponStats) -> Self {
        self.npc_weapon = stats;
        self
    }

    pub fn with_auto_turn(mut self, enabled: bool) -> Self {
        self.auto_turn_on_corner = enabled;
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |e: &dyn std::fmt::Display| ConfigError::Invalid(e.to_string());

        self.physics.validate().map_err(|e| invalid(&e))?;
        HealthComponent::new(self.character.max_health)
            .with_wounded_threshold(self.character.wounded_threshold)
            .validate()
            .map_err(|e| invalid(&e))?;
        self.player_weapon
            .validate()
            .map_err(|e| invalid(&format!("player weapon: {e}")))?;
        self.npc_weapon
            .validate()
            .map_err(|e| invalid(&format!("npc weapon: {e}")))?;

        if self.tower.turn_duration < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tower turn_duration must not be negative, got {}",
                self.tower.turn_duration
            )));
        }
        if !(self.melee.reach > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "melee reach must be positive, got {}",
                self.melee.reach
            )));
        }
        if !(0.0..=1.0).contains(&self.npc.fire_chance) {
            return Err(ConfigError::Invalid(format!(
                "npc fire_chance must be within [0, 1], got {}",
                self.npc.fire_chance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 42

            [physics]
            timestep = 0.02

            [player_weapon]
            magazine_size = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.physics.timestep, 0.02);
        assert_eq!(config.physics.max_substeps, PhysicsConfig::default().max_substeps);
        assert_eq!(config.player_weapon.magazine_size, 3);
        assert_eq!(config.player_weapon.reload_time, WeaponStats::default().reload_time);
        assert_eq!(config.npc, NpcConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimConfig::from_toml_str("[physics]\ntimestep = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = SimConfig::from_toml_str("[player_weapon]\nmagazine_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("player weapon"));

        let err = SimConfig::from_toml_str("[melee]\nreach = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_syntax_errors_are_parse_errors() {
        let err = SimConfig::from_toml_str("seed = = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
