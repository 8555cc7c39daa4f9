//! Character setup with fail-safe validation

use crate::character::Character;
use crate::config::CharacterConfig;
use crate::state::AxisModel;
use spire_combat::{Allegiance, BodyPart, CombatError, HealthComponent, HitBox, WeaponComponent, WeaponStats};
use spire_core::EntityId;
use spire_math::{Transform, Vec3};
use thiserror::Error;

/// Character setup errors
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("character {0} has no hitboxes")]
    NoHitBoxes(EntityId),

    #[error("invalid character config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Combat(#[from] CombatError),
}

/// Builds a [`Character`] with its hitboxes and weapon
pub struct CharacterBuilder {
    id: EntityId,
    transform: Transform,
    allegiance: Allegiance,
    config: CharacterConfig,
    axis_model: AxisModel,
    hitboxes: Vec<(BodyPart, f32, Vec3, Vec3)>,
    weapon: Option<WeaponStats>,
}

impl CharacterBuilder {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            transform: Transform::IDENTITY,
            allegiance: Allegiance::Neutral,
            config: CharacterConfig::default(),
            axis_model: AxisModel::default(),
            hitboxes: Vec::new(),
            weapon: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_allegiance(mut self, allegiance: Allegiance) -> Self {
        self.allegiance = allegiance;
        self
    }

    pub fn with_config(mut self, config: CharacterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_axis_model(mut self, axis_model: AxisModel) -> Self {
        self.axis_model = axis_model;
        self
    }

    /// Add a hitbox, positioned relative to the feet
    pub fn with_hitbox(mut self, part: BodyPart, multiplier: f32, offset: Vec3, half_extents: Vec3) -> Self {
        self.hitboxes.push((part, multiplier, offset, half_extents));
        self
    }

    /// Body box plus a head box taking double damage
    pub fn with_default_hitboxes(self) -> Self {
        self.with_hitbox(BodyPart::Body, 1.0, Vec3::new(0.0, 0.7, 0.0), Vec3::new(0.4, 0.7, 0.4))
            .with_hitbox(BodyPart::Head, 2.0, Vec3::new(0.0, 1.65, 0.0), Vec3::new(0.25, 0.25, 0.25))
    }

    pub fn with_weapon(mut self, stats: WeaponStats) -> Self {
        self.weapon = Some(stats);
        self
    }

    /// Validate and build
    pub fn try_build(self) -> Result<Character, SetupError> {
        self.validate()?;
        Ok(self.assemble())
    }

    /// Build, disabling the character if setup is invalid.
    ///
    /// A misconfigured character still exists in the world but ignores
    /// every tick.
    pub fn build(self) -> Character {
        match self.validate() {
            Ok(()) => self.assemble(),
            Err(err) => {
                log::error!("Disabling character {}: {}", self.id, err);
                let mut character = self.assemble();
                character.set_enabled(false);
                character
            }
        }
    }

    fn validate(&self) -> Result<(), SetupError> {
        let c = &self.config;
        HealthComponent::new(c.max_health)
            .with_wounded_threshold(c.wounded_threshold)
            .validate()?;
        if c.walk_speed < 0.0 || c.slide_speed < 0.0 || c.slide_friction < 0.0 {
            return Err(SetupError::InvalidConfig("speeds must not be negative".into()));
        }
        if c.probe_height <= 0.0 {
            return Err(SetupError::InvalidConfig("probe_height must be positive".into()));
        }
        if let Some(stats) = &self.weapon {
            stats.validate()?;
        }
        if self.hitboxes.is_empty() {
            return Err(SetupError::NoHitBoxes(self.id));
        }
        Ok(())
    }

    fn assemble(self) -> Character {
        let mut character = Character::new(self.id, self.transform, self.allegiance, self.config);
        character.set_axis_model(self.axis_model);
        for (part, multiplier, offset, half_extents) in self.hitboxes {
            character.push_hitbox(
                HitBox::new(self.id, self.allegiance, part)
                    .with_multiplier(multiplier)
                    .with_shape(offset, half_extents),
            );
        }
        if let Some(stats) = self.weapon {
            character.set_weapon(WeaponComponent::new(stats, self.allegiance).with_owner(self.id));
        }
        character
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_wires_owner_and_allegiance() {
        let id = EntityId::new(7, 0);
        let c = CharacterBuilder::new(id)
            .with_allegiance(Allegiance::Enemy)
            .with_default_hitboxes()
            .with_weapon(WeaponStats::default())
            .try_build()
            .unwrap();
        assert_eq!(c.hitboxes().len(), 2);
        assert!(c.hitboxes().iter().all(|h| h.owner == id && h.allegiance == Allegiance::Enemy));
        assert_eq!(c.weapon().unwrap().allegiance(), Allegiance::Enemy);
        assert!(c.is_enabled());
    }

    #[test]
    fn test_invalid_setup_disables() {
        let config = CharacterConfig::default().with_health(0.0, 0.33);
        let builder = || CharacterBuilder::new(EntityId::new(3, 0)).with_config(config.clone());
        assert!(matches!(builder().try_build(), Err(SetupError::Combat(_))));

        let negative = CharacterConfig::default().with_walk_speed(-1.0);
        let result = CharacterBuilder::new(EntityId::new(3, 0)).with_config(negative).try_build();
        assert!(matches!(result, Err(SetupError::InvalidConfig(_))));

        let c = builder().build();
        assert!(!c.is_enabled());

        let bare = CharacterBuilder::new(EntityId::new(5, 0)).try_build();
        assert!(matches!(bare, Err(SetupError::NoHitBoxes(_))));
    }

    #[test]
    fn test_invalid_weapon_is_a_setup_error() {
        let stats = WeaponStats::default().with_magazine(0, 1.0);
        let result = CharacterBuilder::new(EntityId::new(4, 0)).with_weapon(stats).try_build();
        assert!(matches!(result, Err(SetupError::Combat(_))));
    }
}
