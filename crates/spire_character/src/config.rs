//! Character tuning

use serde::{Deserialize, Serialize};
use spire_combat::FallDamageConfig;
use spire_physics::{CollisionLayer, LayerMask, PhysicsConfig};

/// Movement, combat and probe tuning for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Starting health
    pub max_health: f32,
    /// Fraction of starting health below which the character is Wounded
    pub wounded_threshold: f32,

    /// Top horizontal walking speed
    pub walk_speed: f32,
    /// Walking speed multiplier while Wounded
    pub wounded_speed_multiplier: f32,
    /// Horizontal acceleration on the ground
    pub ground_acceleration: f32,
    /// Horizontal acceleration in the air
    pub air_acceleration: f32,
    /// Upward speed given by a jump
    pub jump_velocity: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Fastest fall speed
    pub max_fall_speed: f32,

    /// Horizontal speed at the start of a slide
    pub slide_speed: f32,
    /// Slide deceleration
    pub slide_friction: f32,
    /// A slide ends below this speed
    pub slide_min_speed: f32,

    /// Stun length after being slid into
    pub stun_duration: f32,
    /// Length of the shoot-from-cover exposure window
    pub cover_exposure_duration: f32,
    /// Total teleport time, split evenly between fade out and fade in
    pub teleport_speed: f32,
    /// Automatic pads closer than this to the last teleport destination are ignored
    pub teleport_arrival_radius: f32,

    /// Height of the ground probe pivot above the feet
    pub probe_height: f32,
    /// Horizontal offset of the outer ground probe samples
    pub probe_side: f32,
    /// Extra probe reach below the feet
    pub probe_margin: f32,
    /// Layers that count as floor
    pub ground_mask: LayerMask,
    /// Layers that block horizontal movement
    pub wall_mask: LayerMask,
    /// Half width used for wall checks
    pub body_radius: f32,
    /// Height of wall checks and the weapon muzzle above the feet
    pub chest_height: f32,

    /// Landing classification
    pub fall: FallDamageConfig,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            wounded_threshold: 0.33,
            walk_speed: 6.0,
            wounded_speed_multiplier: 0.6,
            ground_acceleration: 40.0,
            air_acceleration: 15.0,
            jump_velocity: 7.0,
            gravity: -9.81,
            max_fall_speed: 40.0,
            slide_speed: 12.0,
            slide_friction: 8.0,
            slide_min_speed: 1.5,
            stun_duration: 1.5,
            cover_exposure_duration: 1.0,
            teleport_speed: 1.0,
            teleport_arrival_radius: 1.0,
            probe_height: 0.5,
            probe_side: 0.3,
            probe_margin: 0.15,
            ground_mask: CollisionLayer::GROUND.as_mask() | CollisionLayer::COVER,
            wall_mask: CollisionLayer::WALL.as_mask(),
            body_radius: 0.4,
            chest_height: 1.2,
            fall: FallDamageConfig::default(),
        }
    }
}

impl CharacterConfig {
    /// Set health and wounded threshold
    pub fn with_health(mut self, max_health: f32, wounded_threshold: f32) -> Self {
        self.max_health = max_health;
        self.wounded_threshold = wounded_threshold;
        self
    }

    /// Set walking speed
    pub fn with_walk_speed(mut self, speed: f32) -> Self {
        self.walk_speed = speed;
        self
    }

    /// Set slide start speed and friction
    pub fn with_slide(mut self, speed: f32, friction: f32) -> Self {
        self.slide_speed = speed;
        self.slide_friction = friction;
        self
    }

    /// Set stun length
    pub fn with_stun_duration(mut self, seconds: f32) -> Self {
        self.stun_duration = seconds;
        self
    }

    /// Set total teleport time
    pub fn with_teleport_speed(mut self, seconds: f32) -> Self {
        self.teleport_speed = seconds;
        self
    }

    /// Set landing thresholds
    pub fn with_fall(mut self, fall: FallDamageConfig) -> Self {
        self.fall = fall;
        self
    }

    /// Take gravity and terminal velocity from the physics step settings
    pub fn with_physics(mut self, physics: &PhysicsConfig) -> Self {
        self.gravity = physics.gravity;
        self.max_fall_speed = physics.terminal_velocity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_overrides_gravity() {
        let physics = PhysicsConfig::default().with_gravity(-20.0);
        let config = CharacterConfig::default().with_physics(&physics);
        assert_eq!(config.gravity, -20.0);
        assert_eq!(config.max_fall_speed, physics.terminal_velocity);
    }

    #[test]
    fn test_ground_mask_includes_cover_tops() {
        let config = CharacterConfig::default();
        assert!(config.ground_mask.contains(CollisionLayer::GROUND));
        assert!(config.ground_mask.contains(CollisionLayer::COVER));
        assert!(!config.ground_mask.contains(CollisionLayer::PLAYER));
    }
}
