//! Landing classification from vertical speed

use serde::{Deserialize, Serialize};

/// How a landing is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Nothing happens
    Soft,
    /// Hard landing turned into a slide
    Slide,
    /// Kills with [`DamageType::Fall`](crate::DamageType::Fall)
    Fatal,
}

/// Fall damage thresholds, as (negative) vertical velocities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallDamageConfig {
    pub enabled: bool,
    /// At or below this vertical speed a landing kills
    pub death_velocity: f32,
    /// At or below this vertical speed a landing forces a slide
    pub slide_velocity: f32,
}

impl Default for FallDamageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            death_velocity: -22.0,
            slide_velocity: -12.0,
        }
    }
}

impl FallDamageConfig {
    /// Set the fatal threshold
    pub fn with_death_velocity(mut self, velocity: f32) -> Self {
        self.death_velocity = velocity;
        self
    }

    /// Set the auto-slide threshold
    pub fn with_slide_velocity(mut self, velocity: f32) -> Self {
        self.slide_velocity = velocity;
        self
    }

    /// Classify a landing from the previous step's vertical velocity
    pub fn classify(&self, previous_vertical_velocity: f32) -> Landing {
        if !self.enabled {
            return Landing::Soft;
        }
        if previous_vertical_velocity <= self.death_velocity {
            Landing::Fatal
        } else if previous_vertical_velocity <= self.slide_velocity {
            Landing::Slide
        } else {
            Landing::Soft
        }
    }
}
