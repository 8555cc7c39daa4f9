//! Tower rotation tuning

use serde::{Deserialize, Serialize};
use spire_math::Vec3;

/// Tower rotation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Seconds a quarter turn takes
    pub turn_duration: f32,
    /// Point the playfield turns around
    pub pivot: Vec3,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            turn_duration: 1.0,
            pivot: Vec3::ZERO,
        }
    }
}

impl TowerConfig {
    pub fn with_turn_duration(mut self, seconds: f32) -> Self {
        self.turn_duration = seconds;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }
}
