//! NPC tuning

use crate::perception::VisionCone;
use serde::{Deserialize, Serialize};
use spire_physics::{CollisionLayer, LayerMask};

/// Patrol and combat parameters for one NPC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    pub vision: VisionCone,

    // Patrol
    /// Patrol targets are picked within half this distance of the start
    pub patrol_distance: f32,
    /// Seconds to idle at a patrol target
    pub patrol_wait: f32,
    /// Axis magnitude while patrolling
    pub patrol_speed: f32,
    /// Distance along the line counted as arrived
    pub arrival_tolerance: f32,

    // Combat
    /// Preferred distance to the target
    pub maintain_distance: f32,
    /// Half width of the band around `maintain_distance`
    pub distance_threshold: f32,
    /// Combat ends past this distance
    pub max_pursue_distance: f32,
    /// Axis magnitude while repositioning
    pub combat_speed: f32,
    /// Layers that make a standoff point unreachable
    pub reach_blockers: LayerMask,

    // Cover
    /// How far ahead to look for cover
    pub cover_seek_distance: f32,
    /// No cover seeking when the target is closer than this
    pub min_cover_target_distance: f32,
    pub cover_mask: LayerMask,
    /// Stay in cover while it is within this dot of the threat direction
    pub cover_threat_dot: f32,

    // Firing
    /// Chance per tick to pull the trigger while the target is visible
    pub fire_chance: f32,
    pub fire_range: f32,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            vision: VisionCone::default(),
            patrol_distance: 8.0,
            patrol_wait: 2.0,
            patrol_speed: 0.5,
            arrival_tolerance: 0.3,
            maintain_distance: 6.0,
            distance_threshold: 1.5,
            max_pursue_distance: 18.0,
            combat_speed: 1.0,
            reach_blockers: CollisionLayer::WALL.as_mask(),
            cover_seek_distance: 5.0,
            min_cover_target_distance: 3.0,
            cover_mask: CollisionLayer::COVER.as_mask(),
            cover_threat_dot: 0.0,
            fire_chance: 0.1,
            fire_range: 14.0,
        }
    }
}

impl NpcConfig {
    pub fn with_vision(mut self, vision: VisionCone) -> Self {
        self.vision = vision;
        self
    }

    pub fn with_patrol(mut self, distance: f32, wait: f32) -> Self {
        self.patrol_distance = distance;
        self.patrol_wait = wait;
        self
    }

    pub fn with_standoff(mut self, maintain_distance: f32, threshold: f32) -> Self {
        self.maintain_distance = maintain_distance;
        self.distance_threshold = threshold;
        self
    }

    pub fn with_max_pursue_distance(mut self, distance: f32) -> Self {
        self.max_pursue_distance = distance;
        self
    }

    pub fn with_fire(mut self, chance: f32, range: f32) -> Self {
        self.fire_chance = chance;
        self.fire_range = range;
        self
    }

    /// Whether `distance` lies inside the standoff band
    pub fn in_standoff_band(&self, distance: f32) -> bool {
        (distance - self.maintain_distance).abs() <= self.distance_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standoff_band_edges() {
        let config = NpcConfig::default().with_standoff(6.0, 1.5);
        assert!(config.in_standoff_band(4.5));
        assert!(config.in_standoff_band(7.5));
        assert!(!config.in_standoff_band(4.4));
        assert!(!config.in_standoff_band(8.0));
    }
}
