//! NPC vision: facing cone, range, line of sight and the cover override

use serde::{Deserialize, Serialize};
use spire_character::{Character, TargetInfo};
use spire_physics::{LayerMask, PhysicsQuery};

/// Forward vision cone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionCone {
    /// Farthest distance a target can be seen at
    pub view_distance: f32,
    /// Minimum dot between facing and the direction to the target
    pub min_facing_dot: f32,
    /// A target in cover is only seen this close, unless already in combat
    pub cover_detection_distance: f32,
    /// Layers that block line of sight
    pub occluders: LayerMask,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self {
            view_distance: 12.0,
            min_facing_dot: 0.5,
            cover_detection_distance: 3.0,
            occluders: LayerMask::SOLID,
        }
    }
}

impl VisionCone {
    /// Whether `me` can see `target` this tick.
    ///
    /// A target hiding in cover is only noticed from within
    /// `cover_detection_distance`, unless the observer is already fighting
    /// it.
    pub fn can_see(&self, me: &Character, target: &TargetInfo, physics: &dyn PhysicsQuery, in_combat: bool) -> bool {
        if !target.alive {
            return false;
        }

        let eye = me.chest();
        let delta = target.position - eye;
        let distance = delta.length();
        if distance > self.view_distance {
            return false;
        }

        let forward = me.axis() * me.facing();
        let flat = delta.with_y(0.0);
        if flat.length() > f32::EPSILON && flat.normalize().dot(forward) < self.min_facing_dot {
            return false;
        }

        if target.in_cover && !in_combat && distance > self.cover_detection_distance {
            return false;
        }

        !physics.blocked(eye, target.position, self.occluders)
    }
}
