//! Demo level and a scripted headless session

use crate::builder::SimBuilder;
use crate::config::SimConfig;
use crate::error::Result;
use crate::world::{SimStats, World};
use spire_character::{AnimTag, InputAction, PresentationState, Presenter};
use spire_core::EntityId;
use spire_math::{Aabb, Vec3};
use spire_physics::{BoxWorld, CollisionLayer};
use std::collections::BTreeMap;

/// Player start on the demo level
pub const PLAYER_START: Vec3 = Vec3::new(-8.0, 0.0, 0.0);

/// One tower face: a floor strip through the pivot with a wall at each end,
/// a cover block, a corner zone near each end and one patrolling enemy.
pub fn demo_world(config: SimConfig) -> Result<World> {
    let presenter = LogPresenter::default();
    SimBuilder::new(config)
        .with_physics(BoxWorld::new())
        .with_presenter(Box::new(presenter))
        .add_solid(
            Aabb::new(Vec3::new(-14.0, -1.0, -2.0), Vec3::new(14.0, 0.0, 2.0)),
            CollisionLayer::GROUND,
        )
        .add_solid(
            Aabb::new(Vec3::new(-15.0, 0.0, -2.0), Vec3::new(-14.0, 4.0, 2.0)),
            CollisionLayer::WALL,
        )
        .add_solid(
            Aabb::new(Vec3::new(14.0, 0.0, -2.0), Vec3::new(15.0, 4.0, 2.0)),
            CollisionLayer::WALL,
        )
        .add_cover(Aabb::new(Vec3::new(-2.0, 0.0, -1.0), Vec3::new(-1.5, 1.0, 1.0)))
        .add_corner(Vec3::new(12.5, 0.0, 0.0), 0)
        .add_corner(Vec3::new(-12.5, 0.0, 0.0), 3)
        .with_player(PLAYER_START)
        .add_npc(
            Vec3::new(6.0, 0.0, 0.0),
            vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
        )
        .build()
}

/// Input change applied at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptAction {
    Axis(f32),
    HoldFire(bool),
    Press(InputAction),
}

/// Scripted input: `(seconds, action)` pairs in time order
pub type Script = Vec<(f32, ScriptAction)>;

/// Walk up to the cover, fire at the enemy, slide into cover, step out
/// and head for the east corner to turn the tower.
pub fn demo_script() -> Script {
    vec![
        (0.0, ScriptAction::Axis(1.0)),
        (0.6, ScriptAction::Axis(0.0)),
        (0.7, ScriptAction::Press(InputAction::Fire)),
        (0.9, ScriptAction::Press(InputAction::Fire)),
        (1.1, ScriptAction::HoldFire(true)),
        (2.0, ScriptAction::HoldFire(false)),
        (2.1, ScriptAction::Press(InputAction::Reload)),
        (2.2, ScriptAction::Axis(1.0)),
        (2.3, ScriptAction::Press(InputAction::Slide)),
        (3.0, ScriptAction::Axis(0.0)),
        (3.5, ScriptAction::Axis(1.0)),
        (3.6, ScriptAction::Press(InputAction::Jump)),
        (6.5, ScriptAction::Press(InputAction::Turn)),
        (6.6, ScriptAction::Axis(0.0)),
        (7.0, ScriptAction::Press(InputAction::Melee)),
    ]
}

/// Run `script` for `duration` seconds of frames at `frame_time`
pub fn run_script(world: &mut World, script: &[(f32, ScriptAction)], duration: f32, frame_time: f32) -> SimStats {
    let mut next = 0;
    let mut clock = 0.0;
    while clock < duration {
        while let Some(&(at, action)) = script.get(next) {
            if at > clock {
                break;
            }
            apply(world, action);
            next += 1;
        }
        world.run_frame(frame_time);
        clock += frame_time;
    }
    world.stats()
}

fn apply(world: &mut World, action: ScriptAction) {
    let Some(input) = world.player_input() else {
        log::warn!("No player to drive");
        return;
    };
    match action {
        ScriptAction::Axis(axis) => input.set_axis(axis),
        ScriptAction::HoldFire(held) => input.set_fire_held(held),
        ScriptAction::Press(button) => input.press(button),
    }
}

/// Logs animation changes
#[derive(Default)]
pub struct LogPresenter {
    shown: BTreeMap<EntityId, AnimTag>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, entity: EntityId, state: &PresentationState) {
        let previous = self.shown.insert(entity, state.tag);
        if previous != Some(state.tag) {
            log::debug!("{} shows {:?}", entity, state.tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_session_runs() {
        let mut world = demo_world(SimConfig::default()).unwrap();
        let stats = run_script(&mut world, &demo_script(), 2.0, 1.0 / 60.0);
        assert!(stats.ticks >= 110);
        assert!(stats.projectiles_spawned >= 2);

        let player = world.player().unwrap();
        let x = world.character(player).map(|c| c.position().x).unwrap();
        assert!(x > PLAYER_START.x);
    }
}
