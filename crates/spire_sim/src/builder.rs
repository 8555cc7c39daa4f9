//! Assembles a `World` from a config and a level description

use crate::config::SimConfig;
use crate::environment::EnvironmentShape;
use crate::error::{Result, SimError};
use crate::world::World;
use spire_character::Presenter;
use spire_math::{Aabb, MovementLine, Vec3};
use spire_physics::{BoxWorld, CollisionLayer, ZoneKind};

/// Cover and corner zones reach this high so a standing character's chest
/// is inside them
const ZONE_HEIGHT: f32 = 2.0;

struct NpcSpawn {
    position: Vec3,
    patrol: Vec<Vec3>,
}

/// Builder for a simulation world.
///
/// ```ignore
/// let world = SimBuilder::new(SimConfig::default())
///     .with_physics(BoxWorld::new())
///     .add_solid(floor, CollisionLayer::GROUND)
///     .with_player(Vec3::ZERO)
///     .add_npc(Vec3::new(8.0, 0.0, 0.0), vec![a, b])
///     .build()?;
/// ```
pub struct SimBuilder {
    config: SimConfig,
    physics: Option<BoxWorld>,
    presenter: Option<Box<dyn Presenter>>,
    environment: Vec<(EnvironmentShape, Aabb)>,
    player: Option<Vec3>,
    npcs: Vec<NpcSpawn>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            physics: None,
            presenter: None,
            environment: Vec::new(),
            player: None,
            npcs: Vec::new(),
        }
    }

    /// Query world to build on. Its existing boxes stay fixed when the
    /// tower turns.
    pub fn with_physics(mut self, physics: BoxWorld) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Collision box that turns with the tower
    pub fn add_solid(mut self, bounds: Aabb, layer: CollisionLayer) -> Self {
        self.environment.push((EnvironmentShape::Solid(layer), bounds));
        self
    }

    /// Trigger zone that turns with the tower
    pub fn add_zone(mut self, bounds: Aabb, kind: ZoneKind) -> Self {
        self.environment.push((EnvironmentShape::Zone(kind), bounds));
        self
    }

    /// Cover object: a box NPCs can find by raycast plus a cover zone
    /// around it that a sliding character enters
    pub fn add_cover(self, bounds: Aabb) -> Self {
        let radius = self.config.character.body_radius;
        let zone = Aabb::new(
            bounds.min - Vec3::new(radius, 0.0, radius),
            Vec3::new(bounds.max.x + radius, bounds.max.y.max(ZONE_HEIGHT), bounds.max.z + radius),
        );
        self.add_solid(bounds, CollisionLayer::COVER).add_zone(zone, ZoneKind::Cover)
    }

    /// Tower corner zone (NE = 0, clockwise)
    pub fn add_corner(self, center: Vec3, index: u8) -> Self {
        let bounds = Aabb::new(
            center - Vec3::new(0.5, 0.0, 1.0),
            center + Vec3::new(0.5, ZONE_HEIGHT, 1.0),
        );
        self.add_zone(bounds, ZoneKind::TowerCorner(index))
    }

    pub fn with_player(mut self, position: Vec3) -> Self {
        self.player = Some(position);
        self
    }

    /// Enemy that patrols the loop through `patrol`, last point back to
    /// the first
    pub fn add_npc(mut self, position: Vec3, patrol: Vec<Vec3>) -> Self {
        self.npcs.push(NpcSpawn { position, patrol });
        self
    }

    /// Validate the config and wire the world
    pub fn build(self) -> Result<World> {
        self.config.validate()?;
        let physics = self.physics.ok_or(SimError::MissingService("physics"))?;
        let player = self.player.ok_or(SimError::MissingService("player"))?;

        // Lines are checked before anything is spawned
        let mut lines = Vec::with_capacity(self.npcs.len());
        for npc in &self.npcs {
            lines.push(MovementLine::new(npc.patrol.clone(), true)?);
        }

        let environment_count = self.environment.len();
        let mut world = World::new(self.config, physics);
        if let Some(presenter) = self.presenter {
            world.set_presenter(presenter);
        }
        for (shape, bounds) in self.environment {
            world.add_environment(shape, bounds);
        }
        world.spawn_player(player);
        for (npc, line) in self.npcs.iter().zip(lines) {
            world.spawn_npc(npc.position, line);
        }

        log::info!(
            "World ready: {} characters, {} environment objects",
            world.characters().count(),
            environment_count
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_character::MovementState;

    fn floor() -> Aabb {
        Aabb::new(Vec3::new(-20.0, -1.0, -2.0), Vec3::new(20.0, 0.0, 2.0))
    }

    #[test]
    fn test_missing_services() {
        let err = SimBuilder::new(SimConfig::default())
            .with_player(Vec3::ZERO)
            .build()
            .err();
        assert!(matches!(err, Some(SimError::MissingService("physics"))));

        let err = SimBuilder::new(SimConfig::default())
            .with_physics(BoxWorld::new())
            .build()
            .err();
        assert!(matches!(err, Some(SimError::MissingService("player"))));
    }

    #[test]
    fn test_bad_patrol_line() {
        let err = SimBuilder::new(SimConfig::default())
            .with_physics(BoxWorld::new())
            .with_player(Vec3::ZERO)
            .add_npc(Vec3::X, vec![Vec3::X])
            .build()
            .err();
        assert!(matches!(err, Some(SimError::Line(_))));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config = SimConfig::default();
        config.physics.timestep = -1.0;
        let err = SimBuilder::new(config)
            .with_physics(BoxWorld::new())
            .with_player(Vec3::ZERO)
            .build()
            .err();
        assert!(matches!(err, Some(SimError::Config(_))));
    }

    #[test]
    fn test_everything_registers_with_the_tower() {
        let world = SimBuilder::new(SimConfig::default())
            .with_physics(BoxWorld::new())
            .add_solid(floor(), CollisionLayer::GROUND)
            .add_cover(Aabb::new(Vec3::new(3.0, 0.0, -1.0), Vec3::new(3.5, 1.0, 1.0)))
            .with_player(Vec3::ZERO)
            .add_npc(Vec3::new(8.0, 0.0, 0.0), vec![Vec3::new(4.0, 0.0, 0.0), Vec3::new(12.0, 0.0, 0.0)])
            .build()
            .unwrap();

        let player = world.player().unwrap();
        assert!(world.tower().is_registered(player));
        assert_eq!(world.tower().registered().count(), 2);
        assert_eq!(world.zones().zones().len(), 1);
        assert_eq!(world.character(player).map(|c| c.movement_state()), Some(MovementState::Walk));
    }
}
