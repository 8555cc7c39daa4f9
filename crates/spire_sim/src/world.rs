//! The simulation world and its fixed tick
//!
//! One tick runs, in order:
//!
//! 1. the player's decision, and any tower turn it triggers
//! 2. NPC decisions against the player
//! 3. character updates, body boxes, melee strikes
//! 4. zone enter/stay/exit and character bumps
//! 5. projectile flight, hits and wall impacts
//! 6. the tower rotation step
//! 7. presentation

use crate::config::SimConfig;
use crate::environment::{EnvironmentObject, EnvironmentShape};
use crate::error::Result;
use crate::roster::{Controller, Roster};
use rand::rngs::StdRng;
use rand::SeedableRng;
use spire_ai::NpcController;
use spire_character::{
    Character, CharacterBuilder, InputState, MovementIntent, MovementState, PlayerController, Presenter, Senses,
    TargetInfo,
};
use spire_combat::{
    Allegiance, BodyPart, DamageInfo, DamageReceiver, DamageType, HitTarget, Projectile, SpawnKind, SpawnQueue,
    SpawnRequest,
};
use spire_core::{EntityId, IdGenerator};
use spire_math::{ray_aabb, Aabb, MovementLine, Quat, Vec3};
use spire_physics::{BoxWorld, CollisionLayer, ContactEvent, LayerMask, PhysicsQuery, ZoneKind, ZoneTracker, ZoneVolume};
use spire_tower::{Corner, Rotatable, RotationHost, TowerRotationCoordinator, TurnStatus};
use std::collections::{BTreeMap, BTreeSet};

/// Layers character bodies live on
const CHARACTER_LAYERS: LayerMask =
    LayerMask(CollisionLayer::PLAYER.as_mask().0 | CollisionLayer::ENEMY.as_mask().0);

/// Counters kept across the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks: u64,
    pub projectiles_spawned: u64,
    pub projectile_hits: u64,
    pub melee_hits: u64,
    pub turns: u32,
}

/// Environment ids standing for whole groups the tower turns
#[derive(Debug, Clone, Copy)]
struct RotationGroups {
    projectiles: EntityId,
    patrol_lines: EntityId,
}

/// Owns every character, controller, projectile and level object, and
/// steps them in a fixed order.
pub struct World {
    config: SimConfig,
    ids: IdGenerator,
    roster: Roster,
    controllers: BTreeMap<EntityId, Controller>,
    player: Option<EntityId>,
    physics: BoxWorld,
    zones: ZoneTracker,
    environment: BTreeMap<EntityId, EnvironmentObject>,
    groups: RotationGroups,
    projectiles: Vec<Projectile>,
    spawns: SpawnQueue,
    effects: Vec<SpawnRequest>,
    /// Character body pairs overlapping last tick
    touching: BTreeSet<(EntityId, EntityId)>,
    tower: TowerRotationCoordinator,
    pending_turn: Option<Corner>,
    rng: StdRng,
    accumulator: f32,
    elapsed: f32,
    stats: SimStats,
    presenter: Option<Box<dyn Presenter>>,
}

impl World {
    /// Create an empty world around a query world. Boxes already in
    /// `physics` are fixed geometry that never turns with the tower.
    pub fn new(config: SimConfig, physics: BoxWorld) -> Self {
        let ids = IdGenerator::new();
        let groups = RotationGroups {
            projectiles: ids.next(),
            patrol_lines: ids.next(),
        };

        let mut tower = TowerRotationCoordinator::new(config.tower.clone());
        tower.register_environment(groups.projectiles);
        tower.register_environment(groups.patrol_lines);

        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            ids,
            roster: Roster::new(),
            controllers: BTreeMap::new(),
            player: None,
            physics,
            zones: ZoneTracker::new(),
            environment: BTreeMap::new(),
            groups,
            projectiles: Vec::new(),
            spawns: SpawnQueue::new(),
            effects: Vec::new(),
            touching: BTreeSet::new(),
            tower,
            pending_turn: None,
            rng,
            accumulator: 0.0,
            elapsed: 0.0,
            stats: SimStats::default(),
            presenter: None,
        }
    }

    pub fn set_presenter(&mut self, presenter: Box<dyn Presenter>) {
        self.presenter = Some(presenter);
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Reserve a fresh entity id
    pub fn next_id(&self) -> EntityId {
        self.ids.next()
    }

    /// Add a box that turns with the tower
    pub fn add_environment(&mut self, shape: EnvironmentShape, bounds: Aabb) -> EntityId {
        let id = self.ids.next();
        let object = EnvironmentObject::new(id, shape, bounds);
        match shape {
            EnvironmentShape::Solid(layer) => self.physics.set_body(id, object.bounds(), layer),
            EnvironmentShape::Zone(kind) => self.zones.add_zone(ZoneVolume::new(id, kind, object.bounds())),
        }
        self.tower.register_environment(id);
        self.environment.insert(id, object);
        id
    }

    /// Add a character with its controller and register it with the tower.
    /// A player controller makes it the player.
    pub fn add_character(&mut self, character: Character, controller: Controller) -> EntityId {
        let id = character.id();
        if matches!(controller, Controller::Player(_)) {
            if let Some(previous) = self.player.replace(id) {
                log::warn!("Player {} replaced by {}", previous, id);
            }
        }
        self.tower.register(id);
        self.controllers.insert(id, controller);
        self.roster.insert(character);
        log::debug!("Added character {}", id);
        id
    }

    /// Spawn the player from the configured character and weapon
    pub fn spawn_player(&mut self, position: Vec3) -> EntityId {
        let character = CharacterBuilder::new(self.next_id())
            .with_position(position)
            .with_allegiance(Allegiance::Friendly)
            .with_config(self.config.character.clone().with_physics(&self.config.physics))
            .with_default_hitboxes()
            .with_weapon(self.config.player_weapon.clone())
            .build();
        self.add_character(character, Controller::Player(PlayerController::new()))
    }

    /// Spawn an enemy patrolling `line`
    pub fn spawn_npc(&mut self, position: Vec3, line: MovementLine) -> EntityId {
        let character = CharacterBuilder::new(self.next_id())
            .with_position(position)
            .with_allegiance(Allegiance::Enemy)
            .with_config(self.config.character.clone().with_physics(&self.config.physics))
            .with_default_hitboxes()
            .with_weapon(self.config.npc_weapon.clone())
            .build();
        let controller = NpcController::new(line, self.config.npc.clone());
        self.add_character(character, Controller::Npc(Box::new(controller)))
    }

    /// Take a character out of the world
    pub fn remove_character(&mut self, id: EntityId) -> Option<Character> {
        self.tower.deregister(id);
        self.controllers.remove(&id);
        if self.physics.remove_body(id).is_ok() {
            log::trace!("Removed body of {}", id);
        }
        self.touching.retain(|(a, b)| *a != id && *b != id);
        if self.player == Some(id) {
            self.player = None;
        }
        self.roster.remove(id)
    }

    /// Take a level object out of the world
    pub fn remove_environment(&mut self, id: EntityId) -> Option<EnvironmentObject> {
        let object = self.environment.remove(&id)?;
        self.tower.deregister_environment(id);
        let removed = match object.shape {
            EnvironmentShape::Solid(_) => self.physics.remove_body(id).is_ok(),
            EnvironmentShape::Zone(_) => self.zones.remove_zone(id).is_ok(),
        };
        if !removed {
            log::warn!("Environment object {} had no collider", id);
        }
        Some(object)
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.roster.get(id)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.roster.get_mut(id)
    }

    pub fn characters(&self) -> impl Iterator<Item = (EntityId, &Character)> {
        self.roster.iter()
    }

    pub fn npc(&self, id: EntityId) -> Option<&NpcController> {
        self.controllers.get(&id).and_then(Controller::as_npc)
    }

    /// Input feeding the player controller
    pub fn player_input(&mut self) -> Option<&mut InputState> {
        let id = self.player?;
        self.controllers
            .get_mut(&id)
            .and_then(Controller::as_player_mut)
            .map(PlayerController::input_mut)
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Visual effects requested during the last tick
    pub fn effects(&self) -> &[SpawnRequest] {
        &self.effects
    }

    pub fn physics(&self) -> &BoxWorld {
        &self.physics
    }

    pub fn zones(&self) -> &ZoneTracker {
        &self.zones
    }

    pub fn environment_object(&self, id: EntityId) -> Option<&EnvironmentObject> {
        self.environment.get(&id)
    }

    pub fn tower(&self) -> &TowerRotationCoordinator {
        &self.tower
    }

    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Advance by one frame, running as many fixed ticks as fit. Time
    /// beyond `max_substeps` ticks is dropped. Returns the ticks run.
    pub fn run_frame(&mut self, frame_time: f32) -> u32 {
        let step = self.config.physics.timestep;
        let max_substeps = self.config.physics.max_substeps;

        self.accumulator += frame_time.max(0.0);
        let mut steps = 0;
        while self.accumulator >= step && steps < max_substeps {
            self.tick(step);
            self.accumulator -= step;
            steps += 1;
        }
        if self.accumulator >= step {
            log::trace!("Dropping {:.3}s of frame time", self.accumulator);
            self.accumulator %= step;
        }
        steps
    }

    /// Run one fixed tick
    pub fn tick(&mut self, delta_time: f32) {
        self.stats.ticks += 1;
        self.elapsed += delta_time;
        self.effects.clear();

        let intents = self.decide_intents(delta_time);
        self.update_characters(delta_time, &intents);
        self.dispatch_contacts();
        self.update_projectiles(delta_time);
        self.step_tower(delta_time);
        self.present();
    }

    /// Start a tower turn for touching `corner`
    pub fn request_turn(&mut self, corner: Corner) -> Result<()> {
        let request = self.tower.request_for_corner(corner)?;
        let mut host = TurnHost {
            roster: &mut self.roster,
            controllers: &mut self.controllers,
            projectiles: &mut self.projectiles,
            environment: &mut self.environment,
            physics: &mut self.physics,
            zones: &mut self.zones,
            groups: self.groups,
        };
        self.tower.start_turn(request, &mut host)?;
        Ok(())
    }

    fn decide_intents(&mut self, delta_time: f32) -> BTreeMap<EntityId, MovementIntent> {
        let mut intents = BTreeMap::new();

        // The player goes first so a turn it starts locks everyone before
        // the NPCs decide
        if let Some(player) = self.player {
            if let (Some(controller), Some(me)) = (self.controllers.get_mut(&player), self.roster.get(player)) {
                let senses = Senses {
                    physics: &self.physics,
                    target: None,
                    delta_time,
                };
                let intent = controller.source().decide(me, &senses, &mut self.rng);
                intents.insert(player, intent);
            }
        }

        let wants_turn = self.player.and_then(|p| intents.get(&p)).is_some_and(|i| i.turn);
        let corner = match self.pending_turn.take() {
            Some(corner) => Some(corner),
            None if wants_turn => self.player_corner(),
            None => None,
        };
        if let Some(corner) = corner {
            if let Err(err) = self.request_turn(corner) {
                log::debug!("Turn at {:?} not started: {}", corner, err);
            }
        }

        let target = self.player.and_then(|p| self.target_info(p));
        for (&id, controller) in self.controllers.iter_mut() {
            if Some(id) == self.player {
                continue;
            }
            let Some(me) = self.roster.get(id) else {
                continue;
            };
            let senses = Senses {
                physics: &self.physics,
                target,
                delta_time,
            };
            intents.insert(id, controller.source().decide(me, &senses, &mut self.rng));
        }
        intents
    }

    fn player_corner(&self) -> Option<Corner> {
        let contact = self.roster.get(self.player?)?.corner()?;
        match contact.kind {
            ZoneKind::TowerCorner(index) => Corner::from_index(index),
            _ => None,
        }
    }

    fn target_info(&self, id: EntityId) -> Option<TargetInfo> {
        let character = self.roster.get(id)?;
        Some(TargetInfo {
            id,
            position: character.chest(),
            in_cover: character.movement_state() == MovementState::Cover,
            alive: character.is_alive(),
        })
    }

    fn update_characters(&mut self, delta_time: f32, intents: &BTreeMap<EntityId, MovementIntent>) {
        for (id, character) in self.roster.iter_mut() {
            let intent = intents.get(&id).copied().unwrap_or_default();
            character.fixed_update(delta_time, &self.physics, &intent, &mut self.spawns, &mut self.rng);
        }

        self.sync_bodies();

        for (&id, intent) in intents {
            if intent.melee {
                self.melee(id);
            }
        }
    }

    /// Fit each body box around its character's hitboxes. Dead and
    /// disabled characters have no body.
    fn sync_bodies(&mut self) {
        for (id, character) in self.roster.iter() {
            match body_bounds(character) {
                Some(bounds) if character.is_alive() && character.is_enabled() => {
                    self.physics.set_body(id, bounds, body_layer(character.allegiance()));
                }
                _ => {
                    if self.physics.remove_body(id).is_ok() {
                        log::trace!("Removed body of {}", id);
                    }
                }
            }
        }
    }

    fn melee(&mut self, attacker: EntityId) {
        let Some(character) = self.roster.get(attacker) else {
            return;
        };
        if !character.is_alive() || character.movement_state().is_locked() {
            return;
        }

        let reach = self.config.melee.reach;
        let forward = character.axis() * character.facing();
        let strike = Aabb::from_center_half_extents(
            character.chest() + forward * (reach * 0.5),
            Vec3::new(reach * 0.5, 0.5, reach * 0.5),
        );
        let info = DamageInfo::new(self.config.melee.damage, DamageType::Melee)
            .with_allegiance(character.allegiance())
            .with_source(attacker);

        for victim in self.physics.overlapping_bodies(&strike, CHARACTER_LAYERS) {
            if victim == attacker {
                continue;
            }
            let Some(target) = self.roster.get_mut(victim) else {
                continue;
            };
            let index = target
                .hitboxes()
                .iter()
                .position(|h| h.part == BodyPart::Body)
                .unwrap_or(0);
            if target.receive_hit(index, &info) {
                self.stats.melee_hits += 1;
                log::debug!("{} struck {}", attacker, victim);
            }
        }
    }

    fn dispatch_contacts(&mut self) {
        let positions: Vec<(EntityId, Vec3)> = self
            .roster
            .iter()
            .filter(|(_, c)| c.is_enabled())
            .map(|(id, c)| (id, c.chest()))
            .collect();

        for (id, event) in self.zones.update(&positions) {
            if let ContactEvent::ZoneEnter(contact) = event {
                if self.config.auto_turn_on_corner && Some(id) == self.player {
                    if let ZoneKind::TowerCorner(index) = contact.kind {
                        self.pending_turn = Corner::from_index(index);
                    }
                }
            }
            if let Some(character) = self.roster.get_mut(id) {
                character.handle_event(&event);
            }
        }

        self.dispatch_bumps();
    }

    /// Send a hit event for every body pair that started overlapping
    fn dispatch_bumps(&mut self) {
        let mut now = BTreeSet::new();
        for (id, _) in self.roster.iter() {
            let Some(body) = self.physics.body(id) else {
                continue;
            };
            for other in self.physics.overlapping_bodies(&body.bounds, CHARACTER_LAYERS) {
                if other != id {
                    now.insert((id, other));
                }
            }
        }

        let fresh: Vec<(EntityId, EntityId)> = now.difference(&self.touching).copied().collect();
        self.touching = now;

        for (hit, other) in fresh {
            let other_sliding = self
                .roster
                .get(other)
                .is_some_and(|c| c.movement_state() == MovementState::Slide);
            if let Some(character) = self.roster.get_mut(hit) {
                character.handle_event(&ContactEvent::CharacterHit { other, other_sliding });
            }
        }
    }

    fn update_projectiles(&mut self, delta_time: f32) {
        self.absorb_spawns();

        let mut projectiles = std::mem::take(&mut self.projectiles);
        let mut receiver = CountingReceiver {
            roster: &mut self.roster,
            landed: 0,
        };

        for projectile in projectiles.iter_mut() {
            let from = projectile.position();
            projectile.update(delta_time, &mut receiver, &mut self.spawns, &mut self.rng);
            if projectile.is_destroyed() {
                continue;
            }

            let to = projectile.position();
            let segment = to - from;
            let length = segment.length();
            let wall = if length > f32::EPSILON {
                self.physics
                    .raycast(from, segment / length, length, LayerMask::SOLID)
                    .map(|hit| hit.distance)
            } else {
                None
            };

            let overlaps = swept_hits(receiver.roster, projectile, from, to, wall.unwrap_or(length));
            projectile.on_overlaps(&overlaps, &mut receiver, &mut self.spawns, &mut self.rng);
            if wall.is_some() && !projectile.is_destroyed() {
                log::trace!("Projectile hit a wall at {:?}", projectile.position());
                projectile.destroy(&mut self.spawns, &mut self.rng);
            }
        }

        self.stats.projectile_hits += receiver.landed;
        projectiles.retain(|p| !p.is_destroyed());
        self.projectiles = projectiles;

        // Sub-projectiles and impacts spawned above
        self.absorb_spawns();
    }

    /// Take ownership of spawned projectiles and keep the rest as effects
    fn absorb_spawns(&mut self) {
        for request in self.spawns.drain() {
            match request.kind {
                SpawnKind::Projectile(projectile) => {
                    self.stats.projectiles_spawned += 1;
                    self.projectiles.push(*projectile);
                }
                kind => self.effects.push(SpawnRequest { kind, ..request }),
            }
        }
    }

    fn step_tower(&mut self, delta_time: f32) {
        let mut host = TurnHost {
            roster: &mut self.roster,
            controllers: &mut self.controllers,
            projectiles: &mut self.projectiles,
            environment: &mut self.environment,
            physics: &mut self.physics,
            zones: &mut self.zones,
            groups: self.groups,
        };
        if let TurnStatus::Finished(facing) = self.tower.step(delta_time, &mut host) {
            self.stats.turns += 1;
            log::debug!("Turn {} done, facing {:?}", self.stats.turns, facing);
        }
    }

    fn present(&mut self) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        for (id, character) in self.roster.iter() {
            presenter.present(id, character.presentation());
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn body_layer(allegiance: Allegiance) -> CollisionLayer {
    match allegiance {
        Allegiance::Friendly => CollisionLayer::PLAYER,
        _ => CollisionLayer::ENEMY,
    }
}

/// Box enclosing every hitbox of a character
fn body_bounds(character: &Character) -> Option<Aabb> {
    character
        .hitboxes()
        .iter()
        .map(|h| h.bounds(character.transform()))
        .reduce(|a, b| Aabb::new(a.min.min(b.min), a.max.max(b.max)))
}

/// Enabled hitboxes the segment `from -> to` passes through within
/// `reach`, nearest first. Each carries the distance from the contact point
/// to the hitbox center for falloff.
fn swept_hits(roster: &Roster, projectile: &Projectile, from: Vec3, to: Vec3, reach: f32) -> Vec<(HitTarget, f32)> {
    let segment = to - from;
    let length = segment.length();
    let direction = if length > f32::EPSILON { segment / length } else { Vec3::ZERO };
    let pad = Vec3::splat(projectile.config().radius);

    let mut hits: Vec<(f32, HitTarget, f32)> = Vec::new();
    for (owner, character) in roster.iter() {
        if Some(owner) == projectile.source() {
            continue;
        }
        for (index, hitbox) in character.hitboxes().iter().enumerate() {
            if !hitbox.enabled {
                continue;
            }
            let bounds = hitbox.bounds(character.transform());
            let center = bounds.center();
            let bounds = Aabb::new(bounds.min - pad, bounds.max + pad);
            let along = if bounds.contains_point(from) {
                Some(0.0)
            } else if direction != Vec3::ZERO {
                ray_aabb(from, direction, &bounds, reach).map(|(t, _)| t)
            } else {
                None
            };
            if let Some(t) = along {
                let contact = from + direction * t;
                hits.push((t, HitTarget { owner, hitbox: index }, contact.distance(center)));
            }
        }
    }

    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, target, distance)| (target, distance)).collect()
}

/// Routes projectile damage into the roster and counts hits that landed
struct CountingReceiver<'a> {
    roster: &'a mut Roster,
    landed: u64,
}

impl DamageReceiver for CountingReceiver<'_> {
    fn apply_hit(&mut self, target: HitTarget, damage: &DamageInfo) -> bool {
        let landed = self.roster.apply_hit(target, damage);
        if landed {
            self.landed += 1;
        }
        landed
    }
}

/// Split borrow of the world handed to the tower coordinator
struct TurnHost<'a> {
    roster: &'a mut Roster,
    controllers: &'a mut BTreeMap<EntityId, Controller>,
    projectiles: &'a mut Vec<Projectile>,
    environment: &'a mut BTreeMap<EntityId, EnvironmentObject>,
    physics: &'a mut BoxWorld,
    zones: &'a mut ZoneTracker,
    groups: RotationGroups,
}

impl RotationHost for TurnHost<'_> {
    fn rotatable(&mut self, id: EntityId) -> Option<&mut dyn Rotatable> {
        self.roster.get_mut(id).map(|c| c as &mut dyn Rotatable)
    }

    fn rotate_environment(&mut self, id: EntityId, pivot: Vec3, rotation: Quat) {
        if id == self.groups.projectiles {
            for projectile in self.projectiles.iter_mut() {
                projectile.rotate_around(pivot, rotation);
            }
            return;
        }
        if id == self.groups.patrol_lines {
            for controller in self.controllers.values_mut() {
                if let Controller::Npc(npc) = controller {
                    npc.rotate_line(pivot, rotation);
                }
            }
            return;
        }

        let Some(object) = self.environment.get_mut(&id) else {
            log::warn!("Unknown environment object {}", id);
            return;
        };
        object.rotate_around(pivot, rotation);
        let bounds = object.bounds();
        match object.shape {
            EnvironmentShape::Solid(layer) => self.physics.set_body(id, bounds, layer),
            EnvironmentShape::Zone(_) => {
                if let Some(zone) = self.zones.zone_mut(id) {
                    // Moves a teleporter destination along; the box itself
                    // is rebuilt from the object to stay tight
                    zone.rotate_around(pivot, rotation);
                    zone.bounds = bounds;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use spire_combat::{Falloff, ProjectileConfig};

    #[test]
    fn test_falloff_measures_to_the_hitbox_not_the_origin() {
        let mut roster = Roster::new();
        let target = EntityId::new(4, 0);
        roster.insert(
            CharacterBuilder::new(target)
                .with_position(Vec3::new(20.0, 0.0, 0.0))
                .with_allegiance(Allegiance::Enemy)
                .with_default_hitboxes()
                .build(),
        );

        let config = ProjectileConfig::default()
            .with_damage(50.0, 50.0, DamageType::Projectile)
            .with_falloff(Falloff::LinearInterpolate);
        let mut rng = StdRng::seed_from_u64(1);
        let projectile = Projectile::spawn(&config, Allegiance::Friendly, Vec3::new(0.0, 0.7, 0.0), Vec3::X, &mut rng);

        // Last step of a long flight, entering the body box at x = 19.5
        let hits = swept_hits(&roster, &projectile, Vec3::new(19.0, 0.7, 0.0), Vec3::new(19.6, 0.7, 0.0), 0.6);
        assert_eq!(hits.len(), 1);
        let (hit, distance) = hits[0];
        assert_eq!(hit, HitTarget { owner: target, hitbox: 0 });
        assert_abs_diff_eq!(distance, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(config.falloff.apply(50.0, distance), 50.0);

        // Starting inside the box measures from the start point
        let hits = swept_hits(&roster, &projectile, Vec3::new(20.0, 0.2, 0.0), Vec3::new(20.3, 0.2, 0.0), 0.3);
        assert_abs_diff_eq!(hits[0].1, 0.5, epsilon = 1e-4);
    }
}
