//! The turn protocol: BeforeTurn, Turn each tick, PostTurn

use crate::config::TowerConfig;
use crate::error::{Result, TurnError};
use crate::facing::{turn_sign, Corner, Facing};
use crate::session::{TowerRotationSession, TurnRequest};
use spire_character::Character;
use spire_core::EntityId;
use spire_math::{Quat, Transform, Vec3};
use std::collections::BTreeSet;

/// Something a rotation session moves and locks
pub trait Rotatable {
    fn rotation_transform(&self) -> Transform;
    fn set_rotation_transform(&mut self, transform: Transform);
    /// Called once at BeforeTurn
    fn begin_rotation(&mut self);
    /// Called once at PostTurn, after the final snap
    fn end_rotation(&mut self);
}

impl Rotatable for Character {
    fn rotation_transform(&self) -> Transform {
        *self.transform()
    }

    fn set_rotation_transform(&mut self, transform: Transform) {
        self.set_transform(transform);
    }

    fn begin_rotation(&mut self) {
        Character::begin_rotation(self);
    }

    fn end_rotation(&mut self) {
        Character::end_rotation(self);
    }
}

/// Gives the coordinator access to the objects it drives
pub trait RotationHost {
    /// A registered entity, or `None` if it no longer exists
    fn rotatable(&mut self, id: EntityId) -> Option<&mut dyn Rotatable>;

    /// Turn an environment object around `pivot` by `rotation`
    fn rotate_environment(&mut self, id: EntityId, pivot: Vec3, rotation: Quat);
}

/// What a call to [`TowerRotationCoordinator::step`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnStatus {
    /// No session running
    Idle,
    /// Interpolated to the given progress
    Turning(f32),
    /// Session finished, tower now shows this side
    Finished(Facing),
}

/// Runs tower rotation sessions over registered entities and environment
/// objects.
///
/// Registration is idempotent. Only one session runs at a time.
#[derive(Debug, Default)]
pub struct TowerRotationCoordinator {
    config: TowerConfig,
    facing: Facing,
    entities: BTreeSet<EntityId>,
    environment: BTreeSet<EntityId>,
    session: Option<TowerRotationSession>,
    completed_turns: u32,
}

impl TowerRotationCoordinator {
    pub fn new(config: TowerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn config(&self) -> &TowerConfig {
        &self.config
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TowerRotationSession> {
        self.session.as_ref()
    }

    pub fn completed_turns(&self) -> u32 {
        self.completed_turns
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a character-like entity. Returns false if already registered.
    pub fn register(&mut self, id: EntityId) -> bool {
        self.entities.insert(id)
    }

    /// Deregister an entity, dropping its snapshot if a session runs.
    /// Returns false if it was not registered.
    pub fn deregister(&mut self, id: EntityId) -> bool {
        if let Some(session) = self.session.as_mut() {
            session.remove_snapshot(id);
        }
        self.entities.remove(&id)
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.entities.contains(&id)
    }

    pub fn registered(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    /// Register an environment object (turned incrementally, never locked)
    pub fn register_environment(&mut self, id: EntityId) -> bool {
        self.environment.insert(id)
    }

    pub fn deregister_environment(&mut self, id: EntityId) -> bool {
        self.environment.remove(&id)
    }

    // ------------------------------------------------------------------
    // Protocol
    // ------------------------------------------------------------------

    /// Build a request for touching `corner` with the current facing
    pub fn request_for_corner(&self, corner: Corner) -> Result<TurnRequest> {
        let sign = turn_sign(corner, self.facing).ok_or(TurnError::NoTurn {
            corner,
            facing: self.facing,
        })?;
        Ok(TurnRequest::new(self.config.pivot, sign, self.config.turn_duration))
    }

    /// BeforeTurn: snapshot every registered entity's current and projected
    /// end transform, then lock it.
    pub fn start_turn(&mut self, request: TurnRequest, host: &mut dyn RotationHost) -> Result<()> {
        if self.session.is_some() {
            log::debug!("Turn request rejected, session already running");
            return Err(TurnError::SessionActive);
        }
        request.validate()?;

        let mut session = TowerRotationSession::new(request);
        let mut missing = Vec::new();
        for &id in &self.entities {
            match host.rotatable(id) {
                Some(entity) => {
                    session.snapshot(id, entity.rotation_transform());
                    entity.begin_rotation();
                }
                None => missing.push(id),
            }
        }
        for id in missing {
            log::warn!("Rotation target {} no longer exists, deregistering", id);
            self.entities.remove(&id);
        }

        log::info!(
            "Tower turn started: sign {:+}, {} entities, {}s around {:?}",
            request.sign,
            self.entities.len(),
            request.duration,
            request.pivot
        );
        self.session = Some(session);
        Ok(())
    }

    /// Turn: advance the session by `delta_time`. Finishes with PostTurn
    /// once the duration has elapsed.
    pub fn step(&mut self, delta_time: f32, host: &mut dyn RotationHost) -> TurnStatus {
        let Some(mut session) = self.session.take() else {
            return TurnStatus::Idle;
        };

        // Entities registered mid-session join from where they are now
        for &id in &self.entities {
            if session.has_snapshot(id) {
                continue;
            }
            if let Some(entity) = host.rotatable(id) {
                session.snapshot(id, entity.rotation_transform());
                entity.begin_rotation();
            }
        }

        session.advance(delta_time);
        let progress = session.progress();

        let mut lost = Vec::new();
        for (id, snapshot) in session.snapshots() {
            match host.rotatable(id) {
                Some(entity) => entity.set_rotation_transform(snapshot.at(progress)),
                None => lost.push(id),
            }
        }
        for id in lost {
            log::warn!("Rotation target {} vanished mid-turn", id);
            session.remove_snapshot(id);
            self.entities.remove(&id);
        }

        let delta = session.take_environment_delta();
        for &id in &self.environment {
            host.rotate_environment(id, session.pivot(), delta);
        }

        if session.is_complete() {
            self.finish(session, host);
            return TurnStatus::Finished(self.facing);
        }

        log::trace!("Tower turn at {:.2}", progress);
        self.session = Some(session);
        TurnStatus::Turning(progress)
    }

    /// PostTurn: snap to the recorded ends, advance facing, release
    fn finish(&mut self, session: TowerRotationSession, host: &mut dyn RotationHost) {
        for (id, snapshot) in session.snapshots() {
            if let Some(entity) = host.rotatable(id) {
                entity.set_rotation_transform(snapshot.end);
            }
        }

        self.facing = self.facing.advance(session.sign());
        self.completed_turns += 1;

        for (id, _) in session.snapshots() {
            if let Some(entity) = host.rotatable(id) {
                entity.end_rotation();
            }
        }

        log::info!("Tower turn finished, now facing {:?}", self.facing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use spire_character::{CharacterBuilder, MovementState};
    use spire_combat::DamageType;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Host {
        characters: BTreeMap<EntityId, Character>,
        props: BTreeMap<EntityId, Transform>,
    }

    impl Host {
        fn add(&mut self, index: u32, position: Vec3) -> EntityId {
            let id = EntityId::new(index, 0);
            let c = CharacterBuilder::new(id)
                .with_position(position)
                .with_default_hitboxes()
                .build();
            self.characters.insert(id, c);
            id
        }
    }

    impl RotationHost for Host {
        fn rotatable(&mut self, id: EntityId) -> Option<&mut dyn Rotatable> {
            self.characters.get_mut(&id).map(|c| c as &mut dyn Rotatable)
        }

        fn rotate_environment(&mut self, id: EntityId, pivot: Vec3, rotation: Quat) {
            if let Some(t) = self.props.get_mut(&id) {
                t.rotate_around(pivot, rotation);
            }
        }
    }

    fn run_to_end(coordinator: &mut TowerRotationCoordinator, host: &mut Host) -> Vec<TurnStatus> {
        let mut statuses = Vec::new();
        for _ in 0..100 {
            let status = coordinator.step(1.0 / 60.0, host);
            statuses.push(status);
            if matches!(status, TurnStatus::Finished(_)) {
                break;
            }
        }
        statuses
    }

    #[test]
    fn test_full_turn_lands_exactly_on_snapshot() {
        let mut host = Host::default();
        let a = host.add(1, Vec3::new(5.0, 0.0, 0.0));
        let b = host.add(2, Vec3::new(-3.0, 2.0, 1.0));

        let mut coordinator = TowerRotationCoordinator::new(TowerConfig::default());
        coordinator.register(a);
        coordinator.register(b);

        let request = coordinator.request_for_corner(Corner::NorthEast).unwrap();
        coordinator.start_turn(request, &mut host).unwrap();
        let expected: Vec<_> = [a, b]
            .iter()
            .map(|id| coordinator.session().unwrap().snapshot_of(*id).unwrap().end)
            .collect();
        assert_eq!(host.characters[&a].movement_state(), MovementState::Rotating);

        let statuses = run_to_end(&mut coordinator, &mut host);
        assert_eq!(statuses.last(), Some(&TurnStatus::Finished(Facing::East)));
        assert!(!coordinator.is_active());

        for (id, end) in [a, b].iter().zip(expected) {
            let c = &host.characters[id];
            assert_eq!(*c.transform(), end);
            assert_ne!(c.movement_state(), MovementState::Rotating);
        }
        let pa = host.characters[&a].position();
        assert_abs_diff_eq!(pa.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(pa.z, -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_second_session_rejected() {
        let mut host = Host::default();
        let mut coordinator = TowerRotationCoordinator::new(TowerConfig::default());
        let request = TurnRequest::new(Vec3::ZERO, 1, 1.0);
        coordinator.start_turn(request, &mut host).unwrap();
        assert_eq!(coordinator.start_turn(request, &mut host), Err(TurnError::SessionActive));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut coordinator = TowerRotationCoordinator::default();
        let id = EntityId::new(1, 0);
        assert!(coordinator.register(id));
        assert!(!coordinator.register(id));
        assert!(coordinator.deregister(id));
        assert!(!coordinator.deregister(id));
        assert!(!coordinator.is_registered(id));

        let wall = EntityId::new(2, 0);
        assert!(coordinator.register_environment(wall));
        assert!(!coordinator.register_environment(wall));
        assert!(coordinator.deregister_environment(wall));
        assert!(!coordinator.deregister_environment(wall));
    }

    #[test]
    fn test_deregister_mid_session_drops_snapshot() {
        let mut host = Host::default();
        let a = host.add(1, Vec3::new(5.0, 0.0, 0.0));
        let mut coordinator = TowerRotationCoordinator::default();
        coordinator.register(a);
        coordinator.start_turn(TurnRequest::new(Vec3::ZERO, 1, 1.0), &mut host).unwrap();
        coordinator.step(0.25, &mut host);

        coordinator.deregister(a);
        assert!(!coordinator.session().unwrap().has_snapshot(a));
        let frozen = *host.characters[&a].transform();
        run_to_end(&mut coordinator, &mut host);
        assert_eq!(*host.characters[&a].transform(), frozen);
    }

    #[test]
    fn test_dead_entities_are_still_driven() {
        let mut host = Host::default();
        let a = host.add(1, Vec3::new(5.0, 0.0, 0.0));
        let mut coordinator = TowerRotationCoordinator::default();
        coordinator.register(a);
        coordinator.start_turn(TurnRequest::new(Vec3::ZERO, -1, 0.5), &mut host).unwrap();
        coordinator.step(0.1, &mut host);

        host.characters.get_mut(&a).unwrap().kill(DamageType::Fire);
        run_to_end(&mut coordinator, &mut host);

        let c = &host.characters[&a];
        assert_eq!(c.movement_state(), MovementState::Dead);
        assert_abs_diff_eq!(c.position().z, 5.0, epsilon = 1e-4);
        assert_eq!(coordinator.facing(), Facing::West);
    }

    #[test]
    fn test_late_registration_is_snapshotted_before_interpolation() {
        let mut host = Host::default();
        let a = host.add(1, Vec3::new(5.0, 0.0, 0.0));
        let mut coordinator = TowerRotationCoordinator::default();
        coordinator.start_turn(TurnRequest::new(Vec3::ZERO, 1, 1.0), &mut host).unwrap();
        coordinator.step(0.5, &mut host);

        coordinator.register(a);
        coordinator.step(0.1, &mut host);
        assert!(coordinator.session().unwrap().has_snapshot(a));
        assert_eq!(host.characters[&a].movement_state(), MovementState::Rotating);

        run_to_end(&mut coordinator, &mut host);
        let p = host.characters[&a].position();
        assert_abs_diff_eq!(p.z, -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_environment_turns_by_quarter() {
        let mut host = Host::default();
        let prop = EntityId::new(9, 0);
        host.props.insert(prop, Transform::from_position(Vec3::new(0.0, 0.0, 4.0)));
        let mut coordinator = TowerRotationCoordinator::default();
        coordinator.register_environment(prop);
        coordinator.start_turn(TurnRequest::new(Vec3::ZERO, 1, 0.3), &mut host).unwrap();
        run_to_end(&mut coordinator, &mut host);

        let p = host.props[&prop].position;
        assert_abs_diff_eq!(p.x, 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_far_corner_does_not_turn() {
        let coordinator = TowerRotationCoordinator::default();
        assert_eq!(
            coordinator.request_for_corner(Corner::SouthWest),
            Err(TurnError::NoTurn { corner: Corner::SouthWest, facing: Facing::North })
        );
    }
}
