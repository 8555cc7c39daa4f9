//! Patrol and combat decisions for NPCs
//!
//! The controller never moves its character. It looks at the character,
//! the target and the physics world and returns a [`MovementIntent`], the
//! same way the player controller does.

use crate::config::NpcConfig;
use crate::state_machine::{State, StateMachine};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use spire_character::{Character, IntentSource, MovementIntent, MovementState, Senses, TargetInfo};
use spire_core::Countdown;
use spire_math::{MovementLine, Quat, Vec3};
use spire_physics::LayerMask;

/// Top-level NPC behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcState {
    Patrol,
    Combat,
}

impl State for NpcState {}

/// Snapshot the NPC state machine decides on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NpcContext {
    pub target_visible: bool,
    /// Distance to a live target
    pub target_distance: Option<f32>,
}

/// Where the patrol loop is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolPhase {
    /// Looking for a point in line of sight, retried every tick
    Choosing,
    /// Walking to a line-space parameter
    Moving { param: f32 },
    /// Waiting at the last target
    Idle(Countdown),
}

/// Intent source for line-bound NPCs
pub struct NpcController {
    config: NpcConfig,
    line: MovementLine,
    fsm: StateMachine<NpcState, NpcContext>,
    /// Line-space parameter where the NPC started
    start_param: Option<f32>,
    patrol: PatrolPhase,
    /// Standoff point, as a line-space parameter
    combat_target: Option<f32>,
    seeking_cover: bool,
}

impl NpcController {
    /// Patrol `line`, closed into a loop if it is open
    pub fn new(line: MovementLine, config: NpcConfig) -> Self {
        let mut fsm = StateMachine::new(NpcState::Patrol);
        fsm.add_transition(NpcState::Patrol, NpcState::Combat, |c: &NpcContext| c.target_visible);
        let max_pursue = config.max_pursue_distance;
        fsm.add_transition(NpcState::Combat, NpcState::Patrol, move |c: &NpcContext| {
            c.target_distance.map_or(true, |d| d > max_pursue)
        });

        Self {
            config,
            line: line.closed(),
            fsm,
            start_param: None,
            patrol: PatrolPhase::Choosing,
            combat_target: None,
            seeking_cover: false,
        }
    }

    pub fn config(&self) -> &NpcConfig {
        &self.config
    }

    pub fn line(&self) -> &MovementLine {
        &self.line
    }

    pub fn state(&self) -> NpcState {
        self.fsm.current()
    }

    pub fn patrol_phase(&self) -> PatrolPhase {
        self.patrol
    }

    /// Line-space parameter recorded on the first decision
    pub fn start_param(&self) -> Option<f32> {
        self.start_param
    }

    /// Current standoff point in world space
    pub fn combat_target(&self) -> Option<Vec3> {
        self.combat_target.map(|p| self.line.interpolate(p))
    }

    /// Patrol target in world space, while walking to one
    pub fn patrol_target(&self) -> Option<Vec3> {
        match self.patrol {
            PatrolPhase::Moving { param } => Some(self.line.interpolate(param)),
            _ => None,
        }
    }

    pub fn is_seeking_cover(&self) -> bool {
        self.seeking_cover
    }

    /// Follow a tower turn. Targets are line-space parameters, so they stay
    /// valid.
    pub fn rotate_line(&mut self, pivot: Vec3, rotation: Quat) {
        self.line.rotate_around(pivot, rotation);
    }

    // ------------------------------------------------------------------
    // Line helpers
    // ------------------------------------------------------------------

    fn param_of(&self, point: Vec3) -> f32 {
        self.line.reverse_interpolate(self.line.closest_point_on_line(point))
    }

    /// Signed line-space distance from `from` to `to`, the short way round
    /// on cyclic lines
    fn param_delta(&self, from: f32, to: f32) -> f32 {
        let delta = to - from;
        if self.line.is_cyclic() {
            (delta + 0.5).rem_euclid(1.0) - 0.5
        } else {
            delta
        }
    }

    fn arrived(&self, here: f32, param: f32) -> bool {
        self.param_delta(here, param).abs() * self.line.total_length() <= self.config.arrival_tolerance
    }

    /// Axis input that walks `me` toward `param` at `speed`
    fn axis_toward(&self, me: &Character, param: f32, speed: f32) -> f32 {
        let here = self.param_of(me.position());
        let delta = self.param_delta(here, param);
        let along = self.line.tangent_at(here).dot(me.axis());
        let direction = if along.abs() > 1e-3 {
            delta.signum() * along.signum()
        } else {
            (self.line.interpolate(param) - me.position()).dot(me.axis()).signum()
        };
        direction * speed
    }

    /// Whether a ray at eye height from `me` to the line point at `param`
    /// is free of `mask`
    fn clear_path(&self, me: &Character, param: f32, senses: &Senses<'_>, mask: LayerMask) -> bool {
        let eye = me.chest();
        let height = eye.y - me.position().y;
        let point = self.line.interpolate(param) + Vec3::Y * height;
        !senses.physics.blocked(eye, point, mask)
    }

    // ------------------------------------------------------------------
    // Patrol
    // ------------------------------------------------------------------

    fn patrol(&mut self, me: &Character, senses: &Senses<'_>, rng: &mut dyn RngCore) -> MovementIntent {
        match self.patrol {
            PatrolPhase::Idle(mut wait) => {
                wait.tick(senses.delta_time);
                self.patrol = if wait.is_finished() {
                    PatrolPhase::Choosing
                } else {
                    PatrolPhase::Idle(wait)
                };
                MovementIntent::default()
            }
            PatrolPhase::Choosing => {
                let start = self.start_param.unwrap_or_else(|| self.param_of(me.position()));
                let offset = rng.gen_range(-0.5f32..=0.5) * self.config.patrol_distance;
                let param = self.line.wrap(start + self.line.world_offset_to_line_space(offset));

                if !self.clear_path(me, param, senses, self.config.vision.occluders) {
                    log::trace!("{} patrol point {:.2} out of sight, retrying", me.id(), param);
                    return MovementIntent::default();
                }

                self.patrol = PatrolPhase::Moving { param };
                MovementIntent::walk(self.axis_toward(me, param, self.config.patrol_speed))
            }
            PatrolPhase::Moving { param } => {
                if self.arrived(self.param_of(me.position()), param) {
                    self.patrol = PatrolPhase::Idle(Countdown::new(self.config.patrol_wait));
                    return MovementIntent::default();
                }
                MovementIntent::walk(self.axis_toward(me, param, self.config.patrol_speed))
            }
        }
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    fn combat(
        &mut self,
        me: &Character,
        target: &TargetInfo,
        visible: bool,
        senses: &Senses<'_>,
        rng: &mut dyn RngCore,
    ) -> MovementIntent {
        let mut intent = MovementIntent::default();
        let toward = (target.position - me.position()).dot(me.axis()).signum();
        intent.aim = Some(toward);
        let distance = me.chest().distance(target.position);

        match me.movement_state() {
            MovementState::Cover => {
                self.seeking_cover = false;
                if let Some(cover) = me.active_cover() {
                    let to_cover = (cover.center - me.position()).with_y(0.0).normalize_or_zero();
                    let to_threat = (target.position - me.position()).with_y(0.0).normalize_or_zero();
                    if to_cover.dot(to_threat) < self.config.cover_threat_dot {
                        log::debug!("{} leaving cover, threat is behind it", me.id());
                        intent.leave_cover = true;
                    }
                }
            }
            // Ride the slide out. The character ends it on low speed or
            // lost footing.
            MovementState::Slide => {}
            _ => {
                self.seeking_cover = false;
                if visible && self.cover_ahead(me, toward, distance, senses) {
                    log::debug!("{} sliding for cover", me.id());
                    intent.slide = true;
                    self.seeking_cover = true;
                } else {
                    intent.axis = self.reposition(me, target, senses);
                }
            }
        }

        if visible && distance <= self.config.fire_range && rng.gen::<f32>() < self.config.fire_chance {
            intent.fire = true;
        }
        intent
    }

    /// Cover raycast toward the threat, only worth it on foot and not
    /// already on top of the target
    fn cover_ahead(&self, me: &Character, toward: f32, distance: f32, senses: &Senses<'_>) -> bool {
        if me.movement_state() != MovementState::Walk || !me.is_grounded() {
            return false;
        }
        if distance <= self.config.min_cover_target_distance || me.horizontal_speed() * toward < 0.0 {
            return false;
        }
        let origin = me.position() + Vec3::Y * me.config().probe_height;
        senses
            .physics
            .raycast(origin, me.axis() * toward, self.config.cover_seek_distance, self.config.cover_mask)
            .map_or(false, |hit| hit.distance > me.config().body_radius && hit.distance < distance)
    }

    /// Keep the standoff distance. A new point is only picked once the
    /// current one is reached and the gap has left the band.
    fn reposition(&mut self, me: &Character, target: &TargetInfo, senses: &Senses<'_>) -> f32 {
        let here = self.param_of(me.position());
        let threat = self.param_of(target.position);
        let gap = self.param_delta(threat, here) * self.line.total_length();

        let reached = self.combat_target.map_or(true, |p| self.arrived(here, p));
        if reached && !self.config.in_standoff_band(gap.abs()) {
            self.combat_target = Some(self.choose_standoff(me, threat, gap, senses));
        }

        match self.combat_target {
            Some(param) if !self.arrived(here, param) => self.axis_toward(me, param, self.config.combat_speed),
            _ => 0.0,
        }
    }

    fn choose_standoff(&self, me: &Character, threat: f32, gap: f32, senses: &Senses<'_>) -> f32 {
        let side = if gap.abs() > f32::EPSILON { gap.signum() } else { 1.0 };
        let offset = self.line.world_offset_to_line_space(self.config.maintain_distance);
        let preferred = self.line.wrap(threat + side * offset);
        if self.clear_path(me, preferred, senses, self.config.reach_blockers) {
            return preferred;
        }
        log::debug!("{} standoff point blocked, flanking", me.id());
        self.line.wrap(threat - side * offset)
    }

    fn on_state_change(&mut self, me: &Character, state: NpcState) {
        self.combat_target = None;
        self.seeking_cover = false;
        match state {
            NpcState::Combat => log::debug!("{} engaging", me.id()),
            NpcState::Patrol => {
                log::debug!("{} lost its target, patrolling", me.id());
                self.patrol = PatrolPhase::Choosing;
            }
        }
    }
}

impl IntentSource for NpcController {
    fn decide(&mut self, me: &Character, senses: &Senses<'_>, rng: &mut dyn RngCore) -> MovementIntent {
        if !me.is_enabled() || !me.is_alive() {
            return MovementIntent::default();
        }
        if self.start_param.is_none() {
            self.start_param = Some(self.param_of(me.position()));
        }

        let in_combat = self.fsm.is_in(NpcState::Combat);
        let target = senses.target.filter(|t| t.alive);
        let visible = target.map_or(false, |t| self.config.vision.can_see(me, &t, senses.physics, in_combat));
        let context = NpcContext {
            target_visible: visible,
            target_distance: target.map(|t| me.chest().distance(t.position)),
        };
        if let Some(state) = self.fsm.update(&context) {
            self.on_state_change(me, state);
        }

        if matches!(
            me.movement_state(),
            MovementState::Immobile | MovementState::Teleporting | MovementState::Rotating
        ) {
            return MovementIntent::default();
        }

        match (self.fsm.current(), target) {
            (NpcState::Combat, Some(target)) => self.combat(me, &target, visible, senses, rng),
            (NpcState::Combat, None) => MovementIntent::default(),
            (NpcState::Patrol, _) => self.patrol(me, senses, rng),
        }
    }
}
