//! The character state machine shared by players and NPCs

use crate::config::CharacterConfig;
use crate::intent::{MovementIntent, AXIS_DEADZONE};
use crate::presentation::{lerp_tint, AnimTag, PresentationState, TINT_FADED, TINT_NORMAL};
use crate::state::{AxisModel, MovementState};
use rand::Rng;
use spire_combat::{
    Allegiance, AliveState, DamageInfo, DamageType, HealthComponent, HealthEvent, HitBox, Landing,
    Spawner, WeaponComponent,
};
use spire_core::{Countdown, EntityId};
use spire_math::{move_towards, Quat, Transform, Vec3};
use spire_physics::{ground_probe, ContactEvent, PhysicsQuery, ZoneContact, ZoneKind};

/// Horizontal speeds below this count as standing still
const STILL_SPEED: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TeleportPhase {
    FadeOut { timer: Countdown, destination: Vec3 },
    FadeIn { timer: Countdown },
}

/// A player or NPC body.
///
/// Holds locomotion state, health, hitboxes and the optional weapon. All
/// timed behavior (stun, cover exposure, teleport fades) is countdown state
/// advanced by [`fixed_update`](Self::fixed_update). Controllers never move
/// the character directly; they hand it a [`MovementIntent`].
#[derive(Debug, Clone)]
pub struct Character {
    id: EntityId,
    enabled: bool,
    transform: Transform,
    velocity: Vec3,
    state: MovementState,
    health: HealthComponent,
    allegiance: Allegiance,
    hitboxes: Vec<HitBox>,
    weapon: Option<WeaponComponent>,
    axis_model: AxisModel,
    config: CharacterConfig,

    /// +1 or -1 along the horizontal axis
    facing: f32,
    grounded: bool,
    previous_vertical_velocity: f32,
    /// Horizontal speed cap carried from a slide into a jump
    slide_exit_clamp: Option<f32>,

    active_cover: Option<ZoneContact>,
    exposure: Option<Countdown>,
    stun: Option<Countdown>,
    teleport: Option<TeleportPhase>,
    last_teleport_destination: Option<Vec3>,
    teleport_pad: Option<ZoneContact>,
    corner: Option<ZoneContact>,

    presentation: PresentationState,
}

impl Character {
    /// Create an enabled character with no hitboxes and no weapon.
    ///
    /// Most callers want [`CharacterBuilder`](crate::CharacterBuilder).
    pub fn new(id: EntityId, transform: Transform, allegiance: Allegiance, config: CharacterConfig) -> Self {
        let health = HealthComponent::new(config.max_health).with_wounded_threshold(config.wounded_threshold);
        Self {
            id,
            enabled: true,
            transform,
            velocity: Vec3::ZERO,
            state: MovementState::Walk,
            health,
            allegiance,
            hitboxes: Vec::new(),
            weapon: None,
            axis_model: AxisModel::default(),
            config,
            facing: 1.0,
            grounded: false,
            previous_vertical_velocity: 0.0,
            slide_exit_clamp: None,
            active_cover: None,
            exposure: None,
            stun: None,
            teleport: None,
            last_teleport_destination: None,
            teleport_pad: None,
            corner: None,
            presentation: PresentationState::default(),
        }
    }

    pub(crate) fn set_axis_model(&mut self, axis_model: AxisModel) {
        self.axis_model = axis_model;
    }

    pub(crate) fn push_hitbox(&mut self, hitbox: HitBox) {
        self.hitboxes.push(hitbox);
    }

    pub(crate) fn set_weapon(&mut self, weapon: WeaponComponent) {
        self.weapon = Some(weapon);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Disabled characters ignore ticks and contact events
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Overwrite the transform (used by the rotation coordinator)
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn movement_state(&self) -> MovementState {
        self.state
    }

    pub fn alive_state(&self) -> AliveState {
        self.health.state()
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }

    pub fn health(&self) -> &HealthComponent {
        &self.health
    }

    pub fn allegiance(&self) -> Allegiance {
        self.allegiance
    }

    pub fn hitboxes(&self) -> &[HitBox] {
        &self.hitboxes
    }

    pub fn weapon(&self) -> Option<&WeaponComponent> {
        self.weapon.as_ref()
    }

    pub fn weapon_mut(&mut self) -> Option<&mut WeaponComponent> {
        self.weapon.as_mut()
    }

    pub fn axis_model(&self) -> AxisModel {
        self.axis_model
    }

    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }

    /// +1 when facing along the horizontal axis, -1 when facing against it
    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Inside the shoot-from-cover window
    pub fn is_exposed(&self) -> bool {
        self.exposure.is_some()
    }

    pub fn is_teleporting(&self) -> bool {
        self.teleport.is_some()
    }

    /// Cover volume last entered
    pub fn active_cover(&self) -> Option<&ZoneContact> {
        self.active_cover.as_ref()
    }

    /// Manual teleporter pad currently underfoot
    pub fn teleport_pad(&self) -> Option<&ZoneContact> {
        self.teleport_pad.as_ref()
    }

    /// Tower corner currently underfoot
    pub fn corner(&self) -> Option<&ZoneContact> {
        self.corner.as_ref()
    }

    pub fn presentation(&self) -> &PresentationState {
        &self.presentation
    }

    /// Unit horizontal movement axis
    pub fn axis(&self) -> Vec3 {
        self.axis_model.horizontal_axis(&self.transform)
    }

    /// Signed speed along the horizontal axis
    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.along(self.axis())
    }

    /// Center of the body, used for aiming and line of sight
    pub fn chest(&self) -> Vec3 {
        self.transform.position + Vec3::Y * self.config.chest_height
    }

    /// Weapon muzzle: at chest height, local X pointing the way the
    /// character faces.
    pub fn muzzle(&self) -> Transform {
        let base = match self.axis_model {
            AxisModel::Planar => Quat::IDENTITY,
            AxisModel::Ring => self.transform.rotation,
        };
        let rotation = if self.facing < 0.0 {
            base * Quat::from_rotation_y(core::f32::consts::PI)
        } else {
            base
        };
        Transform::new(self.chest(), rotation)
    }

    // ------------------------------------------------------------------
    // Fixed update
    // ------------------------------------------------------------------

    /// Advance one fixed physics step.
    ///
    /// Order: timers, ground probe, landing, intent, per-state movement,
    /// gravity, integration, presentation.
    pub fn fixed_update<R: Rng + ?Sized>(
        &mut self,
        delta_time: f32,
        physics: &dyn PhysicsQuery,
        intent: &MovementIntent,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        if !self.enabled {
            return;
        }

        self.tick_timers(delta_time, spawner, rng);

        match self.state {
            MovementState::Rotating => {
                self.update_presentation();
                return;
            }
            MovementState::Teleporting => {
                self.velocity = Vec3::ZERO;
                self.update_presentation();
                return;
            }
            _ => {}
        }

        self.probe_ground(physics);

        if self.state == MovementState::Dead {
            let axis = self.axis();
            self.velocity = self.velocity.with_component_along(axis, 0.0);
        } else {
            self.update_locomotion_state();
            if self.grounded {
                self.evaluate_landing();
            }
            if self.state != MovementState::Dead {
                self.apply_intent(intent, spawner, rng);
                self.apply_state_movement(intent.axis, delta_time);
            }
        }

        if !self.grounded {
            self.velocity.y = (self.velocity.y + self.config.gravity * delta_time).max(-self.config.max_fall_speed);
        }
        self.integrate(delta_time, physics);
        self.previous_vertical_velocity = self.velocity.y;

        self.update_presentation();
    }

    fn tick_timers<R: Rng + ?Sized>(&mut self, delta_time: f32, spawner: &mut dyn Spawner, rng: &mut R) {
        if let Some(mut stun) = self.stun.take() {
            stun.tick(delta_time);
            if stun.is_finished() {
                // Only recover if nothing else took over meanwhile
                if self.state == MovementState::Immobile && self.is_alive() {
                    self.state = MovementState::Walk;
                    self.set_shooting(true);
                    log::debug!("{} recovered from stun", self.id);
                }
            } else {
                self.stun = Some(stun);
            }
        }

        if let Some(mut exposure) = self.exposure.take() {
            exposure.tick(delta_time);
            if exposure.is_finished() {
                if self.state == MovementState::Cover {
                    self.hide();
                }
            } else {
                self.exposure = Some(exposure);
            }
        }

        match self.teleport.take() {
            Some(TeleportPhase::FadeOut { mut timer, destination }) => {
                timer.tick(delta_time);
                if timer.is_finished() {
                    self.transform.position = destination;
                    self.velocity = Vec3::ZERO;
                    self.last_teleport_destination = Some(destination);
                    self.teleport = Some(TeleportPhase::FadeIn {
                        timer: Countdown::new(self.config.teleport_speed * 0.5),
                    });
                    log::trace!("{} arrived at {:?}", self.id, destination);
                } else {
                    self.teleport = Some(TeleportPhase::FadeOut { timer, destination });
                }
            }
            Some(TeleportPhase::FadeIn { mut timer }) => {
                timer.tick(delta_time);
                if timer.is_finished() {
                    if self.state == MovementState::Teleporting {
                        self.state = MovementState::Walk;
                    }
                } else {
                    self.teleport = Some(TeleportPhase::FadeIn { timer });
                }
            }
            None => {}
        }

        let muzzle = self.muzzle();
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.update(delta_time, &muzzle, spawner, rng);
        }
    }

    fn probe_ground(&mut self, physics: &dyn PhysicsQuery) {
        let config = &self.config;
        let pivot = self.transform.position + Vec3::Y * config.probe_height;
        let side = self.axis() * config.probe_side;
        let hit = ground_probe(
            physics,
            pivot,
            side,
            config.probe_height + config.probe_margin,
            config.ground_mask,
        );

        // Rising characters are never grounded, even right above the floor
        self.grounded = match hit {
            Some(hit) if self.velocity.y <= 0.0 => {
                self.transform.position.y = hit.point.y;
                true
            }
            _ => false,
        };
    }

    fn update_locomotion_state(&mut self) {
        match self.state {
            MovementState::Walk if !self.grounded => {
                self.state = MovementState::Jump;
                self.slide_exit_clamp = None;
            }
            MovementState::Jump if self.grounded => {
                self.state = MovementState::Walk;
                self.slide_exit_clamp = None;
            }
            MovementState::Slide if !self.grounded => {
                self.slide_exit_clamp = Some(self.horizontal_speed().abs());
                self.state = MovementState::Jump;
            }
            _ => {}
        }
    }

    /// Classify the landing from the previous step's vertical velocity
    fn evaluate_landing(&mut self) {
        match self.config.fall.classify(self.previous_vertical_velocity) {
            Landing::Soft => {}
            Landing::Slide => {
                if matches!(self.state, MovementState::Walk | MovementState::Jump | MovementState::Slide) {
                    log::debug!("{} hard landing at {:.1} m/s, sliding", self.id, self.previous_vertical_velocity);
                    self.force_slide();
                }
            }
            Landing::Fatal => {
                self.velocity.y = 0.0;
                self.kill(DamageType::Fall);
            }
        }
        self.velocity.y = 0.0;
    }

    fn apply_intent<R: Rng + ?Sized>(&mut self, intent: &MovementIntent, spawner: &mut dyn Spawner, rng: &mut R) {
        if !self.state.is_locked() {
            if let Some(aim) = intent.aim.filter(|a| *a != 0.0) {
                self.facing = aim.signum();
            } else if intent.axis.abs() > AXIS_DEADZONE {
                self.facing = intent.axis.signum();
            }
        }

        match self.state {
            MovementState::Cover => {
                if intent.leave_cover {
                    self.leave_cover();
                }
            }
            MovementState::Walk | MovementState::Jump | MovementState::Slide => {
                if intent.slide {
                    self.start_slide();
                }
                if intent.jump {
                    self.jump();
                }
            }
            _ => {}
        }

        if intent.teleport {
            if let Some(ZoneKind::Teleporter { destination, .. }) = self.teleport_pad.map(|pad| pad.kind) {
                self.teleport(destination);
                return;
            }
        }

        self.apply_weapon_intent(intent, spawner, rng);
    }

    fn apply_weapon_intent<R: Rng + ?Sized>(&mut self, intent: &MovementIntent, spawner: &mut dyn Spawner, rng: &mut R) {
        if !matches!(
            self.state,
            MovementState::Walk | MovementState::Jump | MovementState::Slide | MovementState::Cover
        ) {
            return;
        }

        if intent.wants_fire() && self.state == MovementState::Cover {
            self.shoot_from_cover();
        }

        let muzzle = self.muzzle();
        let Some(weapon) = self.weapon.as_mut() else {
            return;
        };
        if intent.reload {
            weapon.reload();
        }
        if intent.wants_fire() {
            // A fresh press wins over a held trigger
            weapon.fire(!intent.fire, &muzzle, spawner, rng);
        } else if weapon.is_trigger_held() {
            weapon.release_trigger();
        }
    }

    fn apply_state_movement(&mut self, input: f32, delta_time: f32) {
        let axis = self.axis();
        match self.state {
            MovementState::Walk => self.move_mechanics(self.grounded, input, None, delta_time),
            MovementState::Jump => self.move_mechanics(self.grounded, input, self.slide_exit_clamp, delta_time),
            MovementState::Slide => {
                let speed = self.horizontal_speed();
                let slowed = move_towards(speed, 0.0, self.config.slide_friction * delta_time);
                self.velocity = self.velocity.with_component_along(axis, slowed);
                if slowed.abs() < self.config.slide_min_speed {
                    self.state = MovementState::Walk;
                }
            }
            MovementState::Cover => {
                self.velocity = self.velocity.with_component_along(axis, 0.0);
            }
            MovementState::Immobile => {
                let slowed = move_towards(self.horizontal_speed(), 0.0, self.config.ground_acceleration * delta_time);
                self.velocity = self.velocity.with_component_along(axis, slowed);
            }
            MovementState::Dead | MovementState::Teleporting | MovementState::Rotating => {}
        }
    }

    /// Move the position by the velocity, stopping at walls and floors
    fn integrate(&mut self, delta_time: f32, physics: &dyn PhysicsQuery) {
        let axis = self.axis();
        let position = self.transform.position;
        let mut step = self.velocity * delta_time;

        let horizontal = step.along(axis);
        if horizontal.abs() > f32::EPSILON {
            let direction = axis * horizontal.signum();
            let reach = horizontal.abs() + self.config.body_radius;
            if let Some(hit) = physics.raycast(self.chest(), direction, reach, self.config.wall_mask) {
                let allowed = (hit.distance - self.config.body_radius).max(0.0);
                step = step.with_component_along(axis, allowed * horizontal.signum());
                self.velocity = self.velocity.with_component_along(axis, 0.0);
            }
        }

        if step.y < 0.0 {
            let origin = position + Vec3::Y * self.config.probe_height;
            let reach = self.config.probe_height - step.y;
            if let Some(hit) = physics.raycast(origin, Vec3::NEG_Y, reach, self.config.ground_mask) {
                step.y = hit.point.y - position.y;
            }
        }

        self.transform.position = position + step;
    }

    fn update_presentation(&mut self) {
        let tag = match self.state {
            MovementState::Dead => AnimTag::Dead(self.health.state()),
            MovementState::Walk if self.horizontal_speed().abs() > STILL_SPEED => AnimTag::Run,
            MovementState::Walk => AnimTag::Idle,
            MovementState::Jump if self.velocity.y > 0.0 => AnimTag::Jump,
            MovementState::Jump => AnimTag::Fall,
            MovementState::Slide => AnimTag::Slide,
            MovementState::Cover if self.is_exposed() => AnimTag::CoverShoot,
            MovementState::Cover => AnimTag::Cover,
            MovementState::Immobile => AnimTag::Stunned,
            MovementState::Teleporting => AnimTag::Teleport,
            MovementState::Rotating => AnimTag::Rotating,
        };

        let tint = match &self.teleport {
            Some(TeleportPhase::FadeOut { timer, .. }) => lerp_tint(TINT_NORMAL, TINT_FADED, timer.progress()),
            Some(TeleportPhase::FadeIn { timer }) => lerp_tint(TINT_FADED, TINT_NORMAL, timer.progress()),
            None => TINT_NORMAL,
        };

        self.presentation = PresentationState {
            tag,
            flip_x: self.facing < 0.0,
            tint,
        };
    }

    // ------------------------------------------------------------------
    // Locomotion
    // ------------------------------------------------------------------

    /// Steer horizontal velocity toward the input.
    ///
    /// Wounded characters walk slower. `exit_clamp` caps the resulting speed
    /// after jumping out of a slide.
    pub fn move_mechanics(&mut self, grounded: bool, input: f32, exit_clamp: Option<f32>, delta_time: f32) {
        let axis = self.axis();
        let mut top_speed = self.config.walk_speed;
        if self.health.state() == AliveState::Wounded {
            top_speed *= self.config.wounded_speed_multiplier;
        }

        let target = input.clamp(-1.0, 1.0) * top_speed;
        let acceleration = if grounded {
            self.config.ground_acceleration
        } else {
            self.config.air_acceleration
        };

        let mut speed = move_towards(self.horizontal_speed(), target, acceleration * delta_time);
        if let Some(clamp) = exit_clamp {
            speed = speed.clamp(-clamp, clamp);
        }
        self.velocity = self.velocity.with_component_along(axis, speed);
    }

    /// Start a slide from walking on the ground
    pub fn start_slide(&mut self) -> bool {
        if self.state != MovementState::Walk || !self.grounded {
            return false;
        }
        self.force_slide();
        true
    }

    fn force_slide(&mut self) {
        let current = self.horizontal_speed();
        let direction = if current.abs() > STILL_SPEED { current.signum() } else { self.facing };
        let speed = current.abs().max(self.config.slide_speed);
        let axis = self.axis();
        self.velocity = self.velocity.with_component_along(axis, direction * speed);
        self.state = MovementState::Slide;
        log::debug!("{} slide", self.id);
    }

    /// Jump from the ground. A jump out of a slide keeps the slide's speed as
    /// its horizontal cap.
    pub fn jump(&mut self) -> bool {
        if !self.grounded || !matches!(self.state, MovementState::Walk | MovementState::Slide) {
            return false;
        }
        self.slide_exit_clamp = if self.state == MovementState::Slide {
            Some(self.horizontal_speed().abs())
        } else {
            None
        };
        self.velocity.y = self.config.jump_velocity;
        self.grounded = false;
        self.state = MovementState::Jump;
        true
    }

    /// Start a two-phase teleport to `destination`.
    ///
    /// Rejected while a teleport is in flight, while dead, stunned or
    /// rotating.
    pub fn teleport(&mut self, destination: Vec3) -> bool {
        if self.teleport.is_some() {
            log::debug!("{} teleport rejected, already in flight", self.id);
            return false;
        }
        if matches!(
            self.state,
            MovementState::Dead | MovementState::Immobile | MovementState::Rotating
        ) {
            log::debug!("{} teleport rejected in {:?}", self.id, self.state);
            return false;
        }

        if self.state == MovementState::Cover {
            self.leave_cover();
        }
        self.release_trigger();
        self.velocity = Vec3::ZERO;
        self.slide_exit_clamp = None;
        self.state = MovementState::Teleporting;
        self.teleport = Some(TeleportPhase::FadeOut {
            timer: Countdown::new(self.config.teleport_speed * 0.5),
            destination,
        });
        log::debug!("{} teleporting to {:?}", self.id, destination);
        true
    }

    // ------------------------------------------------------------------
    // Cover
    // ------------------------------------------------------------------

    /// Enter a cover volume. Only works while sliding, and never for the
    /// volume already in use.
    pub fn hit_cover(&mut self, cover: ZoneContact) -> bool {
        if self.state != MovementState::Slide {
            return false;
        }
        if self.active_cover.map(|c| c.zone) == Some(cover.zone) {
            return false;
        }

        self.active_cover = Some(cover);
        self.state = MovementState::Cover;
        let axis = self.axis();
        self.velocity = self.velocity.with_component_along(axis, 0.0);
        self.exposure = None;
        self.hide();
        log::debug!("{} took cover behind {}", self.id, cover.zone);
        true
    }

    /// Step out of cover
    pub fn leave_cover(&mut self) -> bool {
        if self.state != MovementState::Cover {
            return false;
        }
        self.exposure = None;
        self.set_hitboxes_enabled(true);
        self.set_shooting(true);
        self.state = if self.grounded {
            MovementState::Walk
        } else {
            MovementState::Jump
        };
        log::debug!("{} left cover", self.id);
        true
    }

    /// Open (or restart) the exposure window in which the character can be
    /// hit and can shoot.
    pub fn shoot_from_cover(&mut self) -> bool {
        if self.state != MovementState::Cover {
            return false;
        }
        match self.exposure.as_mut() {
            Some(exposure) => exposure.restart(),
            None => self.exposure = Some(Countdown::new(self.config.cover_exposure_duration)),
        }
        self.set_hitboxes_enabled(true);
        self.set_shooting(true);
        true
    }

    fn hide(&mut self) {
        self.set_hitboxes_enabled(false);
        self.set_shooting(false);
    }

    // ------------------------------------------------------------------
    // Stun and collisions
    // ------------------------------------------------------------------

    /// Knock the character down for the configured stun duration
    pub fn stun(&mut self) -> bool {
        if !self.is_alive() || matches!(self.state, MovementState::Teleporting | MovementState::Rotating) {
            return false;
        }
        if self.state == MovementState::Cover {
            self.leave_cover();
        }
        self.state = MovementState::Immobile;
        self.slide_exit_clamp = None;
        self.set_shooting(false);
        self.stun = Some(Countdown::new(self.config.stun_duration));
        log::debug!("{} stunned for {}s", self.id, self.config.stun_duration);
        true
    }

    /// Another character ran into this one. Only a sliding collider stuns.
    pub fn hit_character(&mut self, other_sliding: bool) -> bool {
        if !other_sliding {
            return false;
        }
        self.stun()
    }

    // ------------------------------------------------------------------
    // Health
    // ------------------------------------------------------------------

    /// Route a hit through hitbox `index`. False when the hitbox does not
    /// exist, is disabled, filters the hit, or the character is already dead.
    pub fn receive_hit(&mut self, index: usize, damage: &DamageInfo) -> bool {
        let Some(resolved) = self.hitboxes.get(index).and_then(|h| h.resolve(damage)) else {
            return false;
        };
        !matches!(self.damage(resolved.amount, resolved.damage_type), HealthEvent::Ignored)
    }

    /// Apply raw damage, bypassing hitboxes
    pub fn damage(&mut self, amount: f32, damage_type: DamageType) -> HealthEvent {
        let event = self.health.apply_damage(amount, damage_type);
        self.on_health_event(event);
        event
    }

    /// Kill outright
    pub fn kill(&mut self, damage_type: DamageType) -> HealthEvent {
        let event = self.health.kill(damage_type);
        self.on_health_event(event);
        event
    }

    pub fn heal(&mut self, amount: f32) -> HealthEvent {
        self.health.heal(amount)
    }

    fn on_health_event(&mut self, event: HealthEvent) {
        match event {
            HealthEvent::Died { cause, state } => {
                log::debug!("{} died ({:?} -> {:?})", self.id, cause, state);
                self.die();
            }
            HealthEvent::Wounded { health, .. } => {
                log::debug!("{} wounded, {:.1} health left", self.id, health);
            }
            _ => {}
        }
    }

    fn die(&mut self) {
        self.state = MovementState::Dead;
        let axis = self.axis();
        self.velocity = self.velocity.with_component_along(axis, 0.0);
        self.stun = None;
        self.exposure = None;
        self.teleport = None;
        self.slide_exit_clamp = None;
        self.set_hitboxes_enabled(false);
        self.release_trigger();
        self.set_shooting(false);
    }

    // ------------------------------------------------------------------
    // Tower rotation hooks
    // ------------------------------------------------------------------

    /// Lock the character for a rotation session. Any other lock is
    /// released first; a pending teleport is cancelled in place. Dead
    /// characters stay Dead but are still driven by the session.
    pub fn begin_rotation(&mut self) {
        match self.state {
            MovementState::Dead => return,
            MovementState::Cover => {
                self.leave_cover();
            }
            MovementState::Immobile => {
                self.stun = None;
                self.set_shooting(true);
            }
            _ => {}
        }
        self.teleport = None;
        self.exposure = None;
        self.slide_exit_clamp = None;
        self.velocity = Vec3::ZERO;
        self.release_trigger();
        self.state = MovementState::Rotating;
        self.update_presentation();
    }

    /// Release the rotation lock back to Walk or Jump
    pub fn end_rotation(&mut self) {
        if self.state != MovementState::Rotating {
            return;
        }
        self.state = if self.grounded {
            MovementState::Walk
        } else {
            MovementState::Jump
        };
        self.update_presentation();
    }

    // ------------------------------------------------------------------
    // Contact events
    // ------------------------------------------------------------------

    /// React to a trigger or collision event from the physics side
    pub fn handle_event(&mut self, event: &ContactEvent) {
        if !self.enabled {
            return;
        }

        match *event {
            ContactEvent::ZoneEnter(contact) => self.zone_overlap(contact, true),
            ContactEvent::ZoneStay(contact) => self.zone_overlap(contact, false),
            ContactEvent::ZoneExit(contact) => self.zone_exit(contact),
            ContactEvent::CharacterHit { other_sliding, .. } => {
                self.hit_character(other_sliding);
            }
        }
    }

    fn zone_overlap(&mut self, contact: ZoneContact, entered: bool) {
        match contact.kind {
            ZoneKind::Cover => {
                self.hit_cover(contact);
            }
            ZoneKind::Teleporter { destination, automatic: true } => {
                if !entered {
                    return;
                }
                let arrival = self
                    .last_teleport_destination
                    .is_some_and(|d| d.distance(contact.center) <= self.config.teleport_arrival_radius);
                if !arrival {
                    self.teleport(destination);
                }
            }
            ZoneKind::Teleporter { automatic: false, .. } => {
                self.teleport_pad = Some(contact);
            }
            ZoneKind::TowerCorner(_) => {
                self.corner = Some(contact);
            }
        }
    }

    fn zone_exit(&mut self, contact: ZoneContact) {
        match contact.kind {
            ZoneKind::Cover => {
                if self.active_cover.map(|c| c.zone) == Some(contact.zone) {
                    self.leave_cover();
                    self.active_cover = None;
                }
            }
            ZoneKind::Teleporter { .. } => {
                if self.teleport_pad.map(|p| p.zone) == Some(contact.zone) {
                    self.teleport_pad = None;
                }
                self.last_teleport_destination = None;
            }
            ZoneKind::TowerCorner(_) => {
                if self.corner.map(|c| c.zone) == Some(contact.zone) {
                    self.corner = None;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn set_hitboxes_enabled(&mut self, enabled: bool) {
        for hitbox in &mut self.hitboxes {
            hitbox.enabled = enabled;
        }
    }

    fn set_shooting(&mut self, enabled: bool) {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.set_shooting_enabled(enabled);
        }
    }

    fn release_trigger(&mut self) {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.release_trigger();
        }
    }
}
