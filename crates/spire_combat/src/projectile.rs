//! Projectiles: flight, damage timers and sub-projectiles

use crate::damage::{Allegiance, DamageInfo, DamageType};
use crate::spawner::{PrefabHandle, SpawnKind, SpawnRequest, Spawner};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spire_core::{Countdown, EntityId, Repeating};
use spire_math::{Quat, Vec3};
use std::collections::BTreeSet;

/// Repeat count used when a projectile is configured to damage "forever".
/// Large enough to outlive any lifetime, small enough to terminate.
pub const UNBOUNDED_REPEATS: u32 = 1_000_000;

/// Damage attenuation over distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Falloff {
    /// Full damage at any distance
    Binary,
    /// damage × clamp(1 / distance)
    LinearInterpolate,
    /// damage × clamp(1 / distance²)
    InverseSquared,
}

impl Falloff {
    /// Scale `damage` for a target `distance` away
    pub fn apply(self, damage: f32, distance: f32) -> f32 {
        let factor = match self {
            Self::Binary => 1.0,
            Self::LinearInterpolate => (1.0 / distance).clamp(0.0, 1.0),
            Self::InverseSquared => (1.0 / (distance * distance)).clamp(0.0, 1.0),
        };
        damage * factor
    }
}

impl Default for Falloff {
    fn default() -> Self {
        Self::Binary
    }
}

/// When a projectile spawns its sub-projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubProjectileTrigger {
    FirstContact,
    DamageTick,
    OnDestroy,
}

/// Sub-projectile spawned by a parent projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubProjectile {
    pub trigger: SubProjectileTrigger,
    pub config: Box<ProjectileConfig>,
}

/// Projectile tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub prefab: PrefabHandle,
    pub speed: f32,
    /// Vertical acceleration while flying (0 flies straight)
    pub gravity: f32,
    /// Fraction of speed lost per second
    pub drag: f32,
    pub lifetime: f32,
    /// Destroyed past this distance from the origin (0 = unlimited)
    pub max_range: f32,
    /// Destroyed below this speed (0 = never)
    pub min_speed: f32,
    /// Contact half-size used for hitbox overlap
    pub radius: f32,
    pub damage_low: f32,
    pub damage_high: f32,
    pub damage_type: DamageType,
    pub falloff: Falloff,
    /// Damage applications after the first hit; `<= 0` with a positive
    /// `repeat_time` repeats until destroyed
    pub repeat_count: i32,
    /// Seconds between repeated damage applications (0 = no repeats)
    pub repeat_time: f32,
    pub impact_vfx: Option<PrefabHandle>,
    pub sub_projectile: Option<SubProjectile>,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            prefab: PrefabHandle(0),
            speed: 30.0,
            gravity: 0.0,
            drag: 0.0,
            lifetime: 3.0,
            max_range: 0.0,
            min_speed: 0.0,
            radius: 0.1,
            damage_low: 10.0,
            damage_high: 10.0,
            damage_type: DamageType::Projectile,
            falloff: Falloff::Binary,
            repeat_count: 0,
            repeat_time: 0.0,
            impact_vfx: None,
            sub_projectile: None,
        }
    }
}

impl ProjectileConfig {
    /// Set speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set damage range
    pub fn with_damage(mut self, low: f32, high: f32, damage_type: DamageType) -> Self {
        self.damage_low = low;
        self.damage_high = high;
        self.damage_type = damage_type;
        self
    }

    /// Set repeat damage
    pub fn with_repeat(mut self, count: i32, interval: f32) -> Self {
        self.repeat_count = count;
        self.repeat_time = interval;
        self
    }

    /// Set lifetime
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Set falloff
    pub fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set sub-projectile
    pub fn with_sub_projectile(mut self, trigger: SubProjectileTrigger, config: ProjectileConfig) -> Self {
        self.sub_projectile = Some(SubProjectile {
            trigger,
            config: Box::new(config),
        });
        self
    }

    /// Number of repeat applications after the first hit
    pub fn repeats(&self) -> u32 {
        if self.repeat_time <= 0.0 {
            0
        } else if self.repeat_count <= 0 {
            UNBOUNDED_REPEATS
        } else {
            self.repeat_count as u32
        }
    }
}

/// A hitbox on a character, addressed by owner and index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitTarget {
    pub owner: EntityId,
    pub hitbox: usize,
}

/// Applies damage to whoever owns a hitbox
pub trait DamageReceiver {
    /// Apply damage to `target`; false when the hit was filtered out
    fn apply_hit(&mut self, target: HitTarget, damage: &DamageInfo) -> bool;
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    config: ProjectileConfig,
    allegiance: Allegiance,
    source: Option<EntityId>,
    origin: Vec3,
    position: Vec3,
    velocity: Vec3,
    damage: f32,
    lifetime: Countdown,
    repeats_left: u32,
    /// At most one damage timer per projectile
    damage_timer: Option<Repeating>,
    timer_target: Option<(HitTarget, f32)>,
    touching: BTreeSet<HitTarget>,
    contacted: bool,
    destroyed: bool,
}

impl Projectile {
    /// Spawn a projectile, resolving its damage within the configured range
    pub fn spawn<R: Rng + ?Sized>(
        config: &ProjectileConfig,
        allegiance: Allegiance,
        origin: Vec3,
        direction: Vec3,
        rng: &mut R,
    ) -> Self {
        let damage = if config.damage_high > config.damage_low {
            rng.gen_range(config.damage_low..=config.damage_high)
        } else {
            config.damage_low
        };

        Self {
            config: config.clone(),
            allegiance,
            source: None,
            origin,
            position: origin,
            velocity: direction.normalize_or_zero() * config.speed,
            damage,
            lifetime: Countdown::new(config.lifetime),
            repeats_left: config.repeats(),
            damage_timer: None,
            timer_target: None,
            touching: BTreeSet::new(),
            contacted: false,
            destroyed: false,
        }
    }

    /// Set the firing entity, which the projectile never hits
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn allegiance(&self) -> Allegiance {
        self.allegiance
    }

    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Straight-line distance from the spawn point
    pub fn travelled(&self) -> f32 {
        self.position.distance(self.origin)
    }

    /// Damage resolved at spawn
    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn repeats_left(&self) -> u32 {
        self.repeats_left
    }

    pub fn has_damage_timer(&self) -> bool {
        self.damage_timer.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Rotate flight state around a pivot (tower rotation)
    pub fn rotate_around(&mut self, pivot: Vec3, rotation: Quat) {
        self.origin = pivot + rotation * (self.origin - pivot);
        self.position = pivot + rotation * (self.position - pivot);
        self.velocity = rotation * self.velocity;
    }

    /// Report every hitbox currently overlapping. New overlaps are handled
    /// as contacts; targets no longer overlapping are forgotten.
    pub fn on_overlaps<R: Rng + ?Sized>(
        &mut self,
        overlaps: &[(HitTarget, f32)],
        receiver: &mut dyn DamageReceiver,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        let current: BTreeSet<HitTarget> = overlaps.iter().map(|(t, _)| *t).collect();
        for &(target, distance) in overlaps {
            if self.destroyed {
                break;
            }
            if !self.touching.contains(&target) {
                self.on_contact(target, distance, receiver, spawner, rng);
            }
        }
        self.touching = current;
    }

    /// A hitbox started touching this projectile.
    ///
    /// While a damage timer runs, re-contact restarts its interval and
    /// retargets it. Otherwise damage is applied now; without repeats the
    /// projectile is destroyed after this hit.
    pub fn on_contact<R: Rng + ?Sized>(
        &mut self,
        target: HitTarget,
        distance: f32,
        receiver: &mut dyn DamageReceiver,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        if self.destroyed || Some(target.owner) == self.source {
            return;
        }

        if let Some(timer) = self.damage_timer.as_mut() {
            timer.reset();
            self.timer_target = Some((target, distance));
            return;
        }

        if !self.apply_damage(target, distance, receiver) {
            return;
        }

        let first_contact = !self.contacted;
        self.contacted = true;
        if first_contact {
            self.spawn_sub_projectile(SubProjectileTrigger::FirstContact, spawner, rng);
        }

        if self.repeats_left > 0 {
            self.damage_timer = Some(Repeating::new(self.config.repeat_time, self.config.repeat_time));
            self.timer_target = Some((target, distance));
        } else {
            self.destroy(spawner, rng);
        }
    }

    /// Advance flight, lifetime and the damage timer
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_time: f32,
        receiver: &mut dyn DamageReceiver,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        if self.destroyed {
            return;
        }

        self.velocity.y += self.config.gravity * delta_time;
        if self.config.drag > 0.0 {
            self.velocity *= (1.0 - self.config.drag * delta_time).max(0.0);
        }
        self.position += self.velocity * delta_time;

        self.lifetime.tick(delta_time);
        if self.lifetime.is_finished() {
            log::trace!("Projectile expired at {:?}", self.position);
            self.destroy(spawner, rng);
            return;
        }
        if self.config.max_range > 0.0 && self.travelled() > self.config.max_range {
            self.destroy(spawner, rng);
            return;
        }
        if self.config.min_speed > 0.0 && self.velocity.length() < self.config.min_speed {
            self.destroy(spawner, rng);
            return;
        }

        let fires = match self.damage_timer.as_mut() {
            Some(timer) => timer.tick(delta_time),
            None => 0,
        };
        for _ in 0..fires {
            let Some((target, distance)) = self.timer_target else {
                break;
            };
            self.apply_damage(target, distance, receiver);
            self.repeats_left = self.repeats_left.saturating_sub(1);
            self.spawn_sub_projectile(SubProjectileTrigger::DamageTick, spawner, rng);
            if self.repeats_left == 0 {
                self.destroy(spawner, rng);
                return;
            }
        }
    }

    /// Destroy the projectile, spawning its impact effect and any
    /// on-destroy sub-projectile. Further calls are no-ops.
    pub fn destroy<R: Rng + ?Sized>(&mut self, spawner: &mut dyn Spawner, rng: &mut R) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.damage_timer = None;
        self.spawn_sub_projectile(SubProjectileTrigger::OnDestroy, spawner, rng);

        if let Some(prefab) = self.config.impact_vfx {
            spawner.spawn(SpawnRequest {
                prefab,
                position: self.position,
                rotation: Quat::IDENTITY,
                kind: SpawnKind::Impact,
            });
        }
    }

    fn apply_damage(&self, target: HitTarget, distance: f32, receiver: &mut dyn DamageReceiver) -> bool {
        let amount = self.config.falloff.apply(self.damage, distance);
        let mut info = DamageInfo::new(amount, self.config.damage_type).with_allegiance(self.allegiance);
        if let Some(source) = self.source {
            info = info.with_source(source);
        }
        receiver.apply_hit(target, &info)
    }

    fn spawn_sub_projectile<R: Rng + ?Sized>(
        &self,
        trigger: SubProjectileTrigger,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        let Some(sub) = self.config.sub_projectile.as_ref() else {
            return;
        };
        if sub.trigger != trigger {
            return;
        }

        let direction = self.velocity.normalize_or_zero();
        let mut child = Projectile::spawn(&sub.config, self.allegiance, self.position, direction, rng);
        child.source = self.source;
        spawner.spawn(SpawnRequest {
            prefab: sub.config.prefab,
            position: self.position,
            rotation: Quat::IDENTITY,
            kind: SpawnKind::Projectile(Box::new(child)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::SpawnQueue;
    use approx::assert_abs_diff_eq;
    use rand::rngs::mock::StepRng;

    #[derive(Default)]
    struct Recorder {
        hits: Vec<(HitTarget, DamageInfo)>,
        reject: bool,
    }

    impl DamageReceiver for Recorder {
        fn apply_hit(&mut self, target: HitTarget, damage: &DamageInfo) -> bool {
            if self.reject {
                return false;
            }
            self.hits.push((target, *damage));
            true
        }
    }

    fn target() -> HitTarget {
        HitTarget { owner: EntityId::new(9, 0), hitbox: 0 }
    }

    fn spawn(config: &ProjectileConfig) -> Projectile {
        let mut rng = StepRng::new(0, 0);
        Projectile::spawn(config, Allegiance::Friendly, Vec3::ZERO, Vec3::X, &mut rng)
    }

    #[test]
    fn test_falloff_functions() {
        assert_eq!(Falloff::Binary.apply(10.0, 5.0), 10.0);
        assert_abs_diff_eq!(Falloff::LinearInterpolate.apply(10.0, 2.0), 5.0);
        assert_abs_diff_eq!(Falloff::LinearInterpolate.apply(10.0, 0.5), 10.0);
        assert_abs_diff_eq!(Falloff::InverseSquared.apply(10.0, 2.0), 2.5);
        assert_abs_diff_eq!(Falloff::InverseSquared.apply(10.0, 0.0), 10.0);
    }

    #[test]
    fn test_repeat_count_normalization() {
        assert_eq!(ProjectileConfig::default().repeats(), 0);
        assert_eq!(ProjectileConfig::default().with_repeat(3, 0.5).repeats(), 3);
        assert_eq!(ProjectileConfig::default().with_repeat(0, 0.5).repeats(), UNBOUNDED_REPEATS);
        assert_eq!(ProjectileConfig::default().with_repeat(-1, 0.5).repeats(), UNBOUNDED_REPEATS);
        assert_eq!(ProjectileConfig::default().with_repeat(-1, 0.0).repeats(), 0);
    }

    #[test]
    fn test_damage_resolved_in_range() {
        let config = ProjectileConfig::default().with_damage(5.0, 15.0, DamageType::Projectile);
        let mut rng = StepRng::new(u64::MAX / 2, 0);
        let p = Projectile::spawn(&config, Allegiance::Enemy, Vec3::ZERO, Vec3::X, &mut rng);
        assert!(p.damage() >= 5.0 && p.damage() <= 15.0);
    }

    #[test]
    fn test_single_hit_destroys() {
        let config = ProjectileConfig::default().with_damage(10.0, 10.0, DamageType::Projectile);
        let mut p = spawn(&config);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 1);
        assert_eq!(receiver.hits[0].1.allegiance, Allegiance::Friendly);
        assert!(p.is_destroyed());
    }

    #[test]
    fn test_rejected_hit_keeps_flying() {
        let mut p = spawn(&ProjectileConfig::default());
        let mut receiver = Recorder { reject: true, ..Default::default() };
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        assert!(!p.is_destroyed());
    }

    #[test]
    fn test_repeat_damage_then_destroy() {
        let config = ProjectileConfig::default().with_repeat(2, 0.5).with_lifetime(10.0);
        let mut p = spawn(&config);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        assert!(p.has_damage_timer());
        p.update(0.5, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 2);
        assert!(!p.is_destroyed());
        p.update(0.5, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 3);
        assert!(p.is_destroyed());
    }

    #[test]
    fn test_recontact_restarts_single_timer() {
        let config = ProjectileConfig::default().with_repeat(5, 1.0).with_lifetime(10.0);
        let mut p = spawn(&config);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        p.update(0.75, &mut receiver, &mut spawner, &mut rng);
        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        // Interval restarted: 0.75s later still nothing
        p.update(0.75, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 1);
        p.update(0.5, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 2);
    }

    #[test]
    fn test_overlap_stay_is_not_recontact() {
        let config = ProjectileConfig::default().with_repeat(5, 1.0).with_lifetime(10.0);
        let mut p = spawn(&config);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        p.on_overlaps(&[(target(), 1.0)], &mut receiver, &mut spawner, &mut rng);
        p.update(0.6, &mut receiver, &mut spawner, &mut rng);
        p.on_overlaps(&[(target(), 1.0)], &mut receiver, &mut spawner, &mut rng);
        p.update(0.6, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(receiver.hits.len(), 2);
    }

    #[test]
    fn test_lifetime_and_range_limits() {
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        let mut p = spawn(&ProjectileConfig::default().with_lifetime(0.1));
        p.update(0.2, &mut receiver, &mut spawner, &mut rng);
        assert!(p.is_destroyed());

        let mut config = ProjectileConfig::default().with_speed(10.0);
        config.max_range = 5.0;
        let mut p = spawn(&config);
        p.update(0.4, &mut receiver, &mut spawner, &mut rng);
        assert!(!p.is_destroyed());
        p.update(0.2, &mut receiver, &mut spawner, &mut rng);
        assert!(p.is_destroyed());

        let mut config = ProjectileConfig::default().with_speed(10.0);
        config.drag = 0.9;
        config.min_speed = 5.0;
        let mut p = spawn(&config);
        p.update(0.6, &mut receiver, &mut spawner, &mut rng);
        assert!(p.is_destroyed());
    }

    #[test]
    fn test_sub_projectile_triggers() {
        let child = ProjectileConfig::default().with_speed(5.0);
        let config = ProjectileConfig::default().with_sub_projectile(SubProjectileTrigger::OnDestroy, child.clone());
        let mut p = spawn(&config);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);

        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(spawner.projectile_count(), 1);
        p.destroy(&mut spawner, &mut rng);
        assert_eq!(spawner.projectile_count(), 1);

        let config = ProjectileConfig::default()
            .with_repeat(2, 0.5)
            .with_sub_projectile(SubProjectileTrigger::FirstContact, child);
        let mut p = spawn(&config);
        let mut spawner = SpawnQueue::new();
        p.on_contact(target(), 1.0, &mut receiver, &mut spawner, &mut rng);
        p.update(0.5, &mut receiver, &mut spawner, &mut rng);
        assert_eq!(spawner.projectile_count(), 1);
    }

    #[test]
    fn test_never_hits_source() {
        let mut p = spawn(&ProjectileConfig::default()).with_source(target().owner);
        let mut receiver = Recorder::default();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        p.on_contact(target(), 0.0, &mut receiver, &mut spawner, &mut rng);
        assert!(receiver.hits.is_empty());
    }
}
