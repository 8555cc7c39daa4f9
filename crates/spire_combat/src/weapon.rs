//! Weapon system: rate gate, magazine and reload

use crate::damage::Allegiance;
use crate::projectile::{Projectile, ProjectileConfig};
use crate::spawner::{PrefabHandle, SpawnKind, SpawnRequest, Spawner};
use rand::Rng;
use serde::{Deserialize, Serialize};
use spire_core::{Countdown, EntityId, Repeating};
use spire_math::{radians, Quat, Transform, Vec3};

/// Weapon statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    /// Fire rate (shots per second)
    pub shots_per_second: f32,
    /// Magazine capacity
    pub magazine_size: u32,
    /// Reload time in seconds
    pub reload_time: f32,
    /// Total spread cone in degrees
    pub spread: f32,
    /// Fire once per trigger press instead of auto-firing while held
    pub fire_on_every_press: bool,
    pub muzzle_vfx: Option<PrefabHandle>,
    pub eject_vfx: Option<PrefabHandle>,
    pub projectile: ProjectileConfig,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            shots_per_second: 4.0,
            magazine_size: 12,
            reload_time: 1.5,
            spread: 4.0,
            fire_on_every_press: true,
            muzzle_vfx: None,
            eject_vfx: None,
            projectile: ProjectileConfig::default(),
        }
    }
}

impl WeaponStats {
    /// Set fire rate
    pub fn with_fire_rate(mut self, shots_per_second: f32) -> Self {
        self.shots_per_second = shots_per_second;
        self
    }

    /// Set magazine capacity and reload time
    pub fn with_magazine(mut self, size: u32, reload_time: f32) -> Self {
        self.magazine_size = size;
        self.reload_time = reload_time;
        self
    }

    /// Set spread cone in degrees
    pub fn with_spread(mut self, degrees: f32) -> Self {
        self.spread = degrees;
        self
    }

    /// Set projectile config
    pub fn with_projectile(mut self, projectile: ProjectileConfig) -> Self {
        self.projectile = projectile;
        self
    }

    /// Seconds between shots
    pub fn shot_interval(&self) -> f32 {
        1.0 / self.shots_per_second
    }
}

/// Weapon held by a character.
///
/// Two gates control firing: an external enable flag (cover, stun) and the
/// internal rate/reload gate. [`can_shoot`](Self::can_shoot) is their AND.
#[derive(Debug, Clone)]
pub struct WeaponComponent {
    pub stats: WeaponStats,
    allegiance: Allegiance,
    owner: Option<EntityId>,
    ammo: u32,
    shooting_enabled: bool,
    /// Rate gate: closed until the countdown finishes
    cooldown: Option<Countdown>,
    /// Auto-fire while the trigger is held
    shot_timer: Option<Repeating>,
    reload_timer: Option<Countdown>,
}

impl WeaponComponent {
    /// Create a weapon with a full magazine
    pub fn new(stats: WeaponStats, allegiance: Allegiance) -> Self {
        let ammo = stats.magazine_size;
        Self {
            stats,
            allegiance,
            owner: None,
            ammo,
            shooting_enabled: true,
            cooldown: None,
            shot_timer: None,
            reload_timer: None,
        }
    }

    /// Set the owning character (projectiles never hit their owner)
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn allegiance(&self) -> Allegiance {
        self.allegiance
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer.is_some()
    }

    pub fn is_trigger_held(&self) -> bool {
        self.shot_timer.is_some()
    }

    pub fn shooting_enabled(&self) -> bool {
        self.shooting_enabled
    }

    /// External gate
    pub fn set_shooting_enabled(&mut self, enabled: bool) {
        self.shooting_enabled = enabled;
    }

    /// Rate gate open AND not reloading AND externally enabled
    pub fn can_shoot(&self) -> bool {
        let rate_ready = self.cooldown.map_or(true, |c| c.is_finished());
        rate_ready && self.reload_timer.is_none() && self.shooting_enabled
    }

    /// Pull the trigger.
    ///
    /// A press (`hold == false`) on a fire-on-every-press weapon shoots once.
    /// Otherwise the shot-interval timer is started if it is not already
    /// running, and it shoots on each interval while held. Returns true when
    /// a shot was attempted this call.
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        hold: bool,
        muzzle: &Transform,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) -> bool {
        if !hold && self.stats.fire_on_every_press {
            if !self.can_shoot() {
                return false;
            }
            self.do_shot(muzzle, spawner, rng);
            return true;
        }

        if self.shot_timer.is_some() {
            return false;
        }
        let mut timer = Repeating::new(self.stats.shot_interval(), 0.0);
        let due = timer.tick(0.0) > 0;
        self.shot_timer = Some(timer);

        if due && self.can_shoot() {
            self.do_shot(muzzle, spawner, rng);
            return true;
        }
        false
    }

    /// Let go of the trigger, stopping auto-fire
    pub fn release_trigger(&mut self) {
        self.shot_timer = None;
    }

    /// Start a manual reload. Rejected while reloading or with a full magazine.
    pub fn reload(&mut self) -> bool {
        if self.reload_timer.is_some() || self.ammo >= self.stats.magazine_size {
            return false;
        }
        self.start_reload();
        true
    }

    /// Step the rate gate, reload and auto-fire timers
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        delta_time: f32,
        muzzle: &Transform,
        spawner: &mut dyn Spawner,
        rng: &mut R,
    ) {
        if let Some(cooldown) = self.cooldown.as_mut() {
            cooldown.tick(delta_time);
            if cooldown.is_finished() {
                self.cooldown = None;
            }
        }

        if let Some(reload) = self.reload_timer.as_mut() {
            reload.tick(delta_time);
            if reload.is_finished() {
                self.ammo = self.stats.magazine_size;
                self.reload_timer = None;
                log::debug!("Reload finished, {} rounds", self.ammo);
            }
        }

        let fires = match self.shot_timer.as_mut() {
            Some(timer) => timer.tick(delta_time),
            None => 0,
        };
        // The shot timer already paces auto-fire, so only reload and the
        // external gate apply here.
        for _ in 0..fires {
            if self.reload_timer.is_none() && self.shooting_enabled {
                self.do_shot(muzzle, spawner, rng);
            }
        }
    }

    /// One trigger pull that passed the gates. An empty magazine starts a
    /// reload instead of shooting.
    fn do_shot<R: Rng + ?Sized>(&mut self, muzzle: &Transform, spawner: &mut dyn Spawner, rng: &mut R) {
        self.cooldown = Some(Countdown::new(self.stats.shot_interval()));

        if self.ammo == 0 {
            self.start_reload();
            return;
        }
        self.ammo -= 1;

        let forward = muzzle.right();
        let half_spread = radians(self.stats.spread) * 0.5;
        let direction = if half_spread > 0.0 {
            let angle = rng.gen_range(-half_spread..=half_spread);
            Quat::from_axis_angle(muzzle.transform_direction(Vec3::Z), angle) * forward
        } else {
            forward
        };

        let mut projectile = Projectile::spawn(&self.stats.projectile, self.allegiance, muzzle.position, direction, rng);
        if let Some(owner) = self.owner {
            projectile = projectile.with_source(owner);
        }
        spawner.spawn(SpawnRequest {
            prefab: self.stats.projectile.prefab,
            position: muzzle.position,
            rotation: muzzle.rotation,
            kind: SpawnKind::Projectile(Box::new(projectile)),
        });

        if let Some(prefab) = self.stats.muzzle_vfx {
            spawner.spawn(SpawnRequest {
                prefab,
                position: muzzle.position,
                rotation: muzzle.rotation,
                kind: SpawnKind::MuzzleFlash,
            });
        }
        if let Some(prefab) = self.stats.eject_vfx {
            spawner.spawn(SpawnRequest {
                prefab,
                position: muzzle.position,
                rotation: muzzle.rotation,
                kind: SpawnKind::ShellEject,
            });
        }
    }

    fn start_reload(&mut self) {
        log::debug!("Reloading for {}s", self.stats.reload_time);
        self.ammo = 0;
        self.reload_timer = Some(Countdown::new(self.stats.reload_time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::SpawnQueue;
    use rand::rngs::mock::StepRng;

    fn pistol() -> WeaponComponent {
        let stats = WeaponStats::default()
            .with_fire_rate(10.0)
            .with_magazine(1, 1.0)
            .with_spread(0.0);
        let mut stats = stats;
        stats.muzzle_vfx = Some(PrefabHandle(1));
        stats.eject_vfx = Some(PrefabHandle(2));
        WeaponComponent::new(stats, Allegiance::Friendly)
    }

    #[test]
    fn test_magazine_reload_scenario() {
        let mut weapon = pistol();
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        let muzzle = Transform::IDENTITY;

        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        assert_eq!(weapon.ammo(), 0);
        assert_eq!(spawner.projectile_count(), 1);
        assert_eq!(spawner.len(), 3);

        weapon.update(0.2, &muzzle, &mut spawner, &mut rng);
        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        assert!(weapon.is_reloading());
        assert_eq!(weapon.ammo(), 0);
        assert_eq!(spawner.projectile_count(), 1);

        weapon.update(0.5, &muzzle, &mut spawner, &mut rng);
        assert!(!weapon.can_shoot());
        weapon.update(0.6, &muzzle, &mut spawner, &mut rng);
        assert_eq!(weapon.ammo(), 1);
        assert!(weapon.can_shoot());
    }

    #[test]
    fn test_instant_reload_refills_on_next_update() {
        let stats = WeaponStats::default().with_magazine(1, 0.0);
        assert!(stats.validate().is_ok());
        let mut weapon = WeaponComponent::new(stats, Allegiance::Friendly);
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        let muzzle = Transform::IDENTITY;

        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        weapon.update(0.5, &muzzle, &mut spawner, &mut rng);
        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        assert!(weapon.is_reloading());

        weapon.update(1.0 / 60.0, &muzzle, &mut spawner, &mut rng);
        assert!(!weapon.is_reloading());
        assert_eq!(weapon.ammo(), 1);
        weapon.update(0.5, &muzzle, &mut spawner, &mut rng);
        assert!(weapon.can_shoot());
    }

    #[test]
    fn test_fire_while_gated_never_spawns() {
        let mut weapon = pistol();
        weapon.set_shooting_enabled(false);
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        for _ in 0..10 {
            assert!(!weapon.fire(false, &Transform::IDENTITY, &mut spawner, &mut rng));
        }
        assert!(spawner.is_empty());
    }

    #[test]
    fn test_rate_gate_blocks_rapid_presses() {
        let mut weapon = WeaponComponent::new(WeaponStats::default().with_fire_rate(2.0), Allegiance::Enemy);
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        let muzzle = Transform::IDENTITY;

        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        assert!(!weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        weapon.update(0.6, &muzzle, &mut spawner, &mut rng);
        assert!(weapon.fire(false, &muzzle, &mut spawner, &mut rng));
        assert_eq!(spawner.projectile_count(), 2);
    }

    #[test]
    fn test_hold_uses_single_shot_timer() {
        let mut stats = WeaponStats::default().with_fire_rate(4.0).with_magazine(30, 1.0);
        stats.fire_on_every_press = false;
        let mut weapon = WeaponComponent::new(stats, Allegiance::Friendly);
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        let muzzle = Transform::IDENTITY;

        assert!(weapon.fire(true, &muzzle, &mut spawner, &mut rng));
        // Holding again does not start a second timer
        assert!(!weapon.fire(true, &muzzle, &mut spawner, &mut rng));
        assert!(weapon.is_trigger_held());

        for _ in 0..9 {
            weapon.update(0.1, &muzzle, &mut spawner, &mut rng);
        }
        // One immediate shot, then one every 0.25s
        assert_eq!(spawner.projectile_count(), 4);

        weapon.release_trigger();
        weapon.update(1.0, &muzzle, &mut spawner, &mut rng);
        assert_eq!(spawner.projectile_count(), 4);
    }

    #[test]
    fn test_manual_reload() {
        let mut weapon = pistol();
        assert!(!weapon.reload());
        let mut spawner = SpawnQueue::new();
        let mut rng = StepRng::new(0, 0);
        weapon.fire(false, &Transform::IDENTITY, &mut spawner, &mut rng);
        assert!(weapon.reload());
        assert!(!weapon.reload());
    }
}
