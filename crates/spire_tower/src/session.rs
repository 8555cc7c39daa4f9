//! State of one quarter turn

use crate::error::{Result, TurnError};
use core::f32::consts::FRAC_PI_2;
use spire_core::EntityId;
use spire_math::{Quat, Transform, Vec3};
use std::collections::BTreeMap;

/// Parameters of a turn, supplied by whatever triggered it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnRequest {
    pub pivot: Vec3,
    /// +1 or -1
    pub sign: i8,
    pub duration: f32,
}

impl TurnRequest {
    pub fn new(pivot: Vec3, sign: i8, duration: f32) -> Self {
        Self { pivot, sign, duration }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sign != 1 && self.sign != -1 {
            return Err(TurnError::InvalidSign(self.sign));
        }
        if !(self.duration >= 0.0) {
            return Err(TurnError::InvalidDuration(self.duration));
        }
        Ok(())
    }

    /// Signed rotation angle in radians around +Y
    pub fn angle(&self) -> f32 {
        f32::from(self.sign) * FRAC_PI_2
    }
}

/// Start and end transforms of one registered entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub start: Transform,
    pub end: Transform,
    /// Session progress when the snapshot was taken
    pub start_progress: f32,
}

impl EntitySnapshot {
    /// Interpolated transform at session progress `progress`
    pub fn at(&self, progress: f32) -> Transform {
        let span = 1.0 - self.start_progress;
        let t = if span <= f32::EPSILON {
            1.0
        } else {
            ((progress - self.start_progress) / span).clamp(0.0, 1.0)
        };
        self.start.lerp(&self.end, t)
    }
}

/// Transient coordination state for one quarter turn
#[derive(Debug, Clone)]
pub struct TowerRotationSession {
    request: TurnRequest,
    rotation: Quat,
    elapsed: f32,
    /// Angle already applied to environment objects
    environment_angle: f32,
    snapshots: BTreeMap<EntityId, EntitySnapshot>,
}

impl TowerRotationSession {
    pub fn new(request: TurnRequest) -> Self {
        Self {
            request,
            rotation: Quat::from_rotation_y(request.angle()),
            elapsed: 0.0,
            environment_angle: 0.0,
            snapshots: BTreeMap::new(),
        }
    }

    pub fn request(&self) -> &TurnRequest {
        &self.request
    }

    pub fn pivot(&self) -> Vec3 {
        self.request.pivot
    }

    pub fn sign(&self) -> i8 {
        self.request.sign
    }

    /// Full rotation of the session
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the turn done, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.request.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.request.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub(crate) fn advance(&mut self, delta_time: f32) {
        self.elapsed += delta_time.max(0.0);
    }

    /// Record `transform` and its projected end
    pub fn snapshot(&mut self, entity: EntityId, transform: Transform) {
        let end = transform.rotated_around(self.request.pivot, self.rotation);
        let start_progress = self.progress();
        self.snapshots.insert(
            entity,
            EntitySnapshot {
                start: transform,
                end,
                start_progress,
            },
        );
    }

    pub fn has_snapshot(&self, entity: EntityId) -> bool {
        self.snapshots.contains_key(&entity)
    }

    pub fn snapshot_of(&self, entity: EntityId) -> Option<&EntitySnapshot> {
        self.snapshots.get(&entity)
    }

    pub(crate) fn remove_snapshot(&mut self, entity: EntityId) -> Option<EntitySnapshot> {
        self.snapshots.remove(&entity)
    }

    pub fn snapshots(&self) -> impl Iterator<Item = (EntityId, &EntitySnapshot)> {
        self.snapshots.iter().map(|(id, s)| (*id, s))
    }

    /// Rotation environment objects still need to reach the current progress
    pub(crate) fn take_environment_delta(&mut self) -> Quat {
        let target = self.request.angle() * self.progress();
        let delta = target - self.environment_angle;
        self.environment_angle = target;
        Quat::from_rotation_y(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_request_validation() {
        assert!(TurnRequest::new(Vec3::ZERO, 1, 1.0).validate().is_ok());
        assert_eq!(TurnRequest::new(Vec3::ZERO, 2, 1.0).validate(), Err(TurnError::InvalidSign(2)));
        assert_eq!(
            TurnRequest::new(Vec3::ZERO, -1, -1.0).validate(),
            Err(TurnError::InvalidDuration(-1.0))
        );
    }

    #[test]
    fn test_progress_and_zero_duration() {
        let mut session = TowerRotationSession::new(TurnRequest::new(Vec3::ZERO, 1, 2.0));
        session.advance(0.5);
        assert_abs_diff_eq!(session.progress(), 0.25, epsilon = 1e-6);
        session.advance(5.0);
        assert!(session.is_complete());

        let instant = TowerRotationSession::new(TurnRequest::new(Vec3::ZERO, -1, 0.0));
        assert!(instant.is_complete());
    }

    #[test]
    fn test_late_snapshot_remaps_progress() {
        let mut session = TowerRotationSession::new(TurnRequest::new(Vec3::ZERO, 1, 1.0));
        session.advance(0.5);
        session.snapshot(EntityId::new(1, 0), Transform::from_position(Vec3::X));
        let snap = *session.snapshot_of(EntityId::new(1, 0)).unwrap();
        assert_eq!(snap.at(0.5), snap.start);
        let end = snap.at(1.0);
        assert_abs_diff_eq!(end.position.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_environment_deltas_sum_to_quarter_turn() {
        let mut session = TowerRotationSession::new(TurnRequest::new(Vec3::ZERO, 1, 1.0));
        let mut total = Quat::IDENTITY;
        for _ in 0..7 {
            session.advance(0.15);
            total = session.take_environment_delta() * total;
        }
        let v = total * Vec3::X;
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(v.z, -1.0, epsilon = 1e-5);
    }
}
