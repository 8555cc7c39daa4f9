//! What a character shows this tick
//!
//! The character writes a [`PresentationState`] at the end of every fixed
//! update. Renderers, animators and shaders read it through a [`Presenter`];
//! nothing in the gameplay code reads it back.

use spire_combat::AliveState;
use spire_core::EntityId;

/// Opaque white
pub const TINT_NORMAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Fully faded out
pub const TINT_FADED: [f32; 4] = [1.0, 1.0, 1.0, 0.0];

/// Discrete animation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimTag {
    Idle,
    Run,
    Slide,
    Jump,
    Fall,
    Cover,
    /// Peeking out of cover to shoot
    CoverShoot,
    Stunned,
    Teleport,
    Rotating,
    /// Death variant
    Dead(AliveState),
}

/// Per-tick presentation output of one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationState {
    pub tag: AnimTag,
    /// Sprite faces the negative horizontal axis
    pub flip_x: bool,
    /// RGBA tint, animated by the teleport fade
    pub tint: [f32; 4],
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            tag: AnimTag::Idle,
            flip_x: false,
            tint: TINT_NORMAL,
        }
    }
}

/// Consumer of presentation state
pub trait Presenter {
    fn present(&mut self, entity: EntityId, state: &PresentationState);
}

/// Blend two RGBA colours
pub fn lerp_tint(from: [f32; 4], to: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0.0; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        *channel = from[i] + (to[i] - from[i]) * t;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_tint_halfway() {
        let tint = lerp_tint(TINT_NORMAL, TINT_FADED, 0.5);
        assert_eq!(tint, [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(lerp_tint(TINT_NORMAL, TINT_FADED, 3.0), TINT_FADED);
    }
}
