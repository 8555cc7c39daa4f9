//! Spire Character - the movement and combat state machine
//!
//! One [`Character`] type serves players and NPCs alike. What differs is the
//! [`IntentSource`] that drives it: [`PlayerController`] reads input, the NPC
//! controller in `spire_ai` runs patrol and combat heuristics.
//!
//! # Features
//!
//! - Walk, slide, jump, cover, stun, teleport and rotation lock states
//! - Three-point ground probe with hard-landing slides and fatal falls
//! - Cover that hides hitboxes, with a timed shoot-from-cover window
//! - Trigger and collision input as explicit [`ContactEvent`]s
//! - Flat or ring-embedded horizontal axis ([`AxisModel`])
//! - Per-tick [`PresentationState`] for animation and tint
//!
//! # Example
//!
//! ```ignore
//! use spire_character::prelude::*;
//!
//! let mut hero = CharacterBuilder::new(id)
//!     .with_allegiance(Allegiance::Friendly)
//!     .with_default_hitboxes()
//!     .with_weapon(WeaponStats::default())
//!     .build();
//!
//! let intent = player.decide(&hero, &senses, &mut rng);
//! hero.fixed_update(dt, &world, &intent, &mut spawner, &mut rng);
//! ```
//!
//! [`ContactEvent`]: spire_physics::ContactEvent

pub mod builder;
pub mod character;
pub mod config;
pub mod intent;
pub mod presentation;
pub mod state;

pub mod prelude {
    pub use crate::builder::{CharacterBuilder, SetupError};
    pub use crate::character::Character;
    pub use crate::config::CharacterConfig;
    pub use crate::intent::{
        InputAction, InputState, IntentSource, MovementIntent, PlayerController, Senses, TargetInfo,
        AXIS_DEADZONE,
    };
    pub use crate::presentation::{AnimTag, PresentationState, Presenter};
    pub use crate::state::{AxisModel, MovementState};
}

pub use prelude::*;
