//! Spire AI - NPC perception and patrol/combat control
//!
//! NPCs are ordinary characters driven by an [`NpcController`]. The
//! controller is a two-state machine over a snapshot of what the NPC can see.
//!
//! # Features
//!
//! - Generic finite state machine with prioritized and global transitions
//! - Vision cone: facing gate, range, line of sight, cover override
//! - Patrol along a movement line with line-of-sight checked targets
//! - Combat standoff band, flanking fallback, cover seeking, fire rolls
//!
//! # Example
//!
//! ```ignore
//! use spire_ai::prelude::*;
//!
//! let mut brain = NpcController::new(patrol_line, NpcConfig::default());
//! let intent = brain.decide(&npc, &senses, &mut rng);
//! npc.fixed_update(dt, &world, &intent, &mut spawner, &mut rng);
//! ```

pub mod config;
pub mod controller;
pub mod perception;
pub mod state_machine;

pub mod prelude {
    pub use crate::config::NpcConfig;
    pub use crate::controller::{NpcContext, NpcController, NpcState, PatrolPhase};
    pub use crate::perception::VisionCone;
    pub use crate::state_machine::{State, StateMachine, Transition};
}

pub use prelude::*;
