//! Spire Sim - the simulation world
//!
//! Wires characters, controllers, projectiles, trigger zones and the tower
//! coordinator into one world stepped at a fixed rate.
//!
//! # Features
//!
//! - Fixed tick with a frame accumulator and a substep cap
//! - Player and NPC controllers feeding the same character update
//! - Swept projectile hits, wall impacts, melee strikes and slide bumps
//! - Level boxes, zones, patrol lines and projectiles turn with the tower
//! - TOML configuration with defaults for every missing value
//!
//! # Example
//!
//! ```ignore
//! use spire_sim::prelude::*;
//!
//! let mut world = SimBuilder::new(SimConfig::load("spire.toml")?)
//!     .with_physics(BoxWorld::new())
//!     .add_solid(floor, CollisionLayer::GROUND)
//!     .with_player(Vec3::ZERO)
//!     .build()?;
//!
//! world.player_input().map(|input| input.set_axis(1.0));
//! world.run_frame(1.0 / 60.0);
//! ```

pub mod builder;
pub mod config;
pub mod demo;
pub mod environment;
pub mod error;
pub mod roster;
pub mod world;

pub mod prelude {
    pub use crate::builder::SimBuilder;
    pub use crate::config::{MeleeConfig, SimConfig};
    pub use crate::environment::{EnvironmentObject, EnvironmentShape};
    pub use crate::error::{ConfigError, Result, SimError};
    pub use crate::roster::{Controller, Roster};
    pub use crate::world::{SimStats, World};
}

pub use prelude::*;
