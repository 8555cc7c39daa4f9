//! Spire Tower - coordinated quarter turns of the tower
//!
//! The level wraps around a square tower. Reaching a corner turns the whole
//! tower a quarter so the next side faces the camera. During a turn every
//! registered character is locked and interpolated from its current transform
//! to that transform rotated around the pivot. Environment objects are turned
//! incrementally.
//!
//! # Protocol
//!
//! - **BeforeTurn**: [`TowerRotationCoordinator::start_turn`] snapshots and locks
//! - **Turn**: [`TowerRotationCoordinator::step`] interpolates each tick
//! - **PostTurn**: the final step snaps to the end transforms and releases
//!
//! # Example
//!
//! ```ignore
//! use spire_tower::prelude::*;
//!
//! let mut tower = TowerRotationCoordinator::new(TowerConfig::default());
//! tower.register(hero_id);
//!
//! let request = tower.request_for_corner(Corner::NorthEast)?;
//! tower.start_turn(request, &mut world)?;
//! while !matches!(tower.step(dt, &mut world), TurnStatus::Finished(_)) {}
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod facing;
pub mod session;

pub mod prelude {
    pub use crate::config::TowerConfig;
    pub use crate::coordinator::{Rotatable, RotationHost, TowerRotationCoordinator, TurnStatus};
    pub use crate::error::{Result, TurnError};
    pub use crate::facing::{turn_sign, Corner, Facing};
    pub use crate::session::{EntitySnapshot, TowerRotationSession, TurnRequest};
}

pub use prelude::*;
