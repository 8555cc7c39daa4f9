//! Spire Physics - collision queries and trigger zones
//!
//! The character and AI code never resolve collisions themselves. They ask
//! this crate two kinds of question:
//!
//! - Raycasts through the [`PhysicsQuery`] trait: ground probes, wall and
//!   line-of-sight checks, reachability tests. [`BoxWorld`] is the in-process
//!   implementation built from axis-aligned boxes.
//! - Trigger overlaps through [`ZoneTracker`], which turns positions into
//!   explicit [`ContactEvent`]s that are pushed into characters.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐     ┌─────────────────────────┐
//! │           BoxWorld           │     │       ZoneTracker       │
//! │  static boxes   body boxes   │     │  zones   overlap pairs  │
//! └──────────────┬───────────────┘     └────────────┬────────────┘
//!                │ raycast(origin, dir, max, mask)   │ update(positions)
//!                ▼                                   ▼
//!           RaycastHit                    (EntityId, ContactEvent)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use spire_physics::prelude::*;
//!
//! let mut world = BoxWorld::new();
//! world.add_static(Aabb::new(Vec3::new(-50.0, -1.0, -1.0), Vec3::new(50.0, 0.0, 1.0)), CollisionLayer::GROUND);
//!
//! let grounded = ground_probe(&world, Vec3::new(0.0, 0.5, 0.0), Vec3::X * 0.3, 0.6, LayerMask::SOLID).is_some();
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod layers;
pub mod query;
pub mod zones;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{ContactEvent, ZoneContact, ZoneKind};
    pub use crate::layers::{CollisionLayer, LayerMask};
    pub use crate::query::{ground_probe, BoxCollider, BoxWorld, PhysicsQuery, RaycastHit};
    pub use crate::zones::{ZoneTracker, ZoneVolume};
}

pub use prelude::*;
