//! # spire_core - Spire Core
//!
//! Zero-dependency primitives shared by every other crate:
//! - **Entity ids**: stable handles for characters, zones and environment objects
//! - **Countdowns**: explicit timer state carried across ticks
//!
//! The simulation is single-threaded and ticked. Anything that "waits"
//! (stun, reload, teleport fades, patrol idling, rotation sessions) is a
//! [`Countdown`] polled once per tick, never a blocking call.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod id;
pub mod timer;

pub use id::*;
pub use timer::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{EntityId, IdGenerator};
    pub use crate::timer::{Countdown, Repeating};
}
