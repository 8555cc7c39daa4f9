//! Logical spawn requests for projectiles and effects

use crate::projectile::Projectile;
use serde::{Deserialize, Serialize};
use spire_math::{Quat, Vec3};

/// Opaque reference to a prefab the presentation side knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PrefabHandle(pub u32);

/// Handle returned for a spawned instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(pub u64);

/// What is being spawned
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnKind {
    /// A live projectile the simulation should take ownership of
    Projectile(Box<Projectile>),
    /// Muzzle flash
    MuzzleFlash,
    /// Ejected shell casing
    ShellEject,
    /// Impact effect left when a projectile dies
    Impact,
}

impl SpawnKind {
    /// Whether this request carries simulation state rather than just visuals
    pub fn is_projectile(&self) -> bool {
        matches!(self, Self::Projectile(_))
    }
}

/// A request to instantiate something in the world
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub prefab: PrefabHandle,
    pub position: Vec3,
    pub rotation: Quat,
    pub kind: SpawnKind,
}

/// Spawning service consumed by weapons and projectiles
pub trait Spawner {
    /// Spawn an instance
    fn spawn(&mut self, request: SpawnRequest) -> InstanceHandle;
}

/// Spawner that records requests for the owner to process later
#[derive(Debug, Default)]
pub struct SpawnQueue {
    requests: Vec<SpawnRequest>,
    next_handle: u64,
}

impl SpawnQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending requests
    pub fn requests(&self) -> &[SpawnRequest] {
        &self.requests
    }

    /// Number of pending requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Number of pending projectile requests
    pub fn projectile_count(&self) -> usize {
        self.requests.iter().filter(|r| r.kind.is_projectile()).count()
    }

    /// Take every pending request in spawn order
    pub fn drain(&mut self) -> std::vec::Drain<'_, SpawnRequest> {
        self.requests.drain(..)
    }
}

impl Spawner for SpawnQueue {
    fn spawn(&mut self, request: SpawnRequest) -> InstanceHandle {
        let handle = InstanceHandle(self.next_handle);
        self.next_handle += 1;
        log::trace!("Spawn {:?} prefab {:?} at {:?}", handle, request.prefab, request.position);
        self.requests.push(request);
        handle
    }
}
