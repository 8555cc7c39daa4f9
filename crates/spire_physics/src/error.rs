//! Error types for the physics system

use spire_core::EntityId;
use thiserror::Error;

/// Physics system errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    /// Dynamic body not found
    #[error("Body not found: {0}")]
    BodyNotFound(EntityId),

    /// Trigger zone not found
    #[error("Zone not found: {0}")]
    ZoneNotFound(EntityId),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
