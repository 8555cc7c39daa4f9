//! Error types for combat configuration

use thiserror::Error;

/// Combat configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombatError {
    #[error("Invalid weapon stats: {0}")]
    InvalidWeapon(String),

    #[error("Invalid projectile config: {0}")]
    InvalidProjectile(String),

    #[error("Invalid health: {0}")]
    InvalidHealth(String),
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;
