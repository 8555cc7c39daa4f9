//! Simulation setup and configuration errors

use spire_math::LineError;
use spire_tower::TurnError;
use std::path::PathBuf;
use thiserror::Error;

/// Problems reading or checking a `SimConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while wiring or driving a world
#[derive(Debug, Error)]
pub enum SimError {
    /// A service the world cannot run without was never provided
    #[error("missing service: {0}")]
    MissingService(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid patrol line: {0}")]
    Line(#[from] LineError),

    #[error("turn refused: {0}")]
    Turn(#[from] TurnError),
}

pub type Result<T> = std::result::Result<T, SimError>;
