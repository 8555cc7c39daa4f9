//! Tower rotation errors

use crate::facing::{Corner, Facing};
use thiserror::Error;

/// Reasons a turn request is turned down
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TurnError {
    #[error("a rotation session is already running")]
    SessionActive,

    #[error("turn sign must be +1 or -1, got {0}")]
    InvalidSign(i8),

    #[error("turn duration must not be negative, got {0}")]
    InvalidDuration(f32),

    #[error("corner {corner:?} does not turn while facing {facing:?}")]
    NoTurn { corner: Corner, facing: Facing },
}

pub type Result<T> = std::result::Result<T, TurnError>;
