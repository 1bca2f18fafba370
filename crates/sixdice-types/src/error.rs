use thiserror::Error;

/// Errors produced by type construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid die face: {0} (expected 1..=6)")]
    InvalidFace(u8),

    #[error("invalid dice count: expected {expected}, got {actual}")]
    InvalidDiceCount { expected: usize, actual: usize },
}
