use sixdice_types::Amount;
use thiserror::Error;

/// Errors produced by game operations.
///
/// Input errors are raised before any ledger mutation, so a failed call never
/// leaves a partial roll behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("bet must be > 0, got {0}")]
    InvalidBet(Amount),

    #[error("insufficient balance: bet {bet} exceeds balance {balance}")]
    InsufficientBalance { bet: Amount, balance: Amount },

    #[error("invalid simulation parameters: iterations={iterations}, bet={bet}")]
    InvalidIterationCount { iterations: i64, bet: Amount },

    #[error("ledger error: {0}")]
    Ledger(#[from] sixdice_ledger::LedgerError),
}

impl GameError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidBet(_) => "invalid_bet",
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::InvalidIterationCount { .. } => "invalid_iteration_count",
            Self::Ledger(_) => "ledger_error",
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
