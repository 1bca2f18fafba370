//! Foundation types for SixDice.
//!
//! This crate provides the value types shared by the ledger, the game engine
//! and the HTTP surface. Every other SixDice crate depends on `sixdice-types`.
//!
//! # Key Types
//!
//! - [`Face`]: A single die face, validated to lie in `1..=6`
//! - [`DiceRoll`]: Six faces in draw order
//! - [`Multiplier`]: Fixed-point payout multiplier (hundredths)
//! - [`Amount`]: Signed balance unit used by ledger entries

pub mod dice;
pub mod error;
pub mod multiplier;

pub use dice::{DiceRoll, Face, DICE_PER_ROLL, FACES};
pub use error::TypeError;
pub use multiplier::Multiplier;

/// Signed amount of game credits. Debits are negative, credits positive.
pub type Amount = i64;
