//! Game engine for SixDice.
//!
//! A roll debits the stake from the ledger, draws six dice, scores the
//! result against a fixed paytable and credits any payout. The ledger is the
//! only state; balances are always derived from it.
//!
//! - [`combination`]: the paytable and the pure evaluator
//! - [`dice`]: pluggable [`DiceSource`]s (entropy-seeded, seeded, fixed)
//! - [`table`]: [`GameTable`], the serialized roll/balance/reset surface
//! - [`simulation`]: ledger-free RTP estimation on rayon

pub mod combination;
pub mod dice;
pub mod error;
pub mod simulation;
pub mod table;

pub use combination::{check_combination, Combination, CombinationResult};
pub use dice::{DiceSource, FixedDice, RngDice};
pub use error::{GameError, GameResult};
pub use simulation::{Simulation, SimulationReport, DEFAULT_BET, DEFAULT_ITERATIONS};
pub use table::{GameTable, RollOutcome};
