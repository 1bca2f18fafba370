//! Append-only balance ledger for SixDice.
//!
//! The balance is never stored: it is always the sum of the entries written
//! so far. This crate provides:
//! - [`LedgerEntry`] / [`EntryKind`] records with monotonic ids
//! - `LedgerReader` / `LedgerWriter` trait boundaries
//! - [`InMemoryLedger`] for tests, simulations and embedding
//! - [`FileLedger`], a CRC-framed append-only log that survives restarts

pub mod entry;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use entry::{EntryKind, LedgerEntry, INITIAL_BALANCE};
pub use error::{LedgerError, LedgerResult};
pub use file::{FileLedger, SyncMode};
pub use memory::InMemoryLedger;
pub use traits::{Ledger, LedgerReader, LedgerWriter};
