use sixdice_types::Amount;

use crate::entry::{EntryKind, LedgerEntry, INITIAL_BALANCE};
use crate::error::LedgerResult;

/// Read boundary for ledger queries.
pub trait LedgerReader: Send {
    /// All entries in insertion order.
    fn entries(&self) -> LedgerResult<Vec<LedgerEntry>>;

    /// Sum of every entry value. Returns 0 for an empty ledger.
    fn balance(&self) -> LedgerResult<Amount>;

    fn len(&self) -> LedgerResult<usize>;

    fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Write boundary for ledger mutations.
///
/// Entries are immutable once appended. The only way to remove history is
/// [`LedgerWriter::reset`], which discards everything.
pub trait LedgerWriter: Send {
    /// Append a new entry. The sign of `value` is the caller's concern.
    fn append(&mut self, value: Amount, kind: EntryKind) -> LedgerResult<LedgerEntry>;

    /// Append several entries as one unit: either all of them land or none do.
    fn append_all(&mut self, batch: &[(Amount, EntryKind)]) -> LedgerResult<Vec<LedgerEntry>>;

    /// Clear every entry, then write a single `Init` entry of [`INITIAL_BALANCE`].
    fn reset(&mut self) -> LedgerResult<LedgerEntry>;
}

/// A full ledger: readable and writable.
pub trait Ledger: LedgerReader + LedgerWriter {
    /// Seed an empty ledger with the initial balance.
    ///
    /// Returns the written entry, or `None` when the ledger already had history.
    fn bootstrap(&mut self) -> LedgerResult<Option<LedgerEntry>> {
        if !self.is_empty()? {
            return Ok(None);
        }
        let entry = self.append(INITIAL_BALANCE, EntryKind::Init)?;
        tracing::info!(id = entry.id, value = entry.value, "ledger bootstrapped");
        Ok(Some(entry))
    }
}

impl<T: LedgerReader + LedgerWriter> Ledger for T {}
