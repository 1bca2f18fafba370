use sixdice_types::Amount;

use crate::entry::{sum_entries, EntryKind, LedgerEntry, INITIAL_BALANCE};
use crate::error::LedgerResult;
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// Entry ids come from a counter that is never rewound, so ids stay unique
/// across resets.
#[derive(Clone, Debug)]
pub struct InMemoryLedger {
    entries: Vec<LedgerEntry>,
    next_id: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a ledger from previously persisted entries.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().map_or(1, |id| id + 1);
        Self { entries, next_id }
    }

    pub fn as_slice(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Build the next entry without recording it.
    pub(crate) fn prepare(&self, value: Amount, kind: EntryKind) -> LedgerEntry {
        LedgerEntry {
            id: self.next_id,
            value,
            kind,
        }
    }

    /// Build consecutive entries for a batch without recording them.
    pub(crate) fn prepare_batch(&self, batch: &[(Amount, EntryKind)]) -> Vec<LedgerEntry> {
        batch
            .iter()
            .zip(self.next_id..)
            .map(|(&(value, kind), id)| LedgerEntry { id, value, kind })
            .collect()
    }

    /// Record an entry produced by [`Self::prepare`].
    pub(crate) fn commit(&mut self, entry: LedgerEntry) {
        self.next_id = self.next_id.max(entry.id + 1);
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerReader for InMemoryLedger {
    fn entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        Ok(self.entries.clone())
    }

    fn balance(&self) -> LedgerResult<Amount> {
        sum_entries(&self.entries)
    }

    fn len(&self) -> LedgerResult<usize> {
        Ok(self.entries.len())
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append(&mut self, value: Amount, kind: EntryKind) -> LedgerResult<LedgerEntry> {
        let entry = self.prepare(value, kind);
        self.commit(entry.clone());
        tracing::debug!(id = entry.id, value, %kind, "ledger append");
        Ok(entry)
    }

    fn append_all(&mut self, batch: &[(Amount, EntryKind)]) -> LedgerResult<Vec<LedgerEntry>> {
        let entries = self.prepare_batch(batch);
        for entry in &entries {
            self.commit(entry.clone());
        }
        tracing::debug!(count = entries.len(), "ledger batch append");
        Ok(entries)
    }

    fn reset(&mut self) -> LedgerResult<LedgerEntry> {
        let discarded = self.entries.len();
        self.clear();
        let entry = self.append(INITIAL_BALANCE, EntryKind::Init)?;
        tracing::info!(discarded, "ledger reset");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Ledger;
    use proptest::prelude::*;

    #[test]
    fn empty_ledger_has_zero_balance() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance().unwrap(), 0);
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn stored_zero_reports_zero() {
        let mut ledger = InMemoryLedger::new();
        ledger.append(0, EntryKind::Win).unwrap();
        assert_eq!(ledger.balance().unwrap(), 0);
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let mut ledger = InMemoryLedger::new();
        let a = ledger.append(100, EntryKind::Init).unwrap();
        let b = ledger.append(-10, EntryKind::Bet).unwrap();
        let c = ledger.append(9, EntryKind::Win).unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        assert_eq!(ledger.balance().unwrap(), 99);
    }

    #[test]
    fn entries_preserve_insertion_order() {
        let mut ledger = InMemoryLedger::new();
        ledger.append(100, EntryKind::Init).unwrap();
        ledger.append(-5, EntryKind::Bet).unwrap();
        let kinds: Vec<EntryKind> = ledger.entries().unwrap().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EntryKind::Init, EntryKind::Bet]);
    }

    #[test]
    fn append_all_assigns_consecutive_ids() {
        let mut ledger = InMemoryLedger::new();
        ledger.bootstrap().unwrap();
        let written = ledger
            .append_all(&[(-10, EntryKind::Bet), (20, EntryKind::Win)])
            .unwrap();
        assert_eq!(written.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(ledger.balance().unwrap(), 110);
        assert_eq!(ledger.append(-1, EntryKind::Bet).unwrap().id, 4);
    }

    #[test]
    fn reset_leaves_single_init_entry() {
        let mut ledger = InMemoryLedger::new();
        ledger.append(100, EntryKind::Init).unwrap();
        ledger.append(-40, EntryKind::Bet).unwrap();
        ledger.append(120, EntryKind::Win).unwrap();

        let init = ledger.reset().unwrap();
        assert_eq!(init.kind, EntryKind::Init);
        assert_eq!(init.value, INITIAL_BALANCE);
        assert_eq!(ledger.len().unwrap(), 1);
        assert_eq!(ledger.balance().unwrap(), 100);
    }

    #[test]
    fn ids_are_not_reused_after_reset() {
        let mut ledger = InMemoryLedger::new();
        ledger.append(100, EntryKind::Init).unwrap();
        ledger.append(-10, EntryKind::Bet).unwrap();
        let init = ledger.reset().unwrap();
        assert_eq!(init.id, 3);
    }

    #[test]
    fn bootstrap_only_seeds_empty_ledgers() {
        let mut ledger = InMemoryLedger::new();
        let seeded = ledger.bootstrap().unwrap();
        assert_eq!(seeded.map(|e| e.value), Some(INITIAL_BALANCE));

        ledger.append(-30, EntryKind::Bet).unwrap();
        assert!(ledger.bootstrap().unwrap().is_none());
        assert_eq!(ledger.balance().unwrap(), 70);
    }

    #[test]
    fn from_entries_continues_numbering() {
        let restored = InMemoryLedger::from_entries(vec![
            LedgerEntry { id: 4, value: 100, kind: EntryKind::Init },
            LedgerEntry { id: 5, value: -1, kind: EntryKind::Bet },
        ]);
        let mut ledger = restored;
        let next = ledger.append(1, EntryKind::Win).unwrap();
        assert_eq!(next.id, 6);
    }

    fn arb_kind() -> impl Strategy<Value = EntryKind> {
        prop_oneof![
            Just(EntryKind::Init),
            Just(EntryKind::Bet),
            Just(EntryKind::Win),
        ]
    }

    proptest! {
        #[test]
        fn balance_is_sum_of_values(
            ops in proptest::collection::vec((-1_000_000i64..1_000_000, arb_kind()), 0..64)
        ) {
            let mut ledger = InMemoryLedger::new();
            let mut expected = 0i64;
            for (value, kind) in ops {
                ledger.append(value, kind).unwrap();
                expected += value;
                prop_assert_eq!(ledger.balance().unwrap(), expected);
            }
            let sum: i64 = ledger.entries().unwrap().iter().map(|e| e.value).sum();
            prop_assert_eq!(ledger.balance().unwrap(), sum);
        }

        #[test]
        fn reset_always_yields_initial_balance(
            values in proptest::collection::vec(-500i64..500, 0..32)
        ) {
            let mut ledger = InMemoryLedger::new();
            for value in values {
                ledger.append(value, EntryKind::Bet).unwrap();
            }
            ledger.reset().unwrap();
            prop_assert_eq!(ledger.balance().unwrap(), INITIAL_BALANCE);
            prop_assert_eq!(ledger.len().unwrap(), 1);
        }
    }
}
