use std::fmt;

use serde::{Deserialize, Serialize};
use sixdice_types::Amount;

use crate::error::{LedgerError, LedgerResult};

/// Value of the `Init` entry written on bootstrap and after every reset.
pub const INITIAL_BALANCE: Amount = 100;

/// Cause of a balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Starting credit.
    Init,
    /// Stake debited before the dice are drawn (negative).
    Bet,
    /// Payout credited after a scoring combination (non-negative).
    Win,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "Init",
            Self::Bet => "Bet",
            Self::Win => "Win",
        };
        f.pad(name)
    }
}

/// One immutable row of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: u64,
    pub value: Amount,
    pub kind: EntryKind,
}

/// Checked sum of entry values.
pub(crate) fn sum_entries<'a, I>(entries: I) -> LedgerResult<Amount>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut total: Amount = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        total = total
            .checked_add(entry.value)
            .ok_or(LedgerError::Overflow { entries: index + 1 })?;
    }
    Ok(total)
}
