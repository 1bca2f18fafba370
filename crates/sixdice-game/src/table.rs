use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use sixdice_ledger::{EntryKind, Ledger, LedgerEntry, LedgerError};
use sixdice_types::{Amount, DiceRoll};
use tracing::info;

use crate::combination::check_combination;
use crate::dice::DiceSource;
use crate::error::{GameError, GameResult};

/// Result of one bet-and-roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub dice: DiceRoll,
    pub combination: Option<String>,
    pub win: Amount,
    pub balance: Amount,
}

struct TableState {
    ledger: Box<dyn Ledger>,
    dice: Box<dyn DiceSource>,
}

/// The game surface: owns the ledger and the dice source.
///
/// Every operation takes the same lock, so a roll's debit and credit are
/// applied as one unit and readers never see a half-finished roll.
pub struct GameTable {
    state: Mutex<TableState>,
}

impl GameTable {
    /// Take ownership of a ledger, seeding it with the initial balance if empty.
    pub fn open<L, D>(mut ledger: L, dice: D) -> GameResult<Self>
    where
        L: Ledger + 'static,
        D: DiceSource + 'static,
    {
        ledger.bootstrap()?;
        Ok(Self {
            state: Mutex::new(TableState {
                ledger: Box::new(ledger),
                dice: Box::new(dice),
            }),
        })
    }

    fn lock(&self) -> GameResult<MutexGuard<'_, TableState>> {
        self.state
            .lock()
            .map_err(|_| GameError::Ledger(LedgerError::LockPoisoned))
    }

    pub fn balance(&self) -> GameResult<Amount> {
        Ok(self.lock()?.ledger.balance()?)
    }

    /// Place a bet and roll six dice.
    ///
    /// Validation happens before the ledger is touched: `InvalidBet` for a
    /// non-positive bet, then `InsufficientBalance` when the bet exceeds the
    /// current balance. The dice are drawn and scored before anything is
    /// written.
    pub fn roll(&self, bet: Amount) -> GameResult<RollOutcome> {
        if bet <= 0 {
            return Err(GameError::InvalidBet(bet));
        }

        let mut state = self.lock()?;
        let balance = state.ledger.balance()?;
        if bet > balance {
            return Err(GameError::InsufficientBalance { bet, balance });
        }

        let dice = state.dice.roll();
        let result = check_combination(&dice);

        // Debit and credit are written as one batch, so a failed write never
        // leaves a stake without its payout.
        let (win, batch) = if result.multiplier.is_zero() {
            (0, vec![(-bet, EntryKind::Bet)])
        } else {
            let win = result.multiplier.payout(bet);
            (win, vec![(-bet, EntryKind::Bet), (win, EntryKind::Win)])
        };
        state.ledger.append_all(&batch)?;

        let balance = state.ledger.balance()?;
        info!(
            bet,
            %dice,
            combination = %result.combination,
            win,
            balance,
            "roll settled"
        );

        Ok(RollOutcome {
            dice,
            combination: result.name.map(str::to_owned),
            win,
            balance,
        })
    }

    /// Discard all history and start over from the initial balance.
    pub fn reset(&self) -> GameResult<Amount> {
        let mut state = self.lock()?;
        state.ledger.reset()?;
        Ok(state.ledger.balance()?)
    }

    /// Every ledger entry in insertion order.
    pub fn history(&self) -> GameResult<Vec<LedgerEntry>> {
        Ok(self.lock()?.ledger.entries()?)
    }
}
