use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Amount;

/// Fixed-point payout multiplier stored in hundredths.
///
/// Payouts are computed as `bet * hundredths / 100` in integer arithmetic, so
/// truncation of fractional multipliers such as 0.9 is identical on every
/// platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ZERO: Self = Self(0);

    const SCALE: u32 = 100;

    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub const fn from_integer(value: u32) -> Self {
        Self(value * Self::SCALE)
    }

    pub const fn hundredths(self) -> u32 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `floor(bet * multiplier)` for a non-negative bet.
    ///
    /// Saturates at `Amount::MAX` rather than wrapping.
    pub fn payout(self, bet: Amount) -> Amount {
        let scaled = bet as i128 * self.0 as i128 / Self::SCALE as i128;
        Amount::try_from(scaled).unwrap_or(Amount::MAX)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::SCALE;
        let frac = self.0 % Self::SCALE;
        match frac {
            0 => write!(f, "{whole}"),
            _ if frac % 10 == 0 => write!(f, "{whole}.{}", frac / 10),
            _ => write!(f, "{whole}.{frac:02}"),
        }
    }
}
