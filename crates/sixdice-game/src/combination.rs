use std::fmt;

use serde::{Deserialize, Serialize};
use sixdice_types::{DiceRoll, Multiplier};

/// Scoring patterns, most specific first.
///
/// | Sorted counts        | Name          | Multiplier |
/// |----------------------|---------------|------------|
/// | `[6]`                | "Yahtzee"     | 8          |
/// | `[4, 2]`             | "4+2"         | 3          |
/// | `[2, 2, 2]`          | "Three Pairs" | 2          |
/// | any count >= 2       | "Pair"        | 0.9        |
/// | otherwise            | none          | 0          |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Combination {
    Yahtzee,
    FourPlusTwo,
    ThreePairs,
    Pair,
    Nothing,
}

impl Combination {
    pub const COUNT: usize = 5;

    pub const ALL: [Combination; Self::COUNT] = [
        Self::Yahtzee,
        Self::FourPlusTwo,
        Self::ThreePairs,
        Self::Pair,
        Self::Nothing,
    ];

    /// Classify a roll by the shape of its face counts.
    ///
    /// Checks run in paytable order; `Pair` is the catch-all for any repeated
    /// face not matched by a more specific pattern.
    pub fn classify(roll: &DiceRoll) -> Self {
        let mut counts: Vec<u8> = roll
            .face_counts()
            .into_iter()
            .filter(|&c| c > 0)
            .collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));

        match counts.as_slice() {
            [6] => Self::Yahtzee,
            [4, 2] => Self::FourPlusTwo,
            _ if counts.iter().filter(|&&c| c == 2).count() == 3 => Self::ThreePairs,
            _ if counts.iter().any(|&c| c >= 2) => Self::Pair,
            _ => Self::Nothing,
        }
    }

    /// Display label, `None` when nothing matched.
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Yahtzee => Some("Yahtzee"),
            Self::FourPlusTwo => Some("4+2"),
            Self::ThreePairs => Some("Three Pairs"),
            Self::Pair => Some("Pair"),
            Self::Nothing => None,
        }
    }

    pub fn multiplier(self) -> Multiplier {
        match self {
            Self::Yahtzee => Multiplier::from_integer(8),
            Self::FourPlusTwo => Multiplier::from_integer(3),
            Self::ThreePairs => Multiplier::from_integer(2),
            Self::Pair => Multiplier::from_hundredths(90),
            Self::Nothing => Multiplier::ZERO,
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name().unwrap_or("None"))
    }
}

/// Outcome of scoring one roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombinationResult {
    pub combination: Combination,
    pub name: Option<&'static str>,
    pub multiplier: Multiplier,
}

/// Score a roll. Pure and deterministic.
pub fn check_combination(roll: &DiceRoll) -> CombinationResult {
    let combination = Combination::classify(roll);
    CombinationResult {
        combination,
        name: combination.name(),
        multiplier: combination.multiplier(),
    }
}
