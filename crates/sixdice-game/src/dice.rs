use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sixdice_types::DiceRoll;

/// Source of dice for live rolls.
pub trait DiceSource: Send {
    fn roll(&mut self) -> DiceRoll;
}

/// Dice drawn from a uniform random generator.
#[derive(Debug)]
pub struct RngDice<R = StdRng> {
    rng: R,
}

impl RngDice<StdRng> {
    /// Seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> DiceSource for RngDice<R> {
    fn roll(&mut self) -> DiceRoll {
        self.rng.gen()
    }
}

/// Replays a fixed list of rolls, cycling back to the start.
#[derive(Clone, Debug)]
pub struct FixedDice {
    rolls: Vec<DiceRoll>,
    cursor: usize,
}

impl FixedDice {
    pub fn new(first: DiceRoll) -> Self {
        Self {
            rolls: vec![first],
            cursor: 0,
        }
    }

    pub fn then(mut self, roll: DiceRoll) -> Self {
        self.rolls.push(roll);
        self
    }
}

impl DiceSource for FixedDice {
    fn roll(&mut self) -> DiceRoll {
        let roll = self.rolls[self.cursor];
        self.cursor = (self.cursor + 1) % self.rolls.len();
        roll
    }
}
