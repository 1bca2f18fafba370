use std::collections::BTreeMap;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sixdice_types::{Amount, DiceRoll};
use tracing::info;

use crate::combination::{check_combination, Combination};
use crate::error::{GameError, GameResult};

pub const DEFAULT_ITERATIONS: i64 = 100_000;
pub const DEFAULT_BET: Amount = 10;

/// Rolls simulated by one rayon task.
const CHUNK_SIZE: i64 = 4_096;

/// Largest multiplier on the paytable; bounds the possible total win.
const MAX_PAYOUT_FACTOR: i64 = 8;

/// Long-run return-to-player estimate. Never touches a ledger.
#[derive(Clone, Debug)]
pub struct Simulation {
    pub iterations: i64,
    pub bet: Amount,
    pub seed: Option<u64>,
    pub max_iterations: Option<u64>,
}

/// Aggregate result of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub simulated_rolls: i64,
    pub total_bet: Amount,
    pub total_win: Amount,
    #[serde(rename = "RTP")]
    pub rtp: String,
    pub hits: BTreeMap<String, u64>,
    pub seed: u64,
}

impl SimulationReport {
    /// RTP as a plain percentage.
    pub fn rtp_percent(&self) -> f64 {
        rtp_percent(self.total_win, self.total_bet)
    }
}

/// Partial sums for one chunk, merged at the end.
#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    rolls: i64,
    total_win: Amount,
    hits: [u64; Combination::COUNT],
}

impl Tally {
    fn record(&mut self, combination: Combination, win: Amount) {
        self.rolls += 1;
        self.total_win += win;
        self.hits[combination as usize] += 1;
    }

    fn merge(mut self, other: Self) -> Self {
        self.rolls += other.rolls;
        self.total_win += other.total_win;
        for (mine, theirs) in self.hits.iter_mut().zip(other.hits) {
            *mine += theirs;
        }
        self
    }
}

impl Simulation {
    pub fn new(iterations: i64, bet: Amount) -> Self {
        Self {
            iterations,
            bet,
            seed: None,
            max_iterations: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    fn validate(&self) -> GameResult<()> {
        let invalid = GameError::InvalidIterationCount {
            iterations: self.iterations,
            bet: self.bet,
        };
        if self.iterations <= 0 || self.bet <= 0 {
            return Err(invalid);
        }
        if let Some(max) = self.max_iterations {
            if self.iterations as u64 > max {
                return Err(invalid);
            }
        }
        // The largest possible total win must fit in an Amount.
        let ceiling = self
            .iterations
            .checked_mul(self.bet)
            .and_then(|total| total.checked_mul(MAX_PAYOUT_FACTOR));
        if ceiling.is_none() {
            return Err(invalid);
        }
        Ok(())
    }

    /// Run the simulation across the rayon pool.
    ///
    /// Each chunk draws from its own generator seeded with `seed + chunk`, so
    /// a seeded run gives the same report regardless of thread count.
    pub fn run(&self) -> GameResult<SimulationReport> {
        self.validate()?;

        let seed = self.seed.unwrap_or_else(rand::random);
        let bet = self.bet;
        let iterations = self.iterations;
        let chunks = (iterations + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let started = Instant::now();

        let tally = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let len = CHUNK_SIZE.min(iterations - chunk * CHUNK_SIZE);
                let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(chunk as u64));
                let mut tally = Tally::default();
                for _ in 0..len {
                    let dice: DiceRoll = rng.gen();
                    let result = check_combination(&dice);
                    let win = if result.multiplier.is_zero() {
                        0
                    } else {
                        result.multiplier.payout(bet)
                    };
                    tally.record(result.combination, win);
                }
                tally
            })
            .reduce(Tally::default, Tally::merge);

        let total_bet = tally.rolls * bet;
        let hits = Combination::ALL
            .iter()
            .map(|combination| (combination.to_string(), tally.hits[*combination as usize]))
            .collect();

        let report = SimulationReport {
            simulated_rolls: tally.rolls,
            total_bet,
            total_win: tally.total_win,
            rtp: format!("{:.2}%", rtp_percent(tally.total_win, total_bet)),
            hits,
            seed,
        };

        info!(
            rolls = report.simulated_rolls,
            bet,
            rtp = %report.rtp,
            seed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation complete"
        );
        Ok(report)
    }
}

fn rtp_percent(total_win: Amount, total_bet: Amount) -> f64 {
    total_win as f64 / total_bet as f64 * 100.0
}
