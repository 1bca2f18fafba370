use std::fmt;

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of dice drawn per roll.
pub const DICE_PER_ROLL: usize = 6;

/// Number of faces on each die.
pub const FACES: u8 = 6;

/// A single die face in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    /// Create a face, rejecting values outside `1..=6`.
    pub fn new(value: u8) -> Result<Self, TypeError> {
        if (1..=FACES).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeError::InvalidFace(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based index, convenient for per-face count tables.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for Face {
    type Error = TypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Six faces in the order they were drawn.
///
/// A roll is ephemeral: it exists for the duration of one roll operation and
/// its response, and is never written to the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceRoll([Face; DICE_PER_ROLL]);

impl DiceRoll {
    pub fn new(faces: [Face; DICE_PER_ROLL]) -> Self {
        Self(faces)
    }

    /// Build a roll from raw values, validating count and range.
    pub fn from_values(values: &[u8]) -> Result<Self, TypeError> {
        if values.len() != DICE_PER_ROLL {
            return Err(TypeError::InvalidDiceCount {
                expected: DICE_PER_ROLL,
                actual: values.len(),
            });
        }
        let mut faces = [Face(1); DICE_PER_ROLL];
        for (slot, &value) in faces.iter_mut().zip(values) {
            *slot = Face::new(value)?;
        }
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[Face; DICE_PER_ROLL] {
        &self.0
    }

    pub fn values(&self) -> [u8; DICE_PER_ROLL] {
        self.0.map(Face::value)
    }

    /// Occurrences of each face, indexed by `face - 1`.
    pub fn face_counts(&self) -> [u8; FACES as usize] {
        let mut counts = [0u8; FACES as usize];
        for face in &self.0 {
            counts[face.index()] += 1;
        }
        counts
    }
}

/// Uniform draw over `1..=6`.
impl Distribution<Face> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Face {
        Face(rng.gen_range(1..=FACES))
    }
}

/// Six independent uniform faces.
impl Distribution<DiceRoll> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceRoll {
        DiceRoll(std::array::from_fn(|_| rng.gen()))
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for face in &self.0 {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{face}")?;
            first = false;
        }
        Ok(())
    }
}
