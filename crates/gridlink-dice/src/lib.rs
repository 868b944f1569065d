//! Dice engine for Gridlink.
//!
//! Parses dice specifications of the form `[count]d<sides>` (`d20`, `2d6`,
//! `3d8`) and rolls them with uniform independent draws. Parsing and rolling
//! are pure — no game state, no I/O — so the rest of the engine can treat a
//! roll as a value.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors produced while parsing a dice specification.
///
/// A spec that fails to parse performs no roll and records nothing — the
/// caller gets the error and the dice engine stays untouched.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceFormatError {
    /// The spec doesn't match `[count]d<sides>` at all.
    #[error("dice spec must look like `[count]d<sides>`, got {0:?}")]
    Pattern(String),

    /// The count was given explicitly but is zero.
    #[error("dice count must be at least 1")]
    ZeroCount,

    /// Fewer than two sides — nothing to roll.
    #[error("dice must have at least 2 sides")]
    TooFewSides,
}

/// A parsed dice specification: `count` dice of `sides` sides each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
}

impl DiceSpec {
    /// Rolls with the provided RNG. Deterministic under a seeded RNG,
    /// which is how the tests pin down exact outcomes.
    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceRollResult {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();
        let total = rolls.iter().sum();
        DiceRollResult {
            spec: *self,
            total,
            rolls,
        }
    }

    /// Rolls with the thread-local RNG.
    pub fn roll(&self) -> DiceRollResult {
        self.roll_with(&mut rand::rng())
    }
}

impl FromStr for DiceSpec {
    type Err = DiceFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((head, tail)) = s.split_once(['d', 'D']) else {
            return Err(DiceFormatError::Pattern(s.to_string()));
        };

        let count = if head.is_empty() {
            1
        } else {
            head.parse::<u32>()
                .map_err(|_| DiceFormatError::Pattern(s.to_string()))?
        };
        let sides = tail
            .parse::<u32>()
            .map_err(|_| DiceFormatError::Pattern(s.to_string()))?;

        if count == 0 {
            return Err(DiceFormatError::ZeroCount);
        }
        if sides < 2 {
            return Err(DiceFormatError::TooFewSides);
        }

        Ok(Self { count, sides })
    }
}

impl fmt::Display for DiceSpec {
    /// Renders in the wire form the DM service uses: `d20`, `2d6`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "d{}", self.sides)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// The outcome of one roll: the spec that produced it, the grand total,
/// and every individual die in roll order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRollResult {
    pub spec: DiceSpec,
    pub total: u32,
    pub rolls: Vec<u32>,
}
