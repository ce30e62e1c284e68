//! Difficulty-weighted price threshold.
//!
//! A batch of edits with difficulty `d` (basis points of [`BASIS_POINTS`]) only
//! executes when the accept price beats the reject price by more than `d`:
//!
//! ```text
//! twap_accept * BASIS_POINTS > twap_reject * (BASIS_POINTS + d)
//! ```
//!
//! Prices and difficulty are `u64`; both products are formed in `u128`, which
//! cannot overflow once `d < u64::MAX - BASIS_POINTS`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-point denominator for difficulty margins: 100_000 = 100%.
pub const BASIS_POINTS: u64 = 100_000;

/// Largest difficulty the threshold arithmetic accepts (exclusive).
pub const MAX_DIFFICULTY: u64 = u64::MAX - BASIS_POINTS;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Difficulty(u64);

impl Difficulty {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(basis_points: u64) -> Self {
        Self(basis_points)
    }

    #[must_use]
    pub const fn basis_points(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("difficulty {difficulty} exceeds the supported maximum {max}")]
    DifficultyTooLarge { difficulty: Difficulty, max: u64 },
}

/// Resolved prices the gate compares, as reported by the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePair {
    pub twap_reject: u64,
    pub twap_accept: u64,
}

impl PricePair {
    /// Whether the accept price clears the reject price by the margin `difficulty` demands.
    pub fn clears(self, difficulty: Difficulty) -> Result<bool, ThresholdError> {
        if difficulty.0 >= MAX_DIFFICULTY {
            return Err(ThresholdError::DifficultyTooLarge {
                difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        let accept = u128::from(self.twap_accept) * u128::from(BASIS_POINTS);
        let reject = u128::from(self.twap_reject) * u128::from(BASIS_POINTS + difficulty.0);
        Ok(accept > reject)
    }
}
