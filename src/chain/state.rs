//! Traffic state labels and probability vectors over them.

use std::fmt;
use std::ops::Index;

use serde::Serialize;

use super::error::MarkovError;

/// Number of traffic states in the chain.
pub const NUM_STATES: usize = 3;

/// Tolerance for "sums to 1" checks on probability vectors.
pub const STOCHASTIC_TOLERANCE: f64 = 1e-9;

/// Traffic condition on the modelled road.
///
/// The discriminant is the row/column index used by every matrix and vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrafficState {
    Light = 0,
    Heavy = 1,
    Gridlock = 2,
}

impl TrafficState {
    /// All states in index order.
    pub const ALL: [TrafficState; NUM_STATES] = [Self::Light, Self::Heavy, Self::Gridlock];

    /// Row/column index of the state.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Heavy => "Heavy",
            Self::Gridlock => "Gridlock",
        }
    }
}

impl fmt::Display for TrafficState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Probability distribution over the traffic states.
///
/// Entries are non-negative and sum to 1. Vectors built with
/// [`ProbVector::new`] are validated; vectors produced by the chain
/// operations inherit the property from their inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbVector([f64; NUM_STATES]);

impl ProbVector {
    /// Validates and wraps a probability vector.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidInput`] if an entry is negative or
    /// non-finite, or if the entries do not sum to 1 within
    /// [`STOCHASTIC_TOLERANCE`]. The vector is never renormalised.
    pub fn new(values: [f64; NUM_STATES]) -> Result<Self, MarkovError> {
        for (state, &p) in TrafficState::ALL.iter().zip(values.iter()) {
            if !p.is_finite() {
                return Err(MarkovError::invalid_input(format!(
                    "initial probability for {state} is not finite ({p})"
                )));
            }
            if p < 0.0 {
                return Err(MarkovError::invalid_input(format!(
                    "initial probability for {state} is negative ({p})"
                )));
            }
        }
        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > STOCHASTIC_TOLERANCE {
            return Err(MarkovError::invalid_input(format!(
                "initial vector sums to {sum}, expected 1"
            )));
        }
        Ok(Self(values))
    }

    /// Point mass on a single state.
    pub fn certain(state: TrafficState) -> Self {
        let mut values = [0.0; NUM_STATES];
        values[state.index()] = 1.0;
        Self(values)
    }

    /// Uniform distribution.
    pub fn uniform() -> Self {
        Self([1.0 / NUM_STATES as f64; NUM_STATES])
    }

    /// Wraps values already known to be a distribution.
    pub(crate) fn from_raw(values: [f64; NUM_STATES]) -> Self {
        Self(values)
    }

    /// Raw probabilities in state index order.
    pub fn as_array(&self) -> &[f64; NUM_STATES] {
        &self.0
    }

    /// Sum of the entries.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Largest absolute difference between two vectors.
    pub fn max_abs_diff(&self, other: &ProbVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Iterates `(state, probability)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (TrafficState, f64)> + '_ {
        TrafficState::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

impl Index<TrafficState> for ProbVector {
    type Output = f64;

    fn index(&self, state: TrafficState) -> &f64 {
        &self.0[state.index()]
    }
}

impl fmt::Display for ProbVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Light={:.4}  Heavy={:.4}  Gridlock={:.4}",
            self.0[0], self.0[1], self.0[2]
        )
    }
}
