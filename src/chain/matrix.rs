//! Validated row-stochastic transition matrices.

use std::fmt;

use serde::Serialize;

use super::error::MarkovError;
use super::state::{NUM_STATES, ProbVector, TrafficState};

/// Raw 3x3 matrix, row `i` holding the transition probabilities out of state `i`.
pub type RawMatrix = [[f64; NUM_STATES]; NUM_STATES];

/// Tolerance for row sums.
///
/// Row error compounds once per step, so this is kept well below
/// [`STOCHASTIC_TOLERANCE`](super::state::STOCHASTIC_TOLERANCE), the bound
/// every propagated vector must meet.
pub const ROW_TOLERANCE: f64 = 1e-12;

/// Row-stochastic 3x3 transition matrix.
///
/// Entry `(i, j)` is the probability of moving from state `i` to state `j`
/// in one step. Immutable once constructed.
///
/// # Examples
///
/// ```
/// use traffic_markov::chain::{ProbVector, TrafficState, TransitionMatrix};
///
/// let m = TransitionMatrix::new([[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]]).unwrap();
/// let next = m.apply(&ProbVector::certain(TrafficState::Light));
/// assert_eq!(next.as_array(), &[0.4, 0.4, 0.2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionMatrix(RawMatrix);

impl TransitionMatrix {
    /// Validates and wraps a transition matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::NotStochastic`] for the first row that holds a
    /// negative or non-finite entry, or whose entries do not sum to 1 within
    /// [`ROW_TOLERANCE`].
    pub fn new(rows: RawMatrix) -> Result<Self, MarkovError> {
        for (row, values) in rows.iter().enumerate() {
            if let Some(&p) = values.iter().find(|p| !p.is_finite()) {
                return Err(MarkovError::NotStochastic {
                    row,
                    reason: format!("has non-finite entry {p}"),
                });
            }
            if let Some(&p) = values.iter().find(|&&p| p < 0.0) {
                return Err(MarkovError::NotStochastic {
                    row,
                    reason: format!("has negative entry {p}"),
                });
            }
            let sum: f64 = values.iter().sum();
            if (sum - 1.0).abs() > ROW_TOLERANCE {
                return Err(MarkovError::NotStochastic {
                    row,
                    reason: format!("sums to {sum}"),
                });
            }
        }
        Ok(Self(rows))
    }

    /// Identity matrix (every state is absorbing).
    pub fn identity() -> Self {
        let mut rows = [[0.0; NUM_STATES]; NUM_STATES];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self(rows)
    }

    /// Raw rows.
    pub fn rows(&self) -> &RawMatrix {
        &self.0
    }

    /// Transition probability `from -> to`.
    pub fn probability(&self, from: TrafficState, to: TrafficState) -> f64 {
        self.0[from.index()][to.index()]
    }

    /// Outgoing distribution of `from`.
    pub fn row(&self, from: TrafficState) -> &[f64; NUM_STATES] {
        &self.0[from.index()]
    }

    /// Row vector times matrix: `next[j] = Σ_i v[i] * M[i][j]`.
    pub fn apply(&self, v: &ProbVector) -> ProbVector {
        let current = v.as_array();
        let mut next = [0.0; NUM_STATES];
        for (j, out) in next.iter_mut().enumerate() {
            *out = (0..NUM_STATES).map(|i| current[i] * self.0[i][j]).sum();
        }
        ProbVector::from_raw(next)
    }
}

impl TryFrom<RawMatrix> for TransitionMatrix {
    type Error = MarkovError;

    fn try_from(rows: RawMatrix) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, row) in TrafficState::ALL.iter().zip(self.0.iter()) {
            writeln!(
                f,
                "{:>9} | {:.3} {:.3} {:.3}",
                state.label(),
                row[0],
                row[1],
                row[2]
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::state::STOCHASTIC_TOLERANCE;

    const EARLY: RawMatrix = [[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]];

    #[test]
    fn accepts_stochastic_rows() {
        assert!(TransitionMatrix::new(EARLY).is_ok());
    }

    #[test]
    fn rejects_row_summing_above_one() {
        let mut rows = EARLY;
        rows[1] = [0.35, 0.5, 0.2]; // 1.05
        let err = TransitionMatrix::new(rows).unwrap_err();
        assert!(matches!(err, MarkovError::NotStochastic { row: 1, .. }));
    }

    #[test]
    fn rejects_negative_entry_even_if_row_sums_to_one() {
        let mut rows = EARLY;
        rows[2] = [-0.1, 0.2, 0.9];
        let err = TransitionMatrix::new(rows).unwrap_err();
        assert!(matches!(err, MarkovError::NotStochastic { row: 2, .. }));
    }

    #[test]
    fn apply_from_light_returns_first_row() {
        let m = TransitionMatrix::new(EARLY).unwrap();
        let next = m.apply(&ProbVector::certain(TrafficState::Light));
        assert_eq!(next.as_array(), &EARLY[0]);
    }

    #[test]
    fn apply_preserves_mass() {
        let m = TransitionMatrix::new(EARLY).unwrap();
        let v = ProbVector::new([0.2, 0.3, 0.5]).unwrap();
        assert!((m.apply(&v).total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn probability_lookup_uses_state_indices() {
        let m = TransitionMatrix::new(EARLY).unwrap();
        assert_eq!(
            m.probability(TrafficState::Gridlock, TrafficState::Gridlock),
            0.9
        );
        assert_eq!(
            m.probability(TrafficState::Gridlock, TrafficState::Light),
            0.0
        );
    }

    #[test]
    fn rejects_non_finite_entries() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut rows = EARLY;
            rows[1] = [0.3, bad, 0.2];
            match TransitionMatrix::new(rows) {
                Err(MarkovError::NotStochastic { row, reason }) => {
                    assert_eq!(row, 1);
                    assert!(reason.contains("non-finite"), "{bad}: {reason}");
                }
                other => panic!("{bad}: expected NotStochastic, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_row_error_above_row_tolerance() {
        let mut rows = EARLY;
        rows[0] = [0.4 + 1e-10, 0.4, 0.2];
        assert!(matches!(
            TransitionMatrix::new(rows),
            Err(MarkovError::NotStochastic { row: 0, .. })
        ));
    }

    #[test]
    fn accepted_row_error_keeps_mass_within_tolerance() {
        let drift = 0.9 * ROW_TOLERANCE;
        let m = TransitionMatrix::new([
            [0.4 + drift, 0.4, 0.2],
            [0.3 + drift, 0.5, 0.2],
            [drift, 0.1, 0.9],
        ])
        .unwrap();
        let mut v = ProbVector::certain(TrafficState::Light);
        for step in 2..=72 {
            v = m.apply(&v);
            assert!(
                (v.total() - 1.0).abs() < STOCHASTIC_TOLERANCE,
                "step {step}: total {}",
                v.total()
            );
        }
    }
}
