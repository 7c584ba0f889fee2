//! Error taxonomy for chain construction, simulation and steady-state solving.

use thiserror::Error;

/// Failure of a chain operation.
///
/// Every variant is a configuration or programming error: none is retried,
/// and the failing operation produces no partial output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkovError {
    /// Malformed initial vector, step count, or schedule coverage.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable description of the violated constraint.
        reason: String,
    },

    /// A transition matrix row is not a probability distribution.
    #[error("matrix is not row-stochastic: row {row} {reason}")]
    NotStochastic {
        /// Offending row index (0-based).
        row: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// The chain has several closed classes, so the stationary distribution is not unique.
    #[error("no unique stationary distribution: chain has {closed_classes} closed classes")]
    NoUniqueStationaryDistribution {
        /// Number of closed communicating classes found.
        closed_classes: usize,
    },

    /// The normalised fixed-point system could not be solved.
    #[error("stationary system is singular (pivot {pivot:e} in column {column})")]
    SingularSystem {
        /// Column where elimination stalled.
        column: usize,
        /// Magnitude of the best available pivot.
        pivot: f64,
    },

    /// Power iteration exhausted its iteration budget.
    #[error("power iteration did not converge within {iterations} iterations")]
    DidNotConverge {
        /// Iterations performed before giving up.
        iterations: usize,
    },
}

impl MarkovError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
