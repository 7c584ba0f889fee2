//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use traffic_markov::chain::{RawMatrix, TransitionMatrix};
use traffic_markov::sim::period::{PeriodMatrices, PeriodSchedule};

/// Early-period matrix of the baseline day.
pub const EARLY: RawMatrix = [[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]];
/// RushHour-period matrix of the baseline day.
pub const RUSH_HOUR: RawMatrix = [[0.2, 0.5, 0.3], [0.1, 0.5, 0.4], [0.0, 0.2, 0.8]];
/// Late-period matrix of the baseline day.
pub const LATE: RawMatrix = [[0.6, 0.3, 0.1], [0.4, 0.4, 0.2], [0.1, 0.3, 0.6]];

/// Baseline step count (08:00 to 20:00 in 10-minute steps).
pub const NUM_STEPS: usize = 72;

/// Baseline matrices, one per period.
pub fn baseline_matrices() -> PeriodMatrices {
    PeriodMatrices {
        early: TransitionMatrix::new(EARLY).expect("early matrix is stochastic"),
        rush_hour: TransitionMatrix::new(RUSH_HOUR).expect("rush hour matrix is stochastic"),
        late: TransitionMatrix::new(LATE).expect("late matrix is stochastic"),
    }
}

/// Early 1-48, RushHour 49-60, Late 61-72.
pub fn baseline_schedule() -> PeriodSchedule {
    PeriodSchedule::three_period(48, 60, NUM_STEPS, &baseline_matrices())
        .expect("baseline schedule is contiguous")
}

/// Row vector times matrix, written out independently of the library.
pub fn vec_mat(v: &[f64; 3], m: &RawMatrix) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (i, vi) in v.iter().enumerate() {
        for (j, o) in out.iter_mut().enumerate() {
            *o += vi * m[i][j];
        }
    }
    out
}

/// Largest absolute entry difference between two vectors.
pub fn max_diff(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
