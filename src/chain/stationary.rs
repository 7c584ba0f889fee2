//! Stationary distributions of a single transition matrix.
//!
//! [`steady_state`] solves the fixed-point system directly. Power iteration
//! ([`steady_state_power`]) is kept as the alternative: it only converges for
//! aperiodic chains and slows down when a state is nearly absorbing.

use tracing::{debug, warn};

use super::error::MarkovError;
use super::matrix::TransitionMatrix;
use super::state::{NUM_STATES, ProbVector, TrafficState};

/// Pivots below this magnitude are treated as zero during elimination.
const PIVOT_EPSILON: f64 = 1e-12;

/// Negative rounding residue above this bound is cleared to zero.
const RESIDUE_EPSILON: f64 = 1e-12;

/// Returns the closed communicating classes of the chain.
///
/// Positive entries are edges of the transition graph. A class is closed
/// when no edge leaves it. Classes are ordered by their lowest state index
/// and list their states in index order.
pub fn closed_classes(matrix: &TransitionMatrix) -> Vec<Vec<TrafficState>> {
    let rows = matrix.rows();
    let mut reach = [[false; NUM_STATES]; NUM_STATES];
    for i in 0..NUM_STATES {
        for j in 0..NUM_STATES {
            reach[i][j] = i == j || rows[i][j] > 0.0;
        }
    }
    // Warshall transitive closure.
    for k in 0..NUM_STATES {
        for i in 0..NUM_STATES {
            if reach[i][k] {
                for j in 0..NUM_STATES {
                    reach[i][j] |= reach[k][j];
                }
            }
        }
    }

    let mut assigned = [false; NUM_STATES];
    let mut classes = Vec::new();
    for i in 0..NUM_STATES {
        if assigned[i] {
            continue;
        }
        let members: Vec<usize> = (0..NUM_STATES)
            .filter(|&j| reach[i][j] && reach[j][i])
            .collect();
        for &m in &members {
            assigned[m] = true;
        }
        let closed = members
            .iter()
            .all(|&m| (0..NUM_STATES).all(|j| !reach[m][j] || members.contains(&j)));
        if closed {
            classes.push(members.into_iter().map(|m| TrafficState::ALL[m]).collect());
        }
    }
    classes
}

/// Computes the unique stationary distribution of `matrix`.
///
/// Solves `v (M - I) = 0` with the last equation replaced by `Σ v = 1`,
/// using Gaussian elimination with partial pivoting.
///
/// # Errors
///
/// - [`MarkovError::NoUniqueStationaryDistribution`] if the chain has more
///   than one closed class.
/// - [`MarkovError::SingularSystem`] if elimination meets a vanishing pivot.
///
/// # Examples
///
/// ```
/// use traffic_markov::chain::{TransitionMatrix, steady_state};
///
/// let m = TransitionMatrix::new([[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]]).unwrap();
/// let v = steady_state(&m).unwrap();
/// assert!((v.as_array()[2] - 2.0 / 3.0).abs() < 1e-9);
/// ```
pub fn steady_state(matrix: &TransitionMatrix) -> Result<ProbVector, MarkovError> {
    let classes = closed_classes(matrix);
    if classes.len() != 1 {
        return Err(MarkovError::NoUniqueStationaryDistribution {
            closed_classes: classes.len(),
        });
    }

    // Row r of the system is the balance equation of state r:
    // Σ_i v_i M[i][r] - v_r = 0.
    let rows = matrix.rows();
    let mut a = [[0.0; NUM_STATES]; NUM_STATES];
    for (r, eq) in a.iter_mut().enumerate() {
        for (i, coeff) in eq.iter_mut().enumerate() {
            *coeff = rows[i][r] - if i == r { 1.0 } else { 0.0 };
        }
    }
    a[NUM_STATES - 1] = [1.0; NUM_STATES];
    let mut b = [0.0; NUM_STATES];
    b[NUM_STATES - 1] = 1.0;

    let solution = solve(a, b)?;

    let mut cleaned = solution.map(|x| {
        if x < 0.0 && x > -RESIDUE_EPSILON {
            0.0
        } else {
            x
        }
    });
    let total: f64 = cleaned.iter().sum();
    for x in &mut cleaned {
        *x /= total;
    }
    debug!("steady state solved directly: {cleaned:?}");
    Ok(ProbVector::from_raw(cleaned))
}

/// Approximates the stationary distribution by repeated multiplication.
///
/// Starts from the uniform vector and stops once successive vectors differ
/// by at most `tolerance` in every entry. Returns the vector and the number
/// of multiplications performed.
///
/// # Errors
///
/// Returns [`MarkovError::DidNotConverge`] when `max_iterations` is reached,
/// which is certain for periodic chains.
pub fn steady_state_power(
    matrix: &TransitionMatrix,
    tolerance: f64,
    max_iterations: usize,
) -> Result<(ProbVector, usize), MarkovError> {
    let mut current = ProbVector::uniform();
    for iteration in 1..=max_iterations {
        let next = matrix.apply(&current);
        if next.max_abs_diff(&current) <= tolerance {
            return Ok((next, iteration));
        }
        current = next;
    }
    warn!("power iteration gave up after {max_iterations} iterations");
    Err(MarkovError::DidNotConverge {
        iterations: max_iterations,
    })
}

/// Solves `a x = b` for the 3x3 system.
fn solve(
    mut a: [[f64; NUM_STATES]; NUM_STATES],
    mut b: [f64; NUM_STATES],
) -> Result<[f64; NUM_STATES], MarkovError> {
    for col in 0..NUM_STATES {
        let pivot_row = (col..NUM_STATES)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row][col];
        if pivot.abs() < PIVOT_EPSILON {
            return Err(MarkovError::SingularSystem {
                column: col,
                pivot: pivot.abs(),
            });
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..NUM_STATES {
            let factor = a[row][col] / a[col][col];
            for k in col..NUM_STATES {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; NUM_STATES];
    for row in (0..NUM_STATES).rev() {
        let tail: f64 = (row + 1..NUM_STATES).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}
