//! Seeded Monte Carlo realisations of the traffic chain.
//!
//! Used to cross-check the analytic trajectory: with enough runs the
//! per-step state frequencies approach the propagated distribution.

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::chain::{MarkovError, NUM_STATES, ProbVector, TrafficState};

use super::period::PeriodSchedule;
use super::types::{StepRecord, TimeAxis, Trajectory};

/// Draws a state from `distribution` by inverse CDF.
pub fn sample_state(distribution: &[f64; NUM_STATES], rng: &mut StdRng) -> TrafficState {
    let u: f64 = rng.random();
    let mut cumulative = 0.0;
    for (state, &p) in TrafficState::ALL.iter().zip(distribution.iter()) {
        cumulative += p;
        if u < cumulative {
            return *state;
        }
    }
    // Rounding left the cumulative sum just under u.
    TrafficState::ALL
        .iter()
        .rev()
        .zip(distribution.iter().rev())
        .find(|(_, p)| **p > 0.0)
        .map_or(TrafficState::Gridlock, |(s, _)| *s)
}

/// Samples one concrete state path of length `num_steps`.
///
/// The first state is drawn from `initial`; every next state is drawn from
/// the row of the current state in the matrix of the next step's segment.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidInput`] if `num_steps` is zero or not covered by the schedule.
pub fn sample_path(
    initial: &ProbVector,
    schedule: &PeriodSchedule,
    num_steps: usize,
    rng: &mut StdRng,
) -> Result<Vec<TrafficState>, MarkovError> {
    if num_steps == 0 {
        return Err(MarkovError::invalid_input("num_steps must be > 0"));
    }
    schedule.ensure_covers(num_steps)?;

    let mut path = Vec::with_capacity(num_steps);
    let mut state = sample_state(initial.as_array(), rng);
    path.push(state);
    for step in 2..=num_steps {
        let matrix = schedule
            .matrix_for(step)
            .ok_or_else(|| MarkovError::invalid_input(format!("no segment covers step {step}")))?;
        state = sample_state(matrix.row(state), rng);
        path.push(state);
    }
    Ok(path)
}

/// Estimates the trajectory from `runs` sampled paths.
///
/// Each record holds the fraction of paths in each state at that step.
/// Identical arguments always give an identical estimate.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidInput`] for a malformed initial vector,
/// `runs == 0`, or a step count the schedule does not cover.
pub fn estimate_trajectory(
    initial: [f64; NUM_STATES],
    schedule: &PeriodSchedule,
    axis: &TimeAxis,
    runs: usize,
    seed: u64,
) -> Result<Trajectory, MarkovError> {
    if runs == 0 {
        return Err(MarkovError::invalid_input("sample runs must be > 0"));
    }
    let initial = ProbVector::new(initial)?;
    let num_steps = axis.num_steps;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut counts = vec![[0_usize; NUM_STATES]; num_steps];
    for _ in 0..runs {
        let path = sample_path(&initial, schedule, num_steps, &mut rng)?;
        for (step_counts, state) in counts.iter_mut().zip(path) {
            step_counts[state.index()] += 1;
        }
    }

    let mut records = Vec::with_capacity(num_steps);
    for (idx, step_counts) in counts.iter().enumerate() {
        let step = idx + 1;
        let period = schedule
            .period_for(step)
            .ok_or_else(|| MarkovError::invalid_input(format!("no segment covers step {step}")))?;
        records.push(StepRecord {
            step,
            time_hr: axis.hour_at(step),
            period,
            vector: ProbVector::from_raw(step_counts.map(|c| c as f64 / runs as f64)),
        });
    }
    debug!("estimated trajectory from {runs} sampled paths (seed {seed})");
    Ok(Trajectory::from_records(records))
}
