//! Period-segmented propagation of the state distribution.

use tracing::{debug, trace};

use crate::chain::{MarkovError, NUM_STATES, ProbVector, TransitionMatrix};

use super::period::PeriodSchedule;
use super::types::{StepRecord, TimeAxis, Trajectory};

/// Clock hour of step 1 when no axis is given.
pub const DEFAULT_START_HOUR: f64 = 8.0;
/// Clock hour of the last step when no axis is given.
pub const DEFAULT_END_HOUR: f64 = 20.0;

/// Advances the distribution by one step: `current · matrix`.
///
/// The accumulator is taken and returned by value so each step's input and
/// output are explicit.
pub fn advance(current: ProbVector, matrix: &TransitionMatrix) -> ProbVector {
    matrix.apply(&current)
}

/// Simulates `num_steps` steps on the default 8:00-20:00 display axis.
///
/// See [`simulate_with_axis`].
///
/// # Errors
///
/// Same as [`simulate_with_axis`].
pub fn simulate(
    initial: [f64; NUM_STATES],
    schedule: &PeriodSchedule,
    num_steps: usize,
) -> Result<Trajectory, MarkovError> {
    let axis = TimeAxis::new(DEFAULT_START_HOUR, DEFAULT_END_HOUR, num_steps);
    simulate_with_axis(initial, schedule, &axis)
}

/// Propagates `initial` through the schedule for `axis.num_steps` steps.
///
/// Step 1 records `initial` unchanged. Each later step `t` records the
/// previous vector times the matrix of the segment containing `t`, so the
/// move from the last step of one period to the first step of the next uses
/// the next period's matrix.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidInput`] before any step runs if `initial`
/// is not a probability vector, `num_steps` is zero, or the schedule does not
/// reach `num_steps`.
pub fn simulate_with_axis(
    initial: [f64; NUM_STATES],
    schedule: &PeriodSchedule,
    axis: &TimeAxis,
) -> Result<Trajectory, MarkovError> {
    let num_steps = axis.num_steps;
    if num_steps == 0 {
        return Err(MarkovError::invalid_input("num_steps must be > 0"));
    }
    let initial = ProbVector::new(initial)?;
    schedule.ensure_covers(num_steps)?;

    let mut records = Vec::with_capacity(num_steps);
    let mut current = initial;
    for step in 1..=num_steps {
        let segment = schedule
            .segment_for(step)
            .ok_or_else(|| MarkovError::invalid_input(format!("no segment covers step {step}")))?;
        if step > 1 {
            current = advance(current, &segment.matrix);
        }
        trace!("step {step} ({}): {current}", segment.period);
        records.push(StepRecord {
            step,
            time_hr: axis.hour_at(step),
            period: segment.period,
            vector: current,
        });
    }

    debug!(
        "simulated {num_steps} steps across {} segments",
        schedule.segments().len()
    );
    Ok(Trajectory::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::TrafficState;
    use crate::sim::period::{Period, PeriodMatrices};

    fn matrices() -> PeriodMatrices {
        PeriodMatrices {
            early: TransitionMatrix::new([[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]])
                .unwrap(),
            rush_hour: TransitionMatrix::new([[0.2, 0.5, 0.3], [0.1, 0.5, 0.4], [0.0, 0.2, 0.8]])
                .unwrap(),
            late: TransitionMatrix::new([[0.6, 0.3, 0.1], [0.4, 0.4, 0.2], [0.1, 0.3, 0.6]])
                .unwrap(),
        }
    }

    fn schedule() -> PeriodSchedule {
        PeriodSchedule::three_period(48, 60, 72, &matrices()).unwrap()
    }

    #[test]
    fn single_step_returns_initial_vector() {
        let t = simulate([0.2, 0.3, 0.5], &schedule(), 1).unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.records()[0].vector.as_array(), &[0.2, 0.3, 0.5]);
    }

    #[test]
    fn second_step_is_first_row_of_early() {
        let t = simulate([1.0, 0.0, 0.0], &schedule(), 2).unwrap();
        assert_eq!(t.records()[1].vector.as_array(), &[0.4, 0.4, 0.2]);
    }

    #[test]
    fn records_carry_period_and_clock() {
        let t = simulate([1.0, 0.0, 0.0], &schedule(), 72).unwrap();
        assert_eq!(t.at_step(48).map(|r| r.period), Some(Period::Early));
        assert_eq!(t.at_step(49).map(|r| r.period), Some(Period::RushHour));
        assert_eq!(t.at_step(61).map(|r| r.period), Some(Period::Late));
        assert_eq!(t.at_step(1).map(|r| r.time_hr), Some(8.0));
        assert_eq!(t.at_step(72).map(|r| r.time_hr), Some(20.0));
    }

    #[test]
    fn zero_steps_is_invalid() {
        let err = simulate([1.0, 0.0, 0.0], &schedule(), 0).unwrap_err();
        assert!(matches!(err, MarkovError::InvalidInput { .. }));
    }

    #[test]
    fn schedule_too_short_is_invalid() {
        let err = simulate([1.0, 0.0, 0.0], &schedule(), 73).unwrap_err();
        assert!(err.to_string().contains("73"));
    }

    #[test]
    fn bad_initial_vector_is_invalid() {
        assert!(simulate([0.9, 0.0, 0.0], &schedule(), 72).is_err());
        assert!(simulate([1.1, -0.1, 0.0], &schedule(), 72).is_err());
    }

    #[test]
    fn advance_moves_mass_out_of_light() {
        let m = matrices().early;
        let next = advance(ProbVector::certain(TrafficState::Light), &m);
        assert!(next[TrafficState::Light] < 1.0);
    }
}
