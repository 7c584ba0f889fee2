//! Core simulation types: display clock, step records and trajectories.

use std::fmt;

use serde::Serialize;

use crate::chain::{ProbVector, TrafficState};

use super::period::Period;

/// Maps 1-based step indices onto clock hours for display.
///
/// Step 1 sits at `start_hour` and the last step at `end_hour`, evenly
/// spaced in between. The simulator itself only sees step indices.
///
/// # Examples
///
/// ```
/// use traffic_markov::sim::types::TimeAxis;
///
/// let axis = TimeAxis::new(8.0, 20.0, 72);
/// assert_eq!(axis.hour_at(1), 8.0);
/// assert_eq!(axis.hour_at(72), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeAxis {
    /// Clock hour of step 1.
    pub start_hour: f64,
    /// Clock hour of the last step.
    pub end_hour: f64,
    /// Number of steps spanned.
    pub num_steps: usize,
}

impl TimeAxis {
    pub fn new(start_hour: f64, end_hour: f64, num_steps: usize) -> Self {
        Self {
            start_hour,
            end_hour,
            num_steps,
        }
    }

    /// Clock hour of `step`: `start + (end - start) * (step - 1) / (num_steps - 1)`.
    pub fn hour_at(&self, step: usize) -> f64 {
        if self.num_steps <= 1 {
            return self.start_hour;
        }
        let frac = step.saturating_sub(1) as f64 / (self.num_steps - 1) as f64;
        self.start_hour + (self.end_hour - self.start_hour) * frac
    }
}

/// State distribution recorded at one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// 1-based step index.
    pub step: usize,
    /// Display clock hour.
    pub time_hr: f64,
    /// Period owning the step.
    pub period: Period,
    /// Distribution over traffic states.
    pub vector: ProbVector,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({:>5.2}h) {:<8} | {}",
            self.step,
            self.time_hr,
            self.period.label(),
            self.vector
        )
    }
}

/// One `(step, state)` cell of the flattened trajectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub step: usize,
    pub time_hr: f64,
    pub state: TrafficState,
    pub probability: f64,
}

/// Ordered step records of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    records: Vec<StepRecord>,
}

impl Trajectory {
    pub(crate) fn from_records(records: Vec<StepRecord>) -> Self {
        Self { records }
    }

    /// Step records in order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a 1-based `step`.
    pub fn at_step(&self, step: usize) -> Option<&StepRecord> {
        step.checked_sub(1).and_then(|idx| self.records.get(idx))
    }

    /// Final distribution.
    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// Flattens into `num_steps * 3` records, states in index order per step.
    pub fn points(&self) -> Vec<TrajectoryPoint> {
        self.records
            .iter()
            .flat_map(|r| {
                r.vector.iter().map(move |(state, probability)| TrajectoryPoint {
                    step: r.step,
                    time_hr: r.time_hr,
                    state,
                    probability,
                })
            })
            .collect()
    }

    /// `(time_hr, probability)` series for one state, for charting.
    pub fn series(&self, state: TrafficState) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .map(|r| (r.time_hr, r.vector[state]))
            .collect()
    }
}
