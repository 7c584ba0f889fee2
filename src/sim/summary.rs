//! Post-hoc summary of a run: per-period averages and steady states.

use std::fmt;

use serde::Serialize;

use crate::chain::{MarkovError, NUM_STATES, ProbVector, steady_state};

use super::period::{Period, PeriodSchedule};
use super::types::Trajectory;

/// Figures for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    /// Number of trajectory steps that fell in the period.
    pub steps: usize,
    /// Mean probability of each state over those steps; `None` when `steps == 0`.
    pub average: Option<[f64; NUM_STATES]>,
    /// Stationary distribution of the period's matrix.
    pub steady_state: ProbVector,
}

/// Report numbers derived from a finished trajectory and its schedule.
///
/// Computed after the run so the figures always match the recorded steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub periods: Vec<PeriodSummary>,
    /// Distribution at the last recorded step.
    pub final_vector: Option<ProbVector>,
}

impl RunSummary {
    /// Builds the summary.
    ///
    /// # Errors
    ///
    /// Propagates [`MarkovError::NoUniqueStationaryDistribution`] or
    /// [`MarkovError::SingularSystem`] from a period's steady state.
    pub fn from_trajectory(
        trajectory: &Trajectory,
        schedule: &PeriodSchedule,
    ) -> Result<Self, MarkovError> {
        let mut periods = Vec::new();
        for period in schedule.periods() {
            let Some(matrix) = schedule.matrix_of(period) else {
                continue;
            };
            let mut sums = [0.0; NUM_STATES];
            let mut steps = 0_usize;
            for r in trajectory.records().iter().filter(|r| r.period == period) {
                for (sum, p) in sums.iter_mut().zip(r.vector.as_array()) {
                    *sum += p;
                }
                steps += 1;
            }
            let average = (steps > 0).then(|| sums.map(|s| s / steps as f64));
            periods.push(PeriodSummary {
                period,
                steps,
                average,
                steady_state: steady_state(matrix)?,
            });
        }

        Ok(Self {
            periods,
            final_vector: trajectory.last().map(|r| r.vector),
        })
    }

    /// Summary for `period`, if the schedule has it.
    pub fn period(&self, period: Period) -> Option<&PeriodSummary> {
        self.periods.iter().find(|p| p.period == period)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Traffic Report ---")?;
        writeln!(
            f,
            "{:<9} {:>5} | {:>24} | {:>24}",
            "period", "steps", "average (L/H/G)", "steady state (L/H/G)"
        )?;
        for p in &self.periods {
            let avg = match p.average {
                Some(a) => format!("{:.3} / {:.3} / {:.3}", a[0], a[1], a[2]),
                None => "n/a".to_string(),
            };
            let ss = p.steady_state.as_array();
            writeln!(
                f,
                "{:<9} {:>5} | {:>24} | {:>24}",
                p.period.label(),
                p.steps,
                avg,
                format!("{:.3} / {:.3} / {:.3}", ss[0], ss[1], ss[2]),
            )?;
        }
        match &self.final_vector {
            Some(v) => write!(f, "Final distribution: {v}"),
            None => write!(f, "Final distribution: n/a"),
        }
    }
}
