//! API response and query types.
//!
//! Trajectory field names match the CSV export columns.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::sim::summary::{PeriodSummary, RunSummary};
use crate::sim::types::TrajectoryPoint;

/// Scenario echo plus report figures.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub config: ScenarioConfig,
    pub summary: RunSummary,
}

/// One `(step, state)` trajectory cell.
#[derive(Debug, Serialize)]
pub struct TrajectoryRecord {
    /// 1-based step index.
    pub step: usize,
    /// Display clock hour.
    pub time_hr: f64,
    /// State label (`Light`, `Heavy`, `Gridlock`).
    pub state: &'static str,
    /// Probability of the state at this step.
    pub probability: f64,
}

impl From<&TrajectoryPoint> for TrajectoryRecord {
    fn from(p: &TrajectoryPoint) -> Self {
        Self {
            step: p.step,
            time_hr: p.time_hr,
            state: p.state.label(),
            probability: p.probability,
        }
    }
}

/// Stationary distribution of one period, keyed by state label.
#[derive(Debug, Serialize)]
pub struct SteadyStateRecord {
    pub period: &'static str,
    #[serde(rename = "Light")]
    pub light: f64,
    #[serde(rename = "Heavy")]
    pub heavy: f64,
    #[serde(rename = "Gridlock")]
    pub gridlock: f64,
}

impl From<&PeriodSummary> for SteadyStateRecord {
    fn from(p: &PeriodSummary) -> Self {
        let v = p.steady_state.as_array();
        Self {
            period: p.period.label(),
            light: v[0],
            heavy: v[1],
            gridlock: v[2],
        }
    }
}

/// Optional range query parameters for the trajectory endpoint.
#[derive(Debug, Deserialize)]
pub struct TrajectoryQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
