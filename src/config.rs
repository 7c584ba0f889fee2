//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{MarkovError, NUM_STATES, ProbVector, RawMatrix, TransitionMatrix};
use crate::sim::period::{PeriodMatrices, PeriodSchedule};
use crate::sim::types::TimeAxis;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon, display clock and initial condition.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Period boundaries.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// One transition matrix per period.
    #[serde(default)]
    pub matrices: MatricesConfig,
}

/// Horizon, display clock and initial condition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of recorded steps, the initial condition included (must be > 0).
    pub num_steps: usize,
    /// Clock hour of step 1 (display only).
    pub start_hour: f64,
    /// Clock hour of the last step (display only).
    pub end_hour: f64,
    /// Initial distribution over Light, Heavy, Gridlock.
    pub initial: [f64; NUM_STATES],
    /// Seed for Monte Carlo sampling.
    pub seed: u64,
    /// Number of sampled paths; 0 disables sampling.
    pub sample_runs: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_steps: 72,
            start_hour: 8.0,
            end_hour: 20.0,
            initial: [1.0, 0.0, 0.0],
            seed: 42,
            sample_runs: 0,
        }
    }
}

/// Period boundaries as inclusive last steps.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Last step of the Early period.
    pub early_end: usize,
    /// Last step of the RushHour period; Late runs from here to `num_steps`.
    pub rush_hour_end: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            early_end: 48,
            rush_hour_end: 60,
        }
    }
}

/// Transition matrices, rows indexed Light, Heavy, Gridlock.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatricesConfig {
    pub early: RawMatrix,
    pub rush_hour: RawMatrix,
    pub late: RawMatrix,
}

impl Default for MatricesConfig {
    fn default() -> Self {
        Self {
            early: [[0.4, 0.4, 0.2], [0.3, 0.5, 0.2], [0.0, 0.1, 0.9]],
            rush_hour: [[0.2, 0.5, 0.3], [0.1, 0.5, 0.4], [0.0, 0.2, 0.8]],
            late: [[0.6, 0.3, 0.1], [0.4, 0.4, 0.2], [0.1, 0.3, 0.6]],
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.num_steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validated inputs for one run.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub initial: [f64; NUM_STATES],
    pub schedule: PeriodSchedule,
    pub axis: TimeAxis,
    pub seed: u64,
    pub sample_runs: usize,
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            schedule: ScheduleConfig::default(),
            matrices: MatricesConfig::default(),
        }
    }

    /// Returns the gridlock-prone preset: jams form readily and clear slowly.
    pub fn gridlock_prone() -> Self {
        Self {
            matrices: MatricesConfig {
                early: [[0.3, 0.4, 0.3], [0.2, 0.5, 0.3], [0.0, 0.05, 0.95]],
                rush_hour: [[0.1, 0.5, 0.4], [0.05, 0.45, 0.5], [0.0, 0.05, 0.95]],
                late: [[0.5, 0.3, 0.2], [0.3, 0.4, 0.3], [0.05, 0.15, 0.8]],
            },
            ..Self::baseline()
        }
    }

    /// Returns the free-flow preset: light traffic dominates all day.
    pub fn free_flow() -> Self {
        Self {
            matrices: MatricesConfig {
                early: [[0.8, 0.15, 0.05], [0.5, 0.4, 0.1], [0.2, 0.4, 0.4]],
                rush_hour: [[0.5, 0.35, 0.15], [0.3, 0.5, 0.2], [0.1, 0.4, 0.5]],
                late: [[0.85, 0.1, 0.05], [0.6, 0.3, 0.1], [0.3, 0.4, 0.3]],
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "gridlock_prone", "free_flow"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "gridlock_prone" => Ok(Self::gridlock_prone()),
            "free_flow" => Ok(Self::free_flow()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.num_steps == 0 {
            errors.push(ConfigError::new("simulation.num_steps", "must be > 0"));
        }
        if !s.start_hour.is_finite() || !s.end_hour.is_finite() || s.start_hour >= s.end_hour {
            errors.push(ConfigError::new(
                "simulation.start_hour",
                "must be finite and < simulation.end_hour",
            ));
        }
        if let Err(e) = ProbVector::new(s.initial) {
            errors.push(ConfigError::new("simulation.initial", e.to_string()));
        }

        let sch = &self.schedule;
        if sch.early_end == 0 {
            errors.push(ConfigError::new("schedule.early_end", "must be >= 1"));
        }
        if sch.rush_hour_end <= sch.early_end {
            errors.push(ConfigError::new(
                "schedule.rush_hour_end",
                "must be > schedule.early_end",
            ));
        }
        if s.num_steps > 0 && s.num_steps <= sch.rush_hour_end {
            errors.push(ConfigError::new(
                "simulation.num_steps",
                "must be > schedule.rush_hour_end so the Late period is not empty",
            ));
        }

        let m = &self.matrices;
        for (field, rows) in [
            ("matrices.early", &m.early),
            ("matrices.rush_hour", &m.rush_hour),
            ("matrices.late", &m.late),
        ] {
            if let Err(e) = TransitionMatrix::new(*rows) {
                errors.push(ConfigError::new(field, e.to_string()));
            }
        }

        errors
    }

    /// Builds the matrices, schedule and display axis.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::NotStochastic`] for a malformed matrix and
    /// [`MarkovError::InvalidInput`] for malformed period bounds.
    pub fn build(&self) -> Result<Scenario, MarkovError> {
        let matrices = PeriodMatrices {
            early: TransitionMatrix::new(self.matrices.early)?,
            rush_hour: TransitionMatrix::new(self.matrices.rush_hour)?,
            late: TransitionMatrix::new(self.matrices.late)?,
        };
        let s = &self.simulation;
        let schedule = PeriodSchedule::three_period(
            self.schedule.early_end,
            self.schedule.rush_hour_end,
            s.num_steps,
            &matrices,
        )?;
        Ok(Scenario {
            initial: s.initial,
            schedule,
            axis: TimeAxis::new(s.start_hour, s.end_hour, s.num_steps),
            seed: s.seed,
            sample_runs: s.sample_runs,
        })
    }
}
