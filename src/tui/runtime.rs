//! Step-by-step chain runner and TUI application state.

use std::collections::VecDeque;
use std::time::Instant;

use crate::chain::{MarkovError, ProbVector, TrafficState};
use crate::config::{Scenario, ScenarioConfig};
use crate::sim::engine::advance;
use crate::sim::period::Period;
use crate::sim::types::StepRecord;

/// Maximum number of history entries kept for the rolling chart.
const MAX_HISTORY: usize = 200;

/// Tick interval options in milliseconds (slowest → fastest).
const SPEED_LEVELS_MS: [u64; 6] = [500, 250, 100, 50, 20, 5];

/// Default speed index (100 ms).
const DEFAULT_SPEED_IDX: usize = 2;

/// TUI application state.
pub struct App {
    /// Validated inputs of the active preset.
    scenario: Scenario,
    /// Distribution at the last recorded step.
    current: ProbVector,
    /// Rolling history of step records for the chart.
    pub history: VecDeque<StepRecord>,
    /// Number of steps recorded so far.
    pub timestep: usize,
    /// Total steps in the run.
    pub total_steps: usize,
    /// Whether the run is paused.
    pub paused: bool,
    /// Current index into `SPEED_LEVELS_MS`.
    pub speed_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the last tick was executed.
    pub last_tick: Instant,
    /// Name of the active preset.
    pub preset_name: String,
}

impl App {
    /// Creates a new app from a preset name, falling back to `baseline`
    /// for unknown names.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkovError`] if the preset does not build.
    pub fn new(preset: &str) -> Result<Self, MarkovError> {
        let (name, config) = match ScenarioConfig::from_preset(preset) {
            Ok(cfg) => (preset, cfg),
            Err(_) => ("baseline", ScenarioConfig::baseline()),
        };
        let scenario = config.build()?;
        let current = ProbVector::new(scenario.initial)?;
        Ok(Self {
            total_steps: scenario.axis.num_steps,
            scenario,
            current,
            history: VecDeque::with_capacity(MAX_HISTORY),
            timestep: 0,
            paused: false,
            speed_idx: DEFAULT_SPEED_IDX,
            quit: false,
            last_tick: Instant::now(),
            preset_name: name.to_string(),
        })
    }

    /// Records the next step if not finished.
    ///
    /// The first tick records the initial vector; later ticks apply the
    /// matrix of the period owning the new step.
    pub fn tick(&mut self) {
        if self.is_finished() {
            return;
        }
        let step = self.timestep + 1;
        let Some(segment) = self.scenario.schedule.segment_for(step) else {
            self.timestep = self.total_steps;
            return;
        };
        if step > 1 {
            self.current = advance(self.current, &segment.matrix);
        }
        let record = StepRecord {
            step,
            time_hr: self.scenario.axis.hour_at(step),
            period: segment.period,
            vector: self.current,
        };
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(record);
        self.timestep = step;
    }

    /// Toggles pause/resume.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Increases speed (shorter tick interval).
    pub fn speed_up(&mut self) {
        if self.speed_idx + 1 < SPEED_LEVELS_MS.len() {
            self.speed_idx += 1;
        }
    }

    /// Decreases speed (longer tick interval).
    pub fn speed_down(&mut self) {
        if self.speed_idx > 0 {
            self.speed_idx -= 1;
        }
    }

    /// Returns the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        SPEED_LEVELS_MS[self.speed_idx]
    }

    /// Switches to a different preset, resetting the run.
    ///
    /// Unknown names are ignored.
    pub fn switch_preset(&mut self, name: &str) {
        let Ok(config) = ScenarioConfig::from_preset(name) else {
            return;
        };
        let Ok(scenario) = config.build() else {
            return;
        };
        let Ok(current) = ProbVector::new(scenario.initial) else {
            return;
        };
        self.total_steps = scenario.axis.num_steps;
        self.scenario = scenario;
        self.current = current;
        self.history.clear();
        self.timestep = 0;
        self.paused = false;
        self.preset_name = name.to_string();
    }

    /// Restarts the current preset from the beginning.
    pub fn restart(&mut self) {
        let name = self.preset_name.clone();
        self.switch_preset(&name);
    }

    /// Distribution at the last recorded step.
    pub fn current(&self) -> ProbVector {
        self.current
    }

    /// Period of the last recorded step, or of step 1 before the first tick.
    pub fn period(&self) -> Option<Period> {
        self.scenario.schedule.period_for(self.timestep.max(1))
    }

    /// Most likely state at the last recorded step.
    pub fn dominant_state(&self) -> TrafficState {
        let mut best = TrafficState::Light;
        for (state, p) in self.current.iter() {
            if p > self.current[best] {
                best = state;
            }
        }
        best
    }

    /// Returns `true` when all steps have been recorded.
    pub fn is_finished(&self) -> bool {
        self.timestep >= self.total_steps
    }

    /// Returns the most recent step record, if any.
    pub fn last_record(&self) -> Option<&StepRecord> {
        self.history.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::engine::simulate_with_axis;

    #[test]
    fn app_creates_and_ticks() {
        let mut app = App::new("baseline").unwrap();
        assert_eq!(app.timestep, 0);
        assert!(!app.is_finished());

        app.tick();
        assert_eq!(app.timestep, 1);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.current().as_array(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn ticks_match_batch_simulation() {
        let mut app = App::new("baseline").unwrap();
        for _ in 0..app.total_steps {
            app.tick();
        }
        let scenario = ScenarioConfig::baseline().build().unwrap();
        let batch =
            simulate_with_axis(scenario.initial, &scenario.schedule, &scenario.axis).unwrap();
        let last = batch.last().unwrap();
        assert_eq!(app.last_record(), Some(last));
        assert_eq!(app.period(), Some(Period::Late));
    }

    #[test]
    fn app_finishes_after_total_steps() {
        let mut app = App::new("baseline").unwrap();
        for _ in 0..app.total_steps {
            app.tick();
        }
        assert!(app.is_finished());
        let ts_before = app.timestep;
        app.tick(); // should be a no-op
        assert_eq!(app.timestep, ts_before);
    }

    #[test]
    fn unknown_preset_falls_back_to_baseline() {
        let app = App::new("nope").unwrap();
        assert_eq!(app.preset_name, "baseline");
    }

    #[test]
    fn speed_controls_stay_in_bounds() {
        let mut app = App::new("baseline").unwrap();
        for _ in 0..10 {
            app.speed_down();
        }
        assert_eq!(app.speed_idx, 0);
        for _ in 0..10 {
            app.speed_up();
        }
        assert_eq!(app.speed_idx, SPEED_LEVELS_MS.len() - 1);
    }

    #[test]
    fn switch_preset_resets_state() {
        let mut app = App::new("baseline").unwrap();
        app.tick();
        app.tick();
        assert_eq!(app.history.len(), 2);

        app.switch_preset("gridlock_prone");
        assert_eq!(app.timestep, 0);
        assert!(app.history.is_empty());
        assert_eq!(app.preset_name, "gridlock_prone");
    }

    #[test]
    fn restart_resets_state() {
        let mut app = App::new("free_flow").unwrap();
        for _ in 0..5 {
            app.tick();
        }
        app.restart();
        assert_eq!(app.timestep, 0);
        assert!(app.history.is_empty());
        assert_eq!(app.preset_name, "free_flow");
    }

    #[test]
    fn toggle_pause() {
        let mut app = App::new("baseline").unwrap();
        assert!(!app.paused);
        app.toggle_pause();
        assert!(app.paused);
        app.toggle_pause();
        assert!(!app.paused);
    }

    #[test]
    fn gridlock_preset_ends_gridlocked() {
        let mut app = App::new("gridlock_prone").unwrap();
        for _ in 0..app.total_steps {
            app.tick();
        }
        assert_eq!(app.dominant_state(), TrafficState::Gridlock);
    }
}
