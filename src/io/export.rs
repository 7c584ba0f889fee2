//! CSV export for trajectories and steady states.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::summary::RunSummary;
use crate::sim::types::Trajectory;

/// Column header of the long-format trajectory export.
const TRAJECTORY_HEADER: &str = "step,time_hr,state,probability";

/// Column header of the steady-state export.
const STEADY_STATE_HEADER: &str = "period,light,heavy,gridlock";

/// Exports the trajectory to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_trajectory_csv(trajectory: &Trajectory, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_trajectory_csv(trajectory, io::BufWriter::new(file))
}

/// Writes the trajectory as long-format CSV to any writer.
///
/// One row per `(step, state)` pair, states in index order within a step.
/// Produces identical bytes for identical trajectories.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_trajectory_csv(trajectory: &Trajectory, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(TRAJECTORY_HEADER.split(','))?;

    for p in trajectory.points() {
        wtr.write_record(&[
            p.step.to_string(),
            format!("{:.4}", p.time_hr),
            p.state.label().to_string(),
            format!("{:.10}", p.probability),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports per-period steady states to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_steady_states_csv(summary: &RunSummary, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_steady_states_csv(summary, io::BufWriter::new(file))
}

/// Writes one row per period with its stationary distribution.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_steady_states_csv(summary: &RunSummary, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(STEADY_STATE_HEADER.split(','))?;

    for p in &summary.periods {
        let v = p.steady_state.as_array();
        wtr.write_record(&[
            p.period.label().to_string(),
            format!("{:.10}", v[0]),
            format!("{:.10}", v[1]),
            format!("{:.10}", v[2]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::engine::simulate_with_axis;

    fn baseline_run() -> (Trajectory, RunSummary) {
        let scenario = ScenarioConfig::baseline().build().unwrap();
        let t = simulate_with_axis(scenario.initial, &scenario.schedule, &scenario.axis).unwrap();
        let summary = RunSummary::from_trajectory(&t, &scenario.schedule).unwrap();
        (t, summary)
    }

    #[test]
    fn header_matches_schema() {
        let (t, _) = baseline_run();
        let mut buf = Vec::new();
        write_trajectory_csv(&t, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(first_line, "step,time_hr,state,probability");
    }

    #[test]
    fn row_count_is_three_per_step() {
        let (t, _) = baseline_run();
        let mut buf = Vec::new();
        write_trajectory_csv(&t, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 72 * 3 data rows
        assert_eq!(lines.len(), 1 + 72 * 3);
        assert_eq!(lines[1], "1,8.0000,Light,1.0000000000");
    }

    #[test]
    fn deterministic_output() {
        let (a, _) = baseline_run();
        let (b, _) = baseline_run();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_trajectory_csv(&a, &mut buf1).ok();
        write_trajectory_csv(&b, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn probabilities_parse_back() {
        let (t, _) = baseline_run();
        let mut buf = Vec::new();
        write_trajectory_csv(&t, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.expect("every row should parse");
            let p: f64 = rec[3].parse().expect("probability should parse as f64");
            assert!((0.0..=1.0).contains(&p));
            row_count += 1;
        }
        assert_eq!(row_count, 216);
    }

    #[test]
    fn steady_state_rows_per_period() {
        let (_, summary) = baseline_run();
        let mut buf = Vec::new();
        write_steady_states_csv(&summary, &mut buf).ok();
        let output = String::from_utf8(buf).unwrap_or_default();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "period,light,heavy,gridlock");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("Early,0.1111111111,0.2222222222,0.66666666"));
    }
}
