//! HTML report: period averages, steady states and a probability chart.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::chain::TrafficState;
use crate::sim::period::Period;
use crate::sim::summary::RunSummary;
use crate::sim::types::Trajectory;

/// Chart canvas size in SVG user units.
const CHART_WIDTH: f64 = 720.0;
const CHART_HEIGHT: f64 = 320.0;
const CHART_MARGIN: f64 = 40.0;

/// Line colour per state, index order.
const STATE_COLORS: [&str; 3] = ["#2e8b57", "#ff8c00", "#c0392b"];

/// Renders the full report as a standalone HTML document.
pub fn render_html(trajectory: &Trajectory, summary: &RunSummary) -> String {
    HtmlReport {
        trajectory,
        summary,
    }
    .to_string()
}

/// Writes the HTML report to `path`.
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be written.
pub fn write_html_report(
    trajectory: &Trajectory,
    summary: &RunSummary,
    path: &Path,
) -> io::Result<()> {
    fs::write(path, render_html(trajectory, summary))
}

/// Line chart of every state's probability against clock time.
pub fn render_svg_chart(trajectory: &Trajectory) -> String {
    SvgChart(trajectory).to_string()
}

struct HtmlReport<'a> {
    trajectory: &'a Trajectory,
    summary: &'a RunSummary,
}

impl fmt::Display for HtmlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>Traffic Simulation Report</title>")?;
        writeln!(
            f,
            "<style>\n\
             body {{ font-family: Arial, sans-serif; margin: 20px; }}\n\
             h1 {{ text-align: center; }}\n\
             .section {{ margin-bottom: 30px; }}\n\
             table {{ border-collapse: collapse; }}\n\
             td, th {{ border: 1px solid #ccc; padding: 4px 10px; text-align: right; }}\n\
             </style>"
        )?;
        writeln!(f, "</head>\n<body>\n<h1>Traffic Simulation Report</h1>")?;

        writeln!(f, "<div class=\"section\">\n<h2>Average Probabilities</h2>")?;
        for p in &self.summary.periods {
            let span = period_span(self.trajectory, p.period);
            writeln!(f, "<p><strong>{} {span}:</strong></p>\n<ul>", p.period)?;
            for state in TrafficState::ALL {
                match p.average {
                    Some(a) => writeln!(f, "  <li>{state}: {:.4}</li>", a[state.index()])?,
                    None => writeln!(f, "  <li>{state}: n/a</li>")?,
                }
            }
            writeln!(f, "</ul>")?;
        }
        writeln!(f, "</div>")?;

        writeln!(f, "<div class=\"section\">\n<h2>Steady States</h2>\n<table>")?;
        writeln!(
            f,
            "<tr><th>Period</th><th>Light</th><th>Heavy</th><th>Gridlock</th></tr>"
        )?;
        for p in &self.summary.periods {
            let v = p.steady_state.as_array();
            writeln!(
                f,
                "<tr><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>",
                p.period, v[0], v[1], v[2]
            )?;
        }
        writeln!(f, "</table>\n</div>")?;

        writeln!(f, "<div class=\"section\">\n<h2>Probability Plot</h2>")?;
        write!(f, "{}", SvgChart(self.trajectory))?;
        writeln!(f, "</div>\n</body>\n</html>")
    }
}

struct SvgChart<'a>(&'a Trajectory);

impl fmt::Display for SvgChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.0.records();
        let x_lo = records.first().map_or(0.0, |r| r.time_hr);
        let x_hi = records.last().map_or(1.0, |r| r.time_hr).max(x_lo + 1e-9);
        let plot_w = CHART_WIDTH - 2.0 * CHART_MARGIN;
        let plot_h = CHART_HEIGHT - 2.0 * CHART_MARGIN;
        let sx = |x: f64| CHART_MARGIN + (x - x_lo) / (x_hi - x_lo) * plot_w;
        let sy = |y: f64| CHART_HEIGHT - CHART_MARGIN - y * plot_h;
        let bottom = CHART_HEIGHT - CHART_MARGIN;
        let right = CHART_WIDTH - CHART_MARGIN;

        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" \
             viewBox=\"0 0 {CHART_WIDTH} {CHART_HEIGHT}\">"
        )?;
        // axes
        writeln!(
            f,
            "<line x1=\"{CHART_MARGIN}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" stroke=\"black\"/>\
             <line x1=\"{CHART_MARGIN}\" y1=\"{CHART_MARGIN}\" x2=\"{CHART_MARGIN}\" y2=\"{bottom}\" stroke=\"black\"/>"
        )?;
        let label_y = CHART_HEIGHT - CHART_MARGIN / 3.0;
        writeln!(
            f,
            "<text x=\"{:.1}\" y=\"{label_y:.1}\" font-size=\"12\">{x_lo:.1}h</text>\
             <text x=\"{:.1}\" y=\"{label_y:.1}\" font-size=\"12\">{x_hi:.1}h</text>",
            CHART_MARGIN,
            right - 30.0,
        )?;

        for state in TrafficState::ALL {
            let points: Vec<String> = self
                .0
                .series(state)
                .iter()
                .map(|&(x, y)| format!("{:.2},{:.2}", sx(x), sy(y)))
                .collect();
            let color = STATE_COLORS[state.index()];
            writeln!(
                f,
                "<polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" points=\"{}\"/>",
                points.join(" ")
            )?;
            let legend_y = CHART_MARGIN + 16.0 * state.index() as f64;
            writeln!(
                f,
                "<text x=\"{:.1}\" y=\"{legend_y:.1}\" font-size=\"12\" fill=\"{color}\">{state}</text>",
                right - 60.0,
            )?;
        }
        writeln!(f, "</svg>")
    }
}

/// Clock span covered by `period` in the trajectory, e.g. `(08:00 - 15:50)`.
fn period_span(trajectory: &Trajectory, period: Period) -> String {
    let mut hours = trajectory
        .records()
        .iter()
        .filter(|r| r.period == period)
        .map(|r| r.time_hr);
    match (hours.next(), hours.last()) {
        (Some(first), Some(last)) => format!("({} - {})", clock(first), clock(last)),
        (Some(only), None) => format!("({})", clock(only)),
        _ => String::new(),
    }
}

fn clock(hour: f64) -> String {
    let minutes = (hour * 60.0).round() as i64;
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::engine::simulate_with_axis;

    fn baseline_html() -> String {
        let scenario = ScenarioConfig::baseline().build().unwrap();
        let t = simulate_with_axis(scenario.initial, &scenario.schedule, &scenario.axis).unwrap();
        let summary = RunSummary::from_trajectory(&t, &scenario.schedule).unwrap();
        render_html(&t, &summary)
    }

    #[test]
    fn report_lists_every_period() {
        let html = baseline_html();
        for label in ["Early", "RushHour", "Late"] {
            assert!(html.contains(label), "missing {label}");
        }
    }

    #[test]
    fn chart_has_one_line_per_state() {
        let html = baseline_html();
        assert_eq!(html.matches("<polyline").count(), 3);
    }

    #[test]
    fn early_span_starts_at_eight() {
        let html = baseline_html();
        assert!(html.contains("Early (08:00 - "));
    }

    #[test]
    fn chart_alone_is_a_complete_svg() {
        let scenario = ScenarioConfig::baseline().build().unwrap();
        let t = simulate_with_axis(scenario.initial, &scenario.schedule, &scenario.axis).unwrap();
        let svg = render_svg_chart(&t);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("8.0h") && svg.contains("20.0h"));
    }

    #[test]
    fn report_is_a_closed_document() {
        let html = baseline_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert_eq!(html.matches("<tr>").count(), 4);
    }

    #[test]
    fn clock_formats_fractional_hours() {
        assert_eq!(clock(8.0), "08:00");
        assert_eq!(clock(16.5), "16:30");
    }
}
