//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::App;
use super::style;
use crate::chain::TrafficState;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // state gauges
            Constraint::Length(3), // status panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_gauges(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: preset name, period, step progress, speed, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let mut spans = vec![
        Span::styled(
            " TRAFFIC-MARKOV ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
    ];
    if let Some(period) = app.period() {
        spans.push(Span::styled(
            period.label(),
            Style::default()
                .fg(style::period_color(period))
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw(format!(
        " │ t={}/{} │ {}ms │ {state_icon} {state_label} ",
        app.timestep,
        app.total_steps,
        app.tick_interval_ms(),
    )));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Probability of each state against clock time.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let series: Vec<Vec<(f64, f64)>> = TrafficState::ALL
        .iter()
        .map(|&state| {
            app.history
                .iter()
                .map(|r| (r.time_hr, r.vector[state]))
                .collect()
        })
        .collect();

    let first = app.history.front().map_or(0.0, |r| r.time_hr);
    let x_hi = app.history.back().map_or(1.0, |r| r.time_hr).max(first + 1.0);

    let datasets: Vec<Dataset> = TrafficState::ALL
        .iter()
        .zip(&series)
        .map(|(&state, data)| {
            Dataset::default()
                .name(state.label())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(style::state_color(state)))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" State Probabilities ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("hour")
                .bounds([first, x_hi])
                .labels(vec![format!("{first:.1}"), format!("{x_hi:.1}")]),
        )
        .y_axis(
            Axis::default()
                .title("p")
                .bounds([0.0, 1.0])
                .labels(vec!["0.0".to_string(), "0.5".to_string(), "1.0".to_string()]),
        );

    frame.render_widget(chart, area);
}

/// One gauge per state showing its current probability.
fn render_gauges(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let current = app.current();
    for (state, chunk) in TrafficState::ALL.iter().zip(chunks.iter()) {
        let p = current[*state];
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(" {state} "))
                    .borders(Borders::ALL),
            )
            .gauge_style(Style::default().fg(style::state_color(*state)))
            .ratio(p.clamp(0.0, 1.0))
            .label(format!("{:.1}%", p * 100.0));
        frame.render_widget(gauge, *chunk);
    }
}

/// Status line with the latest record and the most likely state.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(r) = app.last_record() {
        Line::from(format!(
            "  {r}  most likely: {}",
            app.dominant_state().label()
        ))
    } else {
        Line::from("  Waiting for first step...")
    };

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  1/2/3:Preset  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
