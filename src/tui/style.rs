//! Color constants for the TUI.

use ratatui::style::Color;

use crate::chain::TrafficState;
use crate::sim::period::Period;

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

/// Line and gauge color of a traffic state.
pub fn state_color(state: TrafficState) -> Color {
    match state {
        TrafficState::Light => Color::Green,
        TrafficState::Heavy => Color::Yellow,
        TrafficState::Gridlock => Color::Red,
    }
}

/// Header badge color of a period.
pub fn period_color(period: Period) -> Color {
    match period {
        Period::Early => Color::Cyan,
        Period::RushHour => Color::Magenta,
        Period::Late => Color::Blue,
    }
}
