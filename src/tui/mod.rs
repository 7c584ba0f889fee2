//! Live terminal UI that steps the chain and charts each state's probability.
//!
//! Feature-gated behind `tui`. Launch with `--tui` on the CLI.

mod controls;
mod layout;
/// Step-by-step runner and application state.
pub mod runtime;
mod style;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::warn;

use runtime::App;

/// Launches the TUI event loop for the given preset.
///
/// Sets up the terminal (raw mode, alternate screen), runs the event loop,
/// and restores the terminal on exit.
pub fn run(preset: &str) {
    let mut app = App::new(preset).unwrap_or_else(|e| {
        eprintln!("error: cannot build preset \"{preset}\": {e}");
        std::process::exit(1);
    });

    enable_raw_mode().unwrap_or_else(|e| {
        eprintln!("error: failed to enable raw mode: {e}");
        std::process::exit(1);
    });

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).unwrap_or_else(|e| {
        if let Err(err) = disable_raw_mode() {
            warn!("failed to disable raw mode: {err}");
        }
        eprintln!("error: failed to enter alternate screen: {e}");
        std::process::exit(1);
    });

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).unwrap_or_else(|e| {
        if let Err(err) = disable_raw_mode() {
            warn!("failed to disable raw mode: {err}");
        }
        eprintln!("error: failed to create terminal: {e}");
        std::process::exit(1);
    });

    let result = event_loop(&mut terminal, &mut app);

    restore_terminal(&mut terminal);

    if let Err(e) = result {
        eprintln!("error: TUI crashed: {e}");
        std::process::exit(1);
    }
}

/// Leaves raw mode and the alternate screen, logging any step that fails.
fn restore_terminal<W: io::Write>(terminal: &mut Terminal<CrosstermBackend<W>>) {
    if let Err(e) = disable_raw_mode() {
        warn!("failed to disable raw mode: {e}");
    }
    if let Err(e) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {e}");
    }
    if let Err(e) = terminal.show_cursor() {
        warn!("failed to show cursor: {e}");
    }
}

/// Core event loop: poll input, advance the chain, draw.
fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| layout::render(frame, app))?;

        if app.quit {
            return Ok(());
        }

        let timeout = Duration::from_millis(app.tick_interval_ms());
        let deadline = app.last_tick + timeout;
        let poll_timeout = deadline.saturating_duration_since(Instant::now());

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                controls::handle_key(app, key);
            }
        }

        if app.last_tick.elapsed() >= timeout && !app.paused && !app.is_finished() {
            app.tick();
            app.last_tick = Instant::now();
        }
    }
}
