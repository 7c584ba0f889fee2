//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(),
        KeyCode::Char('1') => app.switch_preset("baseline"),
        KeyCode::Char('2') => app.switch_preset("gridlock_prone"),
        KeyCode::Char('3') => app.switch_preset("free_flow"),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn number_keys_switch_presets() {
        let mut app = App::new("baseline").unwrap();
        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.preset_name, "gridlock_prone");
        handle_key(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.preset_name, "free_flow");
    }

    #[test]
    fn q_quits() {
        let mut app = App::new("baseline").unwrap();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }
}
