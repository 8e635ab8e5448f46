use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Left | KeyCode::Char('h') => app.move_panel(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_panel(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_entry(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_entry(1),
        KeyCode::Home | KeyCode::Char('g') => app.cursor.entry = None,
        KeyCode::Enter => app.activate(),
        KeyCode::Char('o') => app.open_panel_in_tabs(),
        KeyCode::Char('r') => {
            app.ctx.invalidate();
            app.reload();
            app.status = Some("Reloaded".into());
        }
        KeyCode::Char('?') => app.show_key_hints = !app.show_key_hints,
        _ => {}
    }
}
