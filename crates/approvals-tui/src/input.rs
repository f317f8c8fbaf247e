use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{App, View};

/// Route a key press to the app. Ctrl+C and `q` quit from anywhere.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    let code = key.code;

    if code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    if code == KeyCode::Char('q') {
        app.quit();
        return;
    }
    if code == KeyCode::Char('x') {
        app.dismiss_notification();
        return;
    }

    if app.view != View::Confirmation {
        return;
    }

    match code {
        KeyCode::Enter | KeyCode::Char('a') => app.approve(),
        KeyCode::Esc | KeyCode::Char('c') => app.cancel(),
        KeyCode::Right | KeyCode::Char('l') => app.next(),
        KeyCode::Left | KeyCode::Char('h') => app.previous(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Char('v') => app.toggle_details(),
        KeyCode::Char('d') => app.dismiss_callout(0),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.dismiss_callout(digit as usize - 1);
            }
        }
        _ => {}
    }
}
