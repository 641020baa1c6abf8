//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, View};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.open_selected(),
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
            if app.view == View::Places {
                app.back();
            }
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityguide_core::{Document, LoadEvent, LoadState};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let mut state = LoadState::new();
        state.apply(LoadEvent::Settled {
            fresh: Some(
                Document::from_json(r#"{"cities":[{"name":"Prague"},{"name":"Brno"}]}"#).unwrap(),
            ),
        });
        App::with_state(state)
    }

    #[test]
    fn test_navigate_into_city_and_back() {
        let mut app = app();
        assert!(!handle_input(&mut app, key(KeyCode::Down)));
        assert!(!handle_input(&mut app, key(KeyCode::Enter)));
        assert_eq!(app.view, View::Places);
        assert_eq!(app.selected_city().unwrap().name, "Brno");

        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.view, View::Cities);
        assert_eq!(app.city_selection, 1);
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let mut app = app();
        handle_input(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::ShowingHelp);

        handle_input(&mut app, key(KeyCode::Down));
        assert_eq!(app.city_selection, 0);

        // q closes help rather than quitting
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(handle_input(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.state, AppState::Quitting);
    }
}
