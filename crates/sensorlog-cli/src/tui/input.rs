//! Keyboard input handling for the dashboard.
//!
//! # Key Bindings
//!
//! | Key               | Action                 |
//! |-------------------|------------------------|
//! | `q` / `Esc`       | Quit                   |
//! | `Tab` / `l`       | Next tab               |
//! | `BackTab` / `h`   | Previous tab           |
//! | `↓` / `j`         | Select next device     |
//! | `↑` / `k`         | Select previous device |
//! | `PgDn` / `PgUp`   | Scroll database table  |
//! | `r`               | Refresh                |
//! | `c`               | Clear database         |

use crossterm::event::KeyCode;

use super::app::App;

/// Rows moved by one page of database scrolling.
const PAGE_ROWS: usize = 10;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextTab,
    PreviousTab,
    SelectNext,
    SelectPrevious,
    PageDown,
    PageUp,
    Refresh,
    ClearDatabase,
    /// Key without a binding.
    None,
}

/// Map a key to an action.
pub fn handle_key(key: KeyCode) -> Action {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Tab | KeyCode::Char('l') => Action::NextTab,
        KeyCode::BackTab | KeyCode::Char('h') => Action::PreviousTab,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Char('c') => Action::ClearDatabase,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
pub fn apply_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::NextTab => app.next_tab(),
        Action::PreviousTab => app.previous_tab(),
        Action::SelectNext => app.select_next_device(),
        Action::SelectPrevious => app.select_previous_device(),
        Action::PageDown => app.scroll_database_down(PAGE_ROWS),
        Action::PageUp => app.scroll_database_up(PAGE_ROWS),
        Action::Refresh => {
            app.refresh();
            app.push_status_message("Refreshed".to_string());
        }
        Action::ClearDatabase => app.clear_database(),
        Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Tab;
    use sensorlog_store::Store;
    use std::time::Duration;

    #[test]
    fn test_key_bindings() {
        assert_eq!(handle_key(KeyCode::Char('q')), Action::Quit);
        assert_eq!(handle_key(KeyCode::Tab), Action::NextTab);
        assert_eq!(handle_key(KeyCode::Char('l')), Action::NextTab);
        assert_eq!(handle_key(KeyCode::BackTab), Action::PreviousTab);
        assert_eq!(handle_key(KeyCode::Char('j')), Action::SelectNext);
        assert_eq!(handle_key(KeyCode::Up), Action::SelectPrevious);
        assert_eq!(handle_key(KeyCode::Char('r')), Action::Refresh);
        assert_eq!(handle_key(KeyCode::Char('c')), Action::ClearDatabase);
        assert_eq!(handle_key(KeyCode::Char('x')), Action::None);
    }

    #[test]
    fn test_apply_tab_and_quit() {
        let mut app = App::new(Store::open_in_memory().unwrap(), 15, Duration::from_secs(1));
        apply_action(&mut app, Action::NextTab);
        assert_eq!(app.active_tab, Tab::Database);
        apply_action(&mut app, Action::PreviousTab);
        apply_action(&mut app, Action::PreviousTab);
        assert_eq!(app.active_tab, Tab::ByDevice);

        apply_action(&mut app, Action::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_apply_clear() {
        let store = Store::open_in_memory().unwrap();
        store.insert(&["18", "55.2", "23.1", "1.8"]).unwrap();
        let mut app = App::new(store, 15, Duration::from_secs(1));
        apply_action(&mut app, Action::NextTab);
        assert_eq!(app.rows.len(), 1);

        apply_action(&mut app, Action::ClearDatabase);
        assert!(app.rows.is_empty());
        assert_eq!(app.row_count, 0);
    }
}
