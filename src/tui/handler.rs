//! Event handler for the TUI
//!
//! Routes keyboard events to the open dialog, the cell editor, or the grid
//! depending on the current application state.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::CategoryType;
use crate::services::NavKey;

use super::app::{ActiveDialog, App, InputMode};
use super::dialogs;
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Key(_) | Event::Tick | Event::Resize(_, _) => {}
    }
    app.after_update();
    Ok(())
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if app.has_dialog() {
        handle_dialog_key(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Editing => handle_editing_key(app, key),
    }
}

/// Map a key to a grid navigation key
pub fn nav_key(key: &KeyEvent) -> Option<NavKey> {
    if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(NavKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(NavKey::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(NavKey::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(NavKey::Right),
        KeyCode::Enter => Some(NavKey::Enter),
        KeyCode::Tab => Some(NavKey::Tab),
        _ => None,
    }
}

/// Handle keys in normal mode
fn handle_normal_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('d') {
            app.request_delete();
        }
        return;
    }

    if let Some(nav) = nav_key(&key) {
        app.clear_status();
        app.navigate(nav);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        // Cell values
        KeyCode::Char(c) if c.is_ascii_digit() || c == '-' || c == '.' => {
            app.start_editing(Some(c))
        }
        KeyCode::Char('e') | KeyCode::F(2) => app.start_editing(None),
        KeyCode::Backspace | KeyCode::Delete => app.clear_cell(),
        KeyCode::Char('f') => app.apply_to_all_months(),

        // Structure
        KeyCode::Char('n') => app.add_row(),
        KeyCode::Char('r') => app.begin_rename_row(),
        KeyCode::Char('R') => app.begin_rename_group(),
        KeyCode::Char('i') => app.add_group(CategoryType::Income),
        KeyCode::Char('x') => app.add_group(CategoryType::Expense),

        // Range
        KeyCode::Char('p') => app.open_range_dialog(),
        KeyCode::Char('[') => app.shift_end(-1),
        KeyCode::Char(']') => app.shift_end(1),
        KeyCode::Char('{') => app.shift_start(-1),
        KeyCode::Char('}') => app.shift_start(1),

        _ => {}
    }
}

/// Handle keys while editing a cell
fn handle_editing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Tab => {
            app.commit_edit();
            app.navigate(NavKey::Tab);
        }
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            app.editor.handle_key(key);
        }
    }
}

/// Handle keys when a dialog is open
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog.clone() {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::ConfirmDelete(row_id) => dialogs::confirm::handle_key(app, row_id, key),
        ActiveDialog::RenameRow(_) | ActiveDialog::RenameGroup(_) => {
            dialogs::rename::handle_key(app, key)
        }
        ActiveDialog::Range => dialogs::range::handle_key(app, key),
        ActiveDialog::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::MonthRange;
    use crate::store::BudgetStore;

    fn demo_app() -> App {
        App::new(BudgetStore::with_demo_data(), Settings::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn press_ctrl(app: &mut App, c: char) {
        handle_event(
            app,
            Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
        )
        .unwrap();
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn active_value(app: &App) -> f64 {
        let cell = app.active_cell().unwrap();
        app.active_row().unwrap().value(&cell.month_key)
    }

    #[test]
    fn test_nav_key_mapping() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(nav_key(&key(KeyCode::Char('j'))), Some(NavKey::Down));
        assert_eq!(nav_key(&key(KeyCode::Left)), Some(NavKey::Left));
        assert_eq!(nav_key(&key(KeyCode::Tab)), Some(NavKey::Tab));
        assert_eq!(nav_key(&key(KeyCode::Char('q'))), None);
        assert_eq!(
            nav_key(&KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_typing_digits_edits_cell() {
        let mut app = demo_app();
        type_str(&mut app, "1,250.5");
        assert_eq!(app.input_mode, InputMode::Editing);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(active_value(&app), 1250.5);
    }

    #[test]
    fn test_escape_discards_edit() {
        let mut app = demo_app();
        type_str(&mut app, "999");
        press(&mut app, KeyCode::Esc);
        assert_eq!(active_value(&app), 100.0);
    }

    #[test]
    fn test_tab_commits_and_moves_right() {
        let mut app = demo_app();
        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "7");
        press(&mut app, KeyCode::Tab);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.active_cell().unwrap().month_key, "2024-02");
        assert_eq!(app.active_row().unwrap().value("2024-01"), 7.0);
    }

    #[test]
    fn test_tab_on_last_cell_inserts_row() {
        let mut app = App::new(
            BudgetStore::with_demo_data_in(MonthRange::new(2024, 1, 2024, 2)),
            Settings::default(),
        );
        let last_row = *app.store.all_rows().last().unwrap();
        let (last_id, group_id) = (last_row.id, last_row.parent_id);

        for _ in 0..app.store.all_rows().len() {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Right);
        assert_eq!(app.active_cell().unwrap().row_id, last_id);

        press(&mut app, KeyCode::Tab);
        let active = app.active_cell().unwrap().clone();
        let new_row = app.store.find_row(active.row_id).unwrap();
        assert_ne!(new_row.id, last_id);
        assert_eq!(new_row.parent_id, group_id);
        assert_eq!(new_row.name, "New category");
        assert_eq!(active.month_key, "2024-01");
    }

    #[test]
    fn test_enter_inserts_row_in_current_group() {
        let mut app = demo_app();
        let before = app.store.all_rows().len();
        let group = app.active_row().unwrap().parent_id;
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.store.all_rows().len(), before + 1);
        assert_eq!(app.active_row().unwrap().parent_id, group);
        assert_eq!(app.active_row().unwrap().name, "New category");
    }

    #[test]
    fn test_ctrl_d_asks_then_deletes() {
        let mut app = demo_app();
        let doomed = app.active_cell().unwrap().row_id;

        press_ctrl(&mut app, 'd');
        assert_eq!(app.active_dialog, ActiveDialog::ConfirmDelete(doomed));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.store.find_row(doomed).is_some());

        press_ctrl(&mut app, 'd');
        press(&mut app, KeyCode::Char('y'));
        assert!(app.store.find_row(doomed).is_none());
        assert!(app.active_cell().is_some());
    }

    #[test]
    fn test_rename_row_via_dialog() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('r'));
        for _ in 0.."General Income".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "Retainers ");
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_dialog());
        assert_eq!(app.active_row().unwrap().name, "Retainers");
    }

    #[test]
    fn test_range_dialog_applies_normalized_range() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.active_dialog, ActiveDialog::Range);

        // start month 1 -> 5, end month 12 -> 4
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "5");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "4");
        press(&mut app, KeyCode::Enter);

        assert!(!app.has_dialog());
        assert_eq!(app.store.range(), MonthRange::new(2024, 4, 2024, 5));
        let keys: Vec<&str> = app.store.months().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-04", "2024-05"]);
        assert_eq!(app.active_cell().unwrap().month_key, "2024-04");
    }

    #[test]
    fn test_range_dialog_reports_bad_month() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "9");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.active_dialog, ActiveDialog::Range);
        assert!(app.range_form.error_message.is_some());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.store.range(), MonthRange::year(2024));
    }

    #[test]
    fn test_bracket_keys_shift_range() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.store.range(), MonthRange::new(2024, 1, 2025, 1));
        press(&mut app, KeyCode::Char('{'));
        assert_eq!(app.store.range(), MonthRange::new(2023, 12, 2025, 1));

        let row = app.store.all_rows()[0];
        assert_eq!(row.value("2023-12"), 0.0);
        assert_eq!(row.value("2025-01"), 0.0);
    }

    #[test]
    fn test_apply_to_all_key() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('f'));
        let row = app.active_row().unwrap();
        assert!(app.store.months().iter().all(|m| row.value(&m.key) == 100.0));
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_dialog, ActiveDialog::Help);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.has_dialog());
        // 'x' went to the dialog, not the grid
        assert_eq!(app.store.expense_groups().len(), 2);
    }

    #[test]
    fn test_quit() {
        let mut app = demo_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
