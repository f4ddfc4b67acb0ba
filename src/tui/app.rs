//! Application state for the TUI
//!
//! The App owns the budget store and everything needed to render it and
//! react to keys: the grid navigator, the summary cache, the cell editor
//! and the state of whichever dialog is open.

use tracing::{debug, info};

use crate::config::Settings;
use crate::models::{parse_amount, CategoryRow, CategoryType, GroupId, MonthRange, RowId};
use crate::services::{BudgetSummary, CellCoord, GridNavigator, NavKey, NavOutcome, SummaryCache};
use crate::store::BudgetStore;

use super::dialogs::range::RangeFormState;
use super::widgets::input::TextInput;

/// Mode of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the focused cell
    Editing,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    ConfirmDelete(RowId),
    RenameRow(RowId),
    RenameGroup(GroupId),
    Range,
}

/// Main application state
pub struct App {
    pub store: BudgetStore,

    pub navigator: GridNavigator,

    /// Derived totals, recomputed when the store revision moves
    pub summary: SummaryCache,

    pub settings: Settings,

    /// Whether the app should quit
    pub should_quit: bool,

    pub input_mode: InputMode,

    pub active_dialog: ActiveDialog,

    /// Buffer for the cell being edited
    pub editor: TextInput,

    /// Buffer for the rename dialogs
    pub rename_input: TextInput,

    pub range_form: RangeFormState,

    /// First month column shown in the grid
    pub month_scroll: usize,

    /// Status message to display
    pub status_message: Option<String>,
}

impl App {
    pub fn new(store: BudgetStore, settings: Settings) -> Self {
        let mut navigator = GridNavigator::new();
        navigator.focus_first_cell(&store);

        Self {
            store,
            navigator,
            summary: SummaryCache::new(),
            settings,
            should_quit: false,
            input_mode: InputMode::default(),
            active_dialog: ActiveDialog::default(),
            editor: TextInput::new(),
            rename_input: TextInput::new(),
            range_form: RangeFormState::default(),
            month_scroll: 0,
            status_message: None,
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Check if a dialog is open
    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
    }

    /// Settle focus once the current event has been handled.
    ///
    /// Applies deferred focus first, then pulls focus back into the grid if
    /// the focused cell disappeared.
    pub fn after_update(&mut self) {
        self.navigator.flush_pending_focus(&self.store);
        self.navigator.ensure_active_in_range(&self.store);
        if self.navigator.active().is_none() {
            self.navigator.focus_first_cell(&self.store);
        }
    }

    /// Current derived totals
    pub fn summary(&mut self) -> &BudgetSummary {
        self.summary.get(&self.store)
    }

    /// The focused cell
    pub fn active_cell(&self) -> Option<&CellCoord> {
        self.navigator.active()
    }

    /// The row holding the focused cell
    pub fn active_row(&self) -> Option<&CategoryRow> {
        self.active_cell()
            .and_then(|cell| self.store.find_row(cell.row_id))
    }

    /// Focused cell along with its row's parent and type
    fn active_target(&self) -> Option<(CellCoord, GroupId, CategoryType)> {
        let cell = self.active_cell()?.clone();
        let row = self.store.find_row(cell.row_id)?;
        Some((cell, row.parent_id, row.kind))
    }

    // === Navigation ===

    /// Route a navigation key through the grid controller.
    ///
    /// A Tab the controller does not intercept moves one cell right.
    pub fn navigate(&mut self, key: NavKey) {
        match self.navigator.handle_key(key, &mut self.store) {
            NavOutcome::Ignored if key == NavKey::Tab => {
                self.navigator.handle_key(NavKey::Right, &mut self.store);
            }
            NavOutcome::RowInserted(_) => self.set_status("Row added"),
            _ => {}
        }
    }

    // === Cell editing ===

    /// Enter editing mode on the focused cell.
    ///
    /// With a seed character the buffer starts with just that character,
    /// otherwise with the current value.
    pub fn start_editing(&mut self, seed: Option<char>) {
        let Some(cell) = self.active_cell() else {
            return;
        };
        let current = self
            .store
            .find_row(cell.row_id)
            .map(|row| row.value(&cell.month_key))
            .unwrap_or_default();

        let content = match seed {
            Some(c) => c.to_string(),
            None if current == 0.0 => String::new(),
            None => current.to_string(),
        };
        self.editor = TextInput::new().content(content).focused(true);
        self.input_mode = InputMode::Editing;
    }

    /// Write the editor buffer into the focused cell
    pub fn commit_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        let Some((cell, parent_id, kind)) = self.active_target() else {
            return;
        };

        let value = parse_amount(self.editor.value());
        self.store
            .update_cell_value(cell.row_id, parent_id, kind, &cell.month_key, value);
        self.editor.clear();
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.editor.clear();
    }

    /// Reset the focused cell to zero
    pub fn clear_cell(&mut self) {
        if let Some((cell, parent_id, kind)) = self.active_target() {
            self.store
                .update_cell_value(cell.row_id, parent_id, kind, &cell.month_key, 0.0);
        }
    }

    /// Copy the focused value across the whole range
    pub fn apply_to_all_months(&mut self) {
        let Some((cell, parent_id, kind)) = self.active_target() else {
            return;
        };

        self.store
            .apply_value_to_all_months(cell.row_id, parent_id, kind, &cell.month_key);
        let value = self.settings.format_amount(
            self.store
                .find_row(cell.row_id)
                .map(|row| row.value(&cell.month_key))
                .unwrap_or_default(),
        );
        self.set_status(format!("Applied {} to all months", value));
    }

    // === Rows and groups ===

    /// Add a row under the focused row's group
    pub fn add_row(&mut self) {
        let target = match self.active_row() {
            Some(row) => Some((row.parent_id, row.kind)),
            None => self.store.groups().iter().next().map(|g| (g.id, g.kind)),
        };

        let Some((group_id, kind)) = target else {
            self.set_status("Add a group first (i / x)");
            return;
        };

        if self
            .navigator
            .add_row_under(&mut self.store, group_id, kind)
            .is_some()
        {
            self.set_status("Row added");
        }
    }

    /// Add a group with one starter row, then offer to rename the group
    pub fn add_group(&mut self, kind: CategoryType) {
        let group_id = self.store.add_parent(kind);
        self.navigator.add_row_under(&mut self.store, group_id, kind);
        info!(%group_id, %kind, "group added from grid");

        self.rename_input = TextInput::new()
            .label("Name")
            .content(kind.new_group_name())
            .focused(true);
        self.open_dialog(ActiveDialog::RenameGroup(group_id));
    }

    /// Ask before deleting the focused row
    pub fn request_delete(&mut self) {
        if let Some(row) = self.active_row() {
            let row_id = row.id;
            self.open_dialog(ActiveDialog::ConfirmDelete(row_id));
        }
    }

    pub fn confirm_delete(&mut self, row_id: RowId) {
        self.close_dialog();
        let Some(row) = self.store.find_row(row_id) else {
            return;
        };
        let (parent_id, kind, name) = (row.parent_id, row.kind, row.name.clone());

        self.store.delete_row(row_id, parent_id, kind);
        self.set_status(format!("Deleted '{}'", name));
    }

    /// Open the rename dialog for the focused row
    pub fn begin_rename_row(&mut self) {
        let Some(row) = self.active_row() else {
            return;
        };
        let (row_id, name) = (row.id, row.name.clone());

        self.rename_input = TextInput::new().label("Name").content(name).focused(true);
        self.open_dialog(ActiveDialog::RenameRow(row_id));
    }

    /// Open the rename dialog for the focused row's group
    pub fn begin_rename_group(&mut self) {
        let Some(group) = self
            .active_row()
            .and_then(|row| self.store.find_group_by_id(row.parent_id))
        else {
            return;
        };
        let (group_id, name) = (group.id, group.name.clone());

        self.rename_input = TextInput::new().label("Name").content(name).focused(true);
        self.open_dialog(ActiveDialog::RenameGroup(group_id));
    }

    /// Apply the rename dialog's buffer
    pub fn commit_rename(&mut self) {
        let name = self.rename_input.value().trim().to_string();
        let dialog = std::mem::take(&mut self.active_dialog);
        if name.is_empty() {
            self.set_status("Name cannot be empty");
            return;
        }

        match dialog {
            ActiveDialog::RenameRow(row_id) => {
                if let Some(row) = self.store.find_row(row_id) {
                    let (parent_id, kind) = (row.parent_id, row.kind);
                    self.store.rename_row(row_id, parent_id, kind, &name);
                }
            }
            ActiveDialog::RenameGroup(group_id) => {
                if let Some(group) = self.store.find_group_by_id(group_id) {
                    let kind = group.kind;
                    self.store.rename_group(group_id, kind, &name);
                }
            }
            _ => {}
        }
    }

    // === Range ===

    pub fn open_range_dialog(&mut self) {
        self.range_form = RangeFormState::from_range(self.store.range());
        self.open_dialog(ActiveDialog::Range);
    }

    /// Apply the range dialog's fields
    pub fn commit_range(&mut self) {
        match self.range_form.build_range() {
            Ok(range) => {
                self.close_dialog();
                self.set_range(range);
            }
            Err(message) => self.range_form.set_error(message),
        }
    }

    /// Move the end month by a number of months
    pub fn shift_end(&mut self, delta: i64) {
        let range = self.store.range().shift_end(delta);
        self.set_range(range);
    }

    /// Move the start month by a number of months
    pub fn shift_start(&mut self, delta: i64) {
        let range = self.store.range().shift_start(delta);
        self.set_range(range);
    }

    fn set_range(&mut self, range: MonthRange) {
        self.store.set_range(range);
        self.month_scroll = 0;
        debug!(range = %self.store.range(), "range changed from grid");
        self.set_status(format!("Range: {}", self.store.range()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_app() -> App {
        App::new(BudgetStore::with_demo_data(), Settings::default())
    }

    fn active(app: &App) -> CellCoord {
        app.active_cell().cloned().unwrap()
    }

    #[test]
    fn test_new_focuses_first_cell() {
        let app = demo_app();
        let first_row = app.store.all_rows()[0].id;
        assert_eq!(active(&app), CellCoord::new(first_row, "2024-01"));
    }

    #[test]
    fn test_new_empty_store_has_no_focus() {
        let app = App::new(BudgetStore::new(MonthRange::year(2024)), Settings::default());
        assert!(app.active_cell().is_none());
    }

    #[test]
    fn test_tab_moves_right_when_not_intercepted() {
        let mut app = demo_app();
        app.navigate(NavKey::Tab);
        assert_eq!(active(&app).month_key, "2024-02");
    }

    #[test]
    fn test_edit_commit_writes_parsed_value() {
        let mut app = demo_app();
        app.start_editing(Some('4'));
        app.editor.insert('2');
        app.commit_edit();

        let row = app.active_row().unwrap();
        assert_eq!(row.value("2024-01"), 42.0);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_garbage_becomes_zero() {
        let mut app = demo_app();
        app.start_editing(None);
        app.editor = TextInput::new().content("abc");
        app.commit_edit();
        assert_eq!(app.active_row().unwrap().value("2024-01"), 0.0);
    }

    #[test]
    fn test_edit_starts_with_current_value() {
        let mut app = demo_app();
        app.start_editing(None);
        assert_eq!(app.editor.value(), "100");
        app.cancel_edit();
        assert_eq!(app.active_row().unwrap().value("2024-01"), 100.0);
    }

    #[test]
    fn test_clear_cell() {
        let mut app = demo_app();
        app.clear_cell();
        assert_eq!(app.active_row().unwrap().value("2024-01"), 0.0);
    }

    #[test]
    fn test_apply_to_all_months() {
        let mut app = demo_app();
        app.apply_to_all_months();
        let row = app.active_row().unwrap();
        assert!(app.store.months().iter().all(|m| row.value(&m.key) == 100.0));
    }

    #[test]
    fn test_add_row_focus_is_deferred() {
        let mut app = demo_app();
        let before = active(&app);
        app.add_row();
        assert_eq!(active(&app), before);

        app.after_update();
        let now = active(&app);
        assert_ne!(now.row_id, before.row_id);
        assert_eq!(now.month_key, "2024-01");
        assert_eq!(app.active_row().unwrap().name, "New category");
    }

    #[test]
    fn test_add_group_adds_starter_row_and_renames() {
        let mut app = demo_app();
        app.add_group(CategoryType::Expense);
        let ActiveDialog::RenameGroup(group_id) = app.active_dialog.clone() else {
            panic!("expected rename dialog");
        };
        assert_eq!(app.store.find_group_by_id(group_id).unwrap().rows.len(), 1);

        app.rename_input = TextInput::new().content("Marketing");
        app.commit_rename();
        app.after_update();

        assert!(!app.has_dialog());
        assert_eq!(app.store.find_group_by_id(group_id).unwrap().name, "Marketing");
        assert_eq!(app.active_row().unwrap().parent_id, group_id);
    }

    #[test]
    fn test_delete_moves_focus_to_first_cell() {
        let mut app = demo_app();
        app.navigate(NavKey::Down);
        let doomed = active(&app).row_id;

        app.request_delete();
        assert_eq!(app.active_dialog, ActiveDialog::ConfirmDelete(doomed));
        app.confirm_delete(doomed);
        app.after_update();

        assert!(app.store.find_row(doomed).is_none());
        assert_eq!(active(&app).row_id, app.store.all_rows()[0].id);
    }

    #[test]
    fn test_rename_row_rejects_empty() {
        let mut app = demo_app();
        app.begin_rename_row();
        app.rename_input = TextInput::new().content("   ");
        app.commit_rename();
        assert_eq!(app.active_row().unwrap().name, "General Income");
    }

    #[test]
    fn test_shift_end_shrinks_range_and_refocuses() {
        let mut app = demo_app();
        app.navigate(NavKey::Right);
        app.shift_end(-11);
        app.after_update();

        assert_eq!(app.store.months().len(), 1);
        assert_eq!(active(&app).month_key, "2024-01");
    }

    #[test]
    fn test_summary_tracks_edits() {
        let mut app = demo_app();
        let before = app.summary().total_income();
        app.clear_cell();
        assert_eq!(app.summary().total_income(), before - 100.0);
    }
}
