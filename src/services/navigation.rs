//! Keyboard navigation over the budget grid
//!
//! The grid is addressed by the flattened row list (income rows, then
//! expense rows, in display order) and the month list of the current range.
//! Moves clamp at the edges instead of wrapping.
//!
//! Focus that follows a structural change (a freshly inserted row) is not
//! applied immediately. It is queued with [`GridNavigator::request_focus`]
//! and applied by [`GridNavigator::flush_pending_focus`] once the host has
//! finished the current update cycle.

use std::fmt;

use tracing::debug;

use crate::models::{CategoryType, GroupId, MonthKey, RowId};
use crate::store::BudgetStore;

/// A single cell, addressed by row and month
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row_id: RowId,
    pub month_key: MonthKey,
}

impl CellCoord {
    pub fn new(row_id: RowId, month_key: impl Into<MonthKey>) -> Self {
        Self {
            row_id,
            month_key: month_key.into(),
        }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row_id, self.month_key)
    }
}

/// Keys the navigator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
}

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved (or stayed on an edge cell)
    Moved(CellCoord),
    /// A row was inserted; focus on it is pending until the next flush
    RowInserted(CellCoord),
    /// The key was not intercepted; the host applies its default behaviour
    Ignored,
}

/// Tracks the focused cell
#[derive(Debug, Clone, Default)]
pub struct GridNavigator {
    active: Option<CellCoord>,
    pending_focus: Option<CellCoord>,
}

impl GridNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused cell, if any
    pub fn active(&self) -> Option<&CellCoord> {
        self.active.as_ref()
    }

    pub fn pending_focus(&self) -> Option<&CellCoord> {
        self.pending_focus.as_ref()
    }

    pub fn is_active(&self, row_id: RowId, month_key: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|c| c.row_id == row_id && c.month_key == month_key)
    }

    /// Focus a cell right away
    pub fn focus_cell(&mut self, coord: CellCoord) {
        self.active = Some(coord);
    }

    /// Queue focus for after the current update cycle
    pub fn request_focus(&mut self, coord: CellCoord) {
        self.pending_focus = Some(coord);
    }

    /// Apply queued focus if its cell exists in the store.
    ///
    /// Returns true if focus changed.
    pub fn flush_pending_focus(&mut self, store: &BudgetStore) -> bool {
        let Some(coord) = self.pending_focus.take() else {
            return false;
        };

        if cell_exists(store, &coord) {
            debug!(cell = %coord, "applying deferred focus");
            self.active = Some(coord);
            true
        } else {
            false
        }
    }

    /// Focus the first month of the first row, or nothing for an empty grid
    pub fn focus_first_cell(&mut self, store: &BudgetStore) {
        let first_row = store.groups().rows().next();
        let first_month = store.months().first();

        self.active = match (first_row, first_month) {
            (Some(row), Some(month)) => Some(CellCoord::new(row.id, month.key.clone())),
            _ => None,
        };
    }

    /// Fall back to the first cell when the focused one left the grid
    pub fn ensure_active_in_range(&mut self, store: &BudgetStore) {
        let Some(active) = &self.active else {
            return;
        };

        if !cell_exists(store, active) {
            debug!(cell = %active, "focused cell left the grid");
            self.focus_first_cell(store);
        }
    }

    /// Insert a row under a group and queue focus on its first month
    pub fn add_row_under(
        &mut self,
        store: &mut BudgetStore,
        group_id: GroupId,
        kind: CategoryType,
    ) -> Option<CellCoord> {
        let row_id = store.add_row_under(group_id, kind)?;
        let first_month = store.months().first()?.key.clone();
        let coord = CellCoord::new(row_id, first_month);
        self.request_focus(coord.clone());
        Some(coord)
    }

    /// React to a key on the focused cell
    pub fn handle_key(&mut self, key: NavKey, store: &mut BudgetStore) -> NavOutcome {
        let Some(active) = self.active.clone() else {
            self.focus_first_cell(store);
            return match &self.active {
                Some(coord) => NavOutcome::Moved(coord.clone()),
                None => NavOutcome::Ignored,
            };
        };

        let rows: Vec<(RowId, GroupId)> = store
            .groups()
            .rows()
            .map(|row| (row.id, row.parent_id))
            .collect();
        let month_keys: Vec<MonthKey> = store.months().iter().map(|m| m.key.clone()).collect();

        let row_index = rows.iter().position(|(id, _)| *id == active.row_id);
        let month_index = month_keys.iter().position(|k| *k == active.month_key);
        let (Some(row_index), Some(month_index)) = (row_index, month_index) else {
            self.focus_first_cell(store);
            return match &self.active {
                Some(coord) => NavOutcome::Moved(coord.clone()),
                None => NavOutcome::Ignored,
            };
        };

        let last_month = month_keys.len() - 1;
        let parent_id = rows[row_index].1;

        match key {
            NavKey::Right | NavKey::Left => {
                let delta = if key == NavKey::Right { 1 } else { -1 };
                let target = clamp_index(month_index as isize + delta, month_keys.len());
                self.move_to(CellCoord::new(active.row_id, month_keys[target].clone()))
            }
            NavKey::Down | NavKey::Up => {
                let delta = if key == NavKey::Down { 1 } else { -1 };
                let target = clamp_index(row_index as isize + delta, rows.len());
                self.move_to(CellCoord::new(rows[target].0, active.month_key))
            }
            NavKey::Enter => self.insert_under_parent(store, parent_id),
            NavKey::Tab if month_index == last_month => match rows.get(row_index + 1) {
                Some((next_row, _)) => {
                    self.move_to(CellCoord::new(*next_row, month_keys[0].clone()))
                }
                None => self.insert_under_parent(store, parent_id),
            },
            NavKey::Tab => NavOutcome::Ignored,
        }
    }

    fn move_to(&mut self, coord: CellCoord) -> NavOutcome {
        self.active = Some(coord.clone());
        NavOutcome::Moved(coord)
    }

    fn insert_under_parent(&mut self, store: &mut BudgetStore, parent_id: GroupId) -> NavOutcome {
        let Some(kind) = store.find_group_by_id(parent_id).map(|g| g.kind) else {
            return NavOutcome::Ignored;
        };

        match self.add_row_under(store, parent_id, kind) {
            Some(coord) => NavOutcome::RowInserted(coord),
            None => NavOutcome::Ignored,
        }
    }
}

fn clamp_index(index: isize, len: usize) -> usize {
    index.clamp(0, len.saturating_sub(1) as isize) as usize
}

fn cell_exists(store: &BudgetStore, coord: &CellCoord) -> bool {
    store.months().iter().any(|m| m.key == coord.month_key) && store.find_row(coord.row_id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthRange;

    fn demo() -> (BudgetStore, GridNavigator) {
        let store = BudgetStore::with_demo_data();
        let mut nav = GridNavigator::new();
        nav.focus_first_cell(&store);
        (store, nav)
    }

    fn row_ids(store: &BudgetStore) -> Vec<RowId> {
        store.all_rows().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_focus_first_cell() {
        let (store, nav) = demo();
        let active = nav.active().unwrap();
        assert_eq!(active.row_id, row_ids(&store)[0]);
        assert_eq!(active.month_key, "2024-01");
    }

    #[test]
    fn test_focus_first_cell_on_empty_grid() {
        let store = BudgetStore::new(MonthRange::year(2024));
        let mut nav = GridNavigator::new();
        nav.focus_first_cell(&store);
        assert!(nav.active().is_none());
    }

    #[test]
    fn test_horizontal_moves_clamp() {
        let (mut store, mut nav) = demo();

        nav.handle_key(NavKey::Right, &mut store);
        assert_eq!(nav.active().unwrap().month_key, "2024-02");

        nav.handle_key(NavKey::Left, &mut store);
        let outcome = nav.handle_key(NavKey::Left, &mut store);
        assert_eq!(nav.active().unwrap().month_key, "2024-01");
        assert!(matches!(outcome, NavOutcome::Moved(_)));

        for _ in 0..20 {
            nav.handle_key(NavKey::Right, &mut store);
        }
        assert_eq!(nav.active().unwrap().month_key, "2024-12");
    }

    #[test]
    fn test_vertical_moves_clamp() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);

        let outcome = nav.handle_key(NavKey::Up, &mut store);
        assert_eq!(outcome, NavOutcome::Moved(CellCoord::new(rows[0], "2024-01")));

        nav.handle_key(NavKey::Right, &mut store);
        nav.handle_key(NavKey::Down, &mut store);
        assert_eq!(nav.active(), Some(&CellCoord::new(rows[1], "2024-02")));

        for _ in 0..20 {
            nav.handle_key(NavKey::Down, &mut store);
        }
        assert_eq!(nav.active(), Some(&CellCoord::new(rows[rows.len() - 1], "2024-02")));
    }

    #[test]
    fn test_down_crosses_from_income_into_expense_rows() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);
        for _ in 0..5 {
            nav.handle_key(NavKey::Down, &mut store);
        }
        assert_eq!(nav.active().unwrap().row_id, rows[5]);
        assert_eq!(
            store.find_row(rows[5]).unwrap().kind,
            CategoryType::Expense
        );
    }

    #[test]
    fn test_enter_inserts_row_under_current_group() {
        let (mut store, mut nav) = demo();
        let group_id = store.income_groups()[0].id;

        let outcome = nav.handle_key(NavKey::Enter, &mut store);
        let NavOutcome::RowInserted(coord) = outcome else {
            panic!("expected a row insertion, got {:?}", outcome);
        };

        assert_eq!(store.income_groups()[0].rows.len(), 4);
        assert_eq!(store.find_row(coord.row_id).unwrap().parent_id, group_id);
        assert_eq!(coord.month_key, "2024-01");

        // Focus lands once the update cycle completes
        assert_ne!(nav.active(), Some(&coord));
        assert!(nav.flush_pending_focus(&store));
        assert_eq!(nav.active(), Some(&coord));
        assert!(!nav.flush_pending_focus(&store));
    }

    #[test]
    fn test_tab_only_intercepted_on_last_month() {
        let (mut store, mut nav) = demo();
        let before = nav.active().cloned();
        assert_eq!(nav.handle_key(NavKey::Tab, &mut store), NavOutcome::Ignored);
        assert_eq!(nav.active().cloned(), before);
    }

    #[test]
    fn test_tab_on_last_month_moves_to_next_row() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);
        nav.focus_cell(CellCoord::new(rows[0], "2024-12"));

        let outcome = nav.handle_key(NavKey::Tab, &mut store);
        assert_eq!(outcome, NavOutcome::Moved(CellCoord::new(rows[1], "2024-01")));
    }

    #[test]
    fn test_tab_on_last_cell_inserts_row() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);
        let last_row = *rows.last().unwrap();
        let last_group = store.find_row(last_row).unwrap().parent_id;
        nav.focus_cell(CellCoord::new(last_row, "2024-12"));

        let outcome = nav.handle_key(NavKey::Tab, &mut store);
        let NavOutcome::RowInserted(coord) = outcome else {
            panic!("expected a row insertion, got {:?}", outcome);
        };

        let new_row = store.find_row(coord.row_id).unwrap();
        assert_eq!(new_row.parent_id, last_group);
        assert_eq!(new_row.kind, CategoryType::Expense);
        assert_eq!(store.all_rows().len(), rows.len() + 1);

        nav.flush_pending_focus(&store);
        assert_eq!(nav.active(), Some(&CellCoord::new(coord.row_id, "2024-01")));
    }

    #[test]
    fn test_range_change_falls_back_to_first_cell() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);
        nav.focus_cell(CellCoord::new(rows[3], "2024-11"));

        store.set_end_month(6);
        nav.ensure_active_in_range(&store);
        assert_eq!(nav.active(), Some(&CellCoord::new(rows[0], "2024-01")));
    }

    #[test]
    fn test_active_cell_kept_when_still_in_range() {
        let (mut store, mut nav) = demo();
        let rows = row_ids(&store);
        nav.focus_cell(CellCoord::new(rows[3], "2024-03"));

        store.set_end_month(6);
        nav.ensure_active_in_range(&store);
        assert_eq!(nav.active(), Some(&CellCoord::new(rows[3], "2024-03")));
    }

    #[test]
    fn test_deleted_row_falls_back_to_first_cell() {
        let (mut store, mut nav) = demo();
        let group = &store.expense_groups()[0];
        let (group_id, row_id) = (group.id, group.rows[0].id);
        nav.focus_cell(CellCoord::new(row_id, "2024-04"));

        store.delete_row(row_id, group_id, CategoryType::Expense);
        nav.ensure_active_in_range(&store);
        assert_eq!(nav.active().unwrap().row_id, row_ids(&store)[0]);
    }

    #[test]
    fn test_pending_focus_dropped_for_missing_cell() {
        let (store, mut nav) = demo();
        nav.request_focus(CellCoord::new(RowId::new(), "2024-01"));
        assert!(!nav.flush_pending_focus(&store));
        assert!(nav.pending_focus().is_none());
    }

    #[test]
    fn test_key_without_focus_focuses_first_cell() {
        let mut store = BudgetStore::with_demo_data();
        let mut nav = GridNavigator::new();
        let outcome = nav.handle_key(NavKey::Down, &mut store);
        assert!(matches!(outcome, NavOutcome::Moved(_)));
        assert_eq!(nav.active().unwrap().month_key, "2024-01");
    }
}
