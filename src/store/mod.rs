//! In-memory budget store
//!
//! `BudgetStore` owns the selected month range, the month sequence built
//! from it, and the income and expense group collections. It is created
//! explicitly and passed to whatever needs it.
//!
//! Every operation is fail-soft: an unknown group or row id leaves the
//! store untouched, and creation returns `None` instead of an error.
//! Each state change bumps [`BudgetStore::revision`], which derived views
//! use to detect staleness.

pub mod demo;
pub mod observer;

use tracing::{debug, info};

use crate::models::{
    coerce_amount, BudgetId, CategoryGroup, CategoryRow, CategoryType, GroupId, Month, MonthRange, RowId,
    NEW_ROW_NAME,
};

pub use observer::{CoverageSync, MonthsObserver};

/// The two top-level group collections, partitioned by type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupCollections {
    pub income: Vec<CategoryGroup>,
    pub expense: Vec<CategoryGroup>,
}

impl GroupCollections {
    pub fn of_kind(&self, kind: CategoryType) -> &[CategoryGroup] {
        match kind {
            CategoryType::Income => &self.income,
            CategoryType::Expense => &self.expense,
        }
    }

    pub fn of_kind_mut(&mut self, kind: CategoryType) -> &mut Vec<CategoryGroup> {
        match kind {
            CategoryType::Income => &mut self.income,
            CategoryType::Expense => &mut self.expense,
        }
    }

    /// Income groups followed by expense groups
    pub fn iter(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.income.iter().chain(self.expense.iter())
    }

    /// Every row in display order
    pub fn rows(&self) -> impl Iterator<Item = &CategoryRow> {
        self.iter().flat_map(|group| group.rows.iter())
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut CategoryRow> {
        self.income
            .iter_mut()
            .chain(self.expense.iter_mut())
            .flat_map(|group| group.rows.iter_mut())
    }

    pub fn group_mut(&mut self, group_id: GroupId, kind: CategoryType) -> Option<&mut CategoryGroup> {
        self.of_kind_mut(kind).iter_mut().find(|g| g.id == group_id)
    }

    pub fn row_mut(
        &mut self,
        row_id: RowId,
        parent_id: GroupId,
        kind: CategoryType,
    ) -> Option<&mut CategoryRow> {
        self.group_mut(parent_id, kind)?.row_mut(row_id)
    }
}

/// The budget being edited
pub struct BudgetStore {
    id: BudgetId,
    range: MonthRange,
    months: Vec<Month>,
    groups: GroupCollections,
    revision: u64,
    observers: Vec<Box<dyn MonthsObserver>>,
}

impl BudgetStore {
    /// Create an empty budget over a range
    pub fn new(range: MonthRange) -> Self {
        Self::from_groups(range, Vec::new(), Vec::new())
    }

    /// Create a budget from existing groups.
    ///
    /// Rows are backfilled so they cover every month in the range.
    pub fn from_groups(
        range: MonthRange,
        income: Vec<CategoryGroup>,
        expense: Vec<CategoryGroup>,
    ) -> Self {
        let range = range.canonical().normalized();
        let mut store = Self {
            id: BudgetId::new(),
            range,
            months: range.months(),
            groups: GroupCollections { income, expense },
            revision: 0,
            observers: Vec::new(),
        };
        store.subscribe(CoverageSync);
        store.notify_months_changed();
        store
    }

    /// The seeded demo budget over its default range
    pub fn with_demo_data() -> Self {
        Self::with_demo_data_in(demo::demo_range())
    }

    /// The seeded demo budget over a custom range
    pub fn with_demo_data_in(range: MonthRange) -> Self {
        Self::from_groups(range, demo::demo_income_groups(), demo::demo_expense_groups())
    }

    /// Register an observer for month sequence changes
    pub fn subscribe<O: MonthsObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // === Reads ===

    /// Identity of this budget, distinct for every store created
    pub fn id(&self) -> BudgetId {
        self.id
    }

    pub fn range(&self) -> MonthRange {
        self.range
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Counter bumped on every state change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn groups(&self) -> &GroupCollections {
        &self.groups
    }

    pub fn income_groups(&self) -> &[CategoryGroup] {
        &self.groups.income
    }

    pub fn expense_groups(&self) -> &[CategoryGroup] {
        &self.groups.expense
    }

    pub fn groups_of(&self, kind: CategoryType) -> &[CategoryGroup] {
        self.groups.of_kind(kind)
    }

    /// Flattened rows in display order (income first)
    pub fn all_rows(&self) -> Vec<&CategoryRow> {
        self.groups.rows().collect()
    }

    pub fn find_group_by_id(&self, group_id: GroupId) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    pub fn find_row(&self, row_id: RowId) -> Option<&CategoryRow> {
        self.groups.rows().find(|row| row.id == row_id)
    }

    // === Range ===

    pub fn set_start_year(&mut self, year: i32) {
        let range = MonthRange {
            start_year: year,
            ..self.range
        };
        self.update_range(range);
    }

    pub fn set_start_month(&mut self, month: u32) {
        let range = MonthRange {
            start_month: month,
            ..self.range
        };
        self.update_range(range);
    }

    pub fn set_end_year(&mut self, year: i32) {
        let range = MonthRange {
            end_year: year,
            ..self.range
        };
        self.update_range(range);
    }

    pub fn set_end_month(&mut self, month: u32) {
        let range = MonthRange {
            end_month: month,
            ..self.range
        };
        self.update_range(range);
    }

    /// Replace all four range fields at once
    pub fn set_range(&mut self, range: MonthRange) {
        self.update_range(range);
    }

    /// Month numbers outside 1..=12 roll over, so the stored range always
    /// matches the first and last entries of the month sequence
    fn update_range(&mut self, range: MonthRange) {
        let normalized = range.canonical().normalized();
        if normalized == self.range {
            return;
        }

        self.range = normalized;
        self.months = normalized.months();
        self.touch();
        info!(range = %normalized, months = self.months.len(), "month range updated");

        self.notify_months_changed();
    }

    fn notify_months_changed(&mut self) {
        let mut changed = false;
        for observer in self.observers.iter_mut() {
            if observer.months_changed(&self.months, &mut self.groups) {
                changed = true;
            }
        }
        if changed {
            self.touch();
        }
    }

    // === Groups and rows ===

    /// Append a "New category" row to a group, zero-filled for every month.
    ///
    /// Returns `None` if no group of that type has the id.
    pub fn add_row_under(&mut self, group_id: GroupId, kind: CategoryType) -> Option<RowId> {
        let group = self.groups.group_mut(group_id, kind)?;
        let row = CategoryRow::new(group, NEW_ROW_NAME, &self.months);
        let row_id = row.id;
        group.rows.push(row);

        self.touch();
        debug!(%row_id, %group_id, %kind, "row added");
        Some(row_id)
    }

    /// Append an empty "New Income" / "New Expense" group
    pub fn add_parent(&mut self, kind: CategoryType) -> GroupId {
        let group = CategoryGroup::new(kind, kind.new_group_name());
        let group_id = group.id;
        self.groups.of_kind_mut(kind).push(group);

        self.touch();
        debug!(%group_id, %kind, "group added");
        group_id
    }

    pub fn delete_row(&mut self, row_id: RowId, parent_id: GroupId, kind: CategoryType) {
        let Some(group) = self.groups.group_mut(parent_id, kind) else {
            return;
        };
        let Some(index) = group.rows.iter().position(|row| row.id == row_id) else {
            return;
        };
        group.rows.remove(index);

        self.touch();
        debug!(%row_id, %parent_id, "row deleted");
    }

    pub fn rename_group(&mut self, group_id: GroupId, kind: CategoryType, name: &str) {
        let trimmed = name.trim();
        let changed = match self.groups.group_mut(group_id, kind) {
            Some(group) if group.name != trimmed => {
                group.name = trimmed.to_string();
                true
            }
            _ => false,
        };

        if changed {
            self.touch();
            debug!(%group_id, name = trimmed, "group renamed");
        }
    }

    pub fn rename_row(&mut self, row_id: RowId, parent_id: GroupId, kind: CategoryType, name: &str) {
        let trimmed = name.trim();
        let changed = match self.groups.row_mut(row_id, parent_id, kind) {
            Some(row) if row.name != trimmed => {
                row.name = trimmed.to_string();
                true
            }
            _ => false,
        };

        if changed {
            self.touch();
            debug!(%row_id, name = trimmed, "row renamed");
        }
    }

    /// Write one cell. Non-finite input is stored as zero.
    pub fn update_cell_value(
        &mut self,
        row_id: RowId,
        parent_id: GroupId,
        kind: CategoryType,
        month_key: &str,
        raw_value: f64,
    ) {
        let value = coerce_amount(raw_value);
        let changed = match self.groups.row_mut(row_id, parent_id, kind) {
            Some(row) if row.value(month_key) != value => {
                row.values.insert(month_key.to_string(), value);
                true
            }
            _ => false,
        };

        if changed {
            self.touch();
            debug!(%row_id, month = month_key, value, "cell updated");
        }
    }

    /// Copy one month's value into every month of the current range
    pub fn apply_value_to_all_months(
        &mut self,
        row_id: RowId,
        parent_id: GroupId,
        kind: CategoryType,
        month_key: &str,
    ) {
        let Some(row) = self.groups.row_mut(row_id, parent_id, kind) else {
            return;
        };

        let base = row.value(month_key);
        let mut changed = false;
        for month in &self.months {
            if row.value(&month.key) != base {
                changed = true;
            }
            row.values.insert(month.key.clone(), base);
        }

        if changed {
            self.touch();
            debug!(%row_id, month = month_key, value = base, "value applied to all months");
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn first_income_group(store: &BudgetStore) -> (GroupId, RowId) {
        let group = &store.income_groups()[0];
        (group.id, group.rows[0].id)
    }

    fn every_row_covers_months(store: &BudgetStore) -> bool {
        store.all_rows().iter().all(|row| row.covers(store.months()))
    }

    #[test]
    fn test_demo_data_covers_range() {
        let store = BudgetStore::with_demo_data();
        assert_eq!(store.months().len(), 12);
        assert_eq!(store.income_groups().len(), 2);
        assert_eq!(store.expense_groups().len(), 2);
        assert_eq!(store.all_rows().len(), 10);
        assert!(every_row_covers_months(&store));
    }

    #[test]
    fn test_rows_match_parent_type() {
        let store = BudgetStore::with_demo_data();
        for group in store.groups().iter() {
            for row in &group.rows {
                assert_eq!(row.kind, group.kind);
                assert_eq!(row.parent_id, group.id);
            }
        }
    }

    #[test]
    fn test_range_normalization_scenario() {
        let mut store = BudgetStore::with_demo_data();
        store.set_start_year(2024);
        store.set_start_month(5);
        store.set_end_year(2024);
        store.set_end_month(4);

        assert_eq!(store.range(), MonthRange::new(2024, 4, 2024, 5));
        let keys: Vec<&str> = store.months().iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-04", "2024-05"]);
    }

    #[test]
    fn test_range_change_backfills_rows() {
        let mut store = BudgetStore::with_demo_data();
        store.set_end_year(2025);
        store.set_end_month(6);

        assert_eq!(store.months().len(), 18);
        assert!(every_row_covers_months(&store));

        let row = store.all_rows()[0];
        assert_eq!(row.value("2025-06"), 0.0);
        assert_eq!(row.value("2024-01"), 100.0);
    }

    #[test]
    fn test_shrinking_range_keeps_old_values() {
        let mut store = BudgetStore::with_demo_data();
        store.set_range(MonthRange::new(2024, 2, 2024, 3));
        store.set_range(MonthRange::year(2024));

        assert_eq!(store.all_rows()[0].value("2024-01"), 100.0);
    }

    #[test]
    fn test_add_row_under_zero_fills() {
        let mut store = BudgetStore::with_demo_data();
        let (group_id, _) = first_income_group(&store);

        let row_id = store.add_row_under(group_id, CategoryType::Income).unwrap();
        let row = store.find_row(row_id).unwrap();

        assert_eq!(row.name, "New category");
        assert_eq!(row.kind, CategoryType::Income);
        assert_eq!(row.parent_id, group_id);
        assert_eq!(row.values.len(), 12);
        assert!(row.values.values().all(|v| *v == 0.0));
        assert_eq!(store.income_groups()[0].rows.last().unwrap().id, row_id);
    }

    #[test]
    fn test_add_row_under_unknown_group() {
        let mut store = BudgetStore::with_demo_data();
        let revision = store.revision();
        assert!(store.add_row_under(GroupId::new(), CategoryType::Income).is_none());

        // An income group id under the expense collection is not found either
        let (group_id, _) = first_income_group(&store);
        assert!(store.add_row_under(group_id, CategoryType::Expense).is_none());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_add_parent() {
        let mut store = BudgetStore::new(MonthRange::year(2024));
        let income = store.add_parent(CategoryType::Income);
        let expense = store.add_parent(CategoryType::Expense);

        assert_eq!(store.find_group_by_id(income).unwrap().name, "New Income");
        assert_eq!(store.find_group_by_id(expense).unwrap().name, "New Expense");
        assert!(store.find_group_by_id(expense).unwrap().rows.is_empty());
    }

    #[test]
    fn test_delete_row() {
        let mut store = BudgetStore::with_demo_data();
        let (group_id, row_id) = first_income_group(&store);

        store.delete_row(row_id, group_id, CategoryType::Income);
        assert!(store.find_row(row_id).is_none());
        assert_eq!(store.income_groups()[0].rows.len(), 2);

        let revision = store.revision();
        store.delete_row(row_id, group_id, CategoryType::Income);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_rename_trims_and_skips_unchanged() {
        let mut store = BudgetStore::with_demo_data();
        let (group_id, row_id) = first_income_group(&store);

        store.rename_group(group_id, CategoryType::Income, "  Core Revenue ");
        assert_eq!(store.find_group_by_id(group_id).unwrap().name, "Core Revenue");

        store.rename_row(row_id, group_id, CategoryType::Income, " Retainers ");
        assert_eq!(store.find_row(row_id).unwrap().name, "Retainers");

        let revision = store.revision();
        store.rename_row(row_id, group_id, CategoryType::Income, "Retainers");
        store.rename_group(group_id, CategoryType::Income, "Core Revenue  ");
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_cell_value() {
        let mut store = BudgetStore::with_demo_data();
        let (group_id, row_id) = first_income_group(&store);

        store.update_cell_value(row_id, group_id, CategoryType::Income, "2024-03", 250.5);
        assert_eq!(store.find_row(row_id).unwrap().value("2024-03"), 250.5);

        store.update_cell_value(row_id, group_id, CategoryType::Income, "2024-03", f64::NAN);
        assert_eq!(store.find_row(row_id).unwrap().value("2024-03"), 0.0);

        let revision = store.revision();
        store.update_cell_value(row_id, group_id, CategoryType::Income, "2024-03", 0.0);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_cell_with_wrong_parent_is_noop() {
        let mut store = BudgetStore::with_demo_data();
        let (_, row_id) = first_income_group(&store);
        let other_group = store.income_groups()[1].id;

        store.update_cell_value(row_id, other_group, CategoryType::Income, "2024-01", 999.0);
        assert_eq!(store.find_row(row_id).unwrap().value("2024-01"), 100.0);
    }

    #[test]
    fn test_apply_value_to_all_months() {
        let mut store = BudgetStore::with_demo_data();
        let (group_id, row_id) = first_income_group(&store);

        store.apply_value_to_all_months(row_id, group_id, CategoryType::Income, "2024-02");

        let row = store.find_row(row_id).unwrap();
        for month in store.months() {
            assert_eq!(row.value(&month.key), 120.0);
        }
    }

    #[test]
    fn test_find_group_across_collections() {
        let store = BudgetStore::with_demo_data();
        let expense_id = store.expense_groups()[1].id;
        let group = store.find_group_by_id(expense_id).unwrap();
        assert_eq!(group.name, "Salaries & Wages");
        assert!(store.find_group_by_id(GroupId::new()).is_none());
    }

    #[test]
    fn test_ids_unique_across_dataset() {
        let mut store = BudgetStore::with_demo_data();
        let group_id = store.expense_groups()[0].id;
        for _ in 0..5 {
            store.add_row_under(group_id, CategoryType::Expense);
        }
        let mut ids: Vec<RowId> = store.all_rows().iter().map(|r| r.id).collect();
        let total = ids.len();
        ids.sort_by_key(|id| *id.as_uuid());
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    struct CountingObserver(Rc<Cell<usize>>);

    impl MonthsObserver for CountingObserver {
        fn months_changed(&mut self, _months: &[Month], _groups: &mut GroupCollections) -> bool {
            self.0.set(self.0.get() + 1);
            false
        }
    }

    #[test]
    fn test_observers_run_on_range_change_only() {
        let mut store = BudgetStore::with_demo_data();
        let calls = Rc::new(Cell::new(0));
        store.subscribe(CountingObserver(Rc::clone(&calls)));

        let (group_id, row_id) = first_income_group(&store);
        store.update_cell_value(row_id, group_id, CategoryType::Income, "2024-01", 5.0);
        assert_eq!(calls.get(), 0);

        store.set_end_month(6);
        assert_eq!(calls.get(), 1);

        // Same range again: nothing to rebuild
        store.set_end_month(6);
        assert_eq!(calls.get(), 1);
    }

    fn range_ends(store: &BudgetStore) -> (String, String) {
        let months = store.months();
        let first = months.first().map(|m| m.key.clone()).unwrap_or_default();
        let last = months.last().map(|m| m.key.clone()).unwrap_or_default();
        (first, last)
    }

    #[test]
    fn test_out_of_range_month_rolls_into_range() {
        let mut store = BudgetStore::new(MonthRange::year(2024));

        store.set_start_month(0);
        assert_eq!(store.range(), MonthRange::new(2023, 12, 2024, 12));
        assert_eq!(store.months().len(), 13);
        assert_eq!(range_ends(&store), ("2023-12".to_string(), "2024-12".to_string()));

        store.set_end_month(15);
        assert_eq!(store.range(), MonthRange::new(2023, 12, 2025, 3));
        assert_eq!(range_ends(&store), ("2023-12".to_string(), "2025-03".to_string()));
        assert!(store.range().has_valid_months());
    }

    #[test]
    fn test_new_store_rolls_range_months() {
        let store = BudgetStore::new(MonthRange::new(2024, 13, 2025, 3));
        assert_eq!(store.range(), MonthRange::new(2025, 1, 2025, 3));
        assert_eq!(range_ends(&store), ("2025-01".to_string(), "2025-03".to_string()));
    }

    #[test]
    fn test_store_ids_differ() {
        let a = BudgetStore::new(MonthRange::year(2024));
        let b = BudgetStore::new(MonthRange::year(2024));
        assert_ne!(a.id(), b.id());
    }
}
