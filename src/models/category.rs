//! Category rows and groups
//!
//! A group holds an ordered list of rows of the same type. Each row carries
//! one value per month key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{GroupId, RowId};
use super::month::{Month, MonthKey};

/// Name given to rows created from the grid
pub const NEW_ROW_NAME: &str = "New category";

/// Whether a row counts toward income or expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    /// Name given to groups created with "add group"
    pub fn new_group_name(&self) -> &'static str {
        match self {
            Self::Income => "New Income",
            Self::Expense => "New Expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expenses",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A single budget line with one value per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: RowId,

    #[serde(rename = "type")]
    pub kind: CategoryType,

    /// The owning group
    pub parent_id: GroupId,

    pub name: String,

    /// Month key -> amount. Missing keys read as zero.
    pub values: BTreeMap<MonthKey, f64>,
}

impl CategoryRow {
    /// Create a row with every given month zero-filled
    pub fn new(parent: &CategoryGroup, name: impl Into<String>, months: &[Month]) -> Self {
        Self {
            id: RowId::new(),
            kind: parent.kind,
            parent_id: parent.id,
            name: name.into(),
            values: months.iter().map(|m| (m.key.clone(), 0.0)).collect(),
        }
    }

    /// Value for a month, zero when absent
    pub fn value(&self, month_key: &str) -> f64 {
        self.values.get(month_key).copied().unwrap_or(0.0)
    }

    /// Add zero entries for months not yet present.
    ///
    /// Returns true if anything was added.
    pub fn ensure_month_coverage(&mut self, months: &[Month]) -> bool {
        let mut changed = false;
        for month in months {
            if !self.values.contains_key(&month.key) {
                self.values.insert(month.key.clone(), 0.0);
                changed = true;
            }
        }
        changed
    }

    pub fn covers(&self, months: &[Month]) -> bool {
        months.iter().all(|m| self.values.contains_key(&m.key))
    }
}

/// A named collection of rows of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: GroupId,

    #[serde(rename = "type")]
    pub kind: CategoryType,

    pub name: String,

    /// Display order is significant
    pub rows: Vec<CategoryRow>,
}

impl CategoryGroup {
    /// Create an empty group
    pub fn new(kind: CategoryType, name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            kind,
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a named row holding the given month values
    pub fn with_row(mut self, name: &str, values: &[(&str, f64)]) -> Self {
        let mut row = CategoryRow::new(&self, name, &[]);
        row.values = values.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        self.rows.push(row);
        self
    }

    /// Sum of this group's rows for one month
    pub fn subtotal(&self, month_key: &str) -> f64 {
        self.rows.iter().map(|row| row.value(month_key)).sum()
    }

    pub fn row(&self, row_id: RowId) -> Option<&CategoryRow> {
        self.rows.iter().find(|row| row.id == row_id)
    }

    pub fn row_mut(&mut self, row_id: RowId) -> Option<&mut CategoryRow> {
        self.rows.iter_mut().find(|row| row.id == row_id)
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
