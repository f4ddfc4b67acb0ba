//! Core data models for Budget Builder
//!
//! Months and the selected range, category groups and rows, and the typed
//! ids that tie rows to their groups.

pub mod amount;
pub mod category;
pub mod ids;
pub mod month;

pub use amount::{coerce_amount, format_amount, parse_amount};
pub use category::{CategoryGroup, CategoryRow, CategoryType, NEW_ROW_NAME};
pub use ids::{BudgetId, GroupId, RowId};
pub use month::{build_months, month_key, month_label, Month, MonthKey, MonthRange};
