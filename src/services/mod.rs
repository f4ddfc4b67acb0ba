//! Logic layered on top of the budget store
//!
//! - `summary`: derived monthly totals and running balances
//! - `navigation`: keyboard focus movement over the grid

pub mod navigation;
pub mod summary;

pub use navigation::{CellCoord, GridNavigator, NavKey, NavOutcome};
pub use summary::{BudgetSummary, MonthlySeries, SummaryCache};
