//! Budget Builder - terminal spreadsheet for monthly income and expense budgets
//!
//! This library holds the budget model behind the `budget-builder` binary:
//! a month range, income and expense category groups, derived totals and
//! balances, and a keyboard-driven grid editor.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: Tracing subscriber setup
//! - `models`: Months, amounts, category rows and groups
//! - `store`: Budget state and its mutation operations
//! - `services`: Derived summaries and grid navigation
//! - `display`: Plain-text formatting for CLI output
//! - `cli`: Subcommand handlers
//! - `tui`: Interactive grid editor
//!
//! # Example
//!
//! ```rust
//! use budget_builder::services::BudgetSummary;
//! use budget_builder::store::BudgetStore;
//!
//! let store = BudgetStore::with_demo_data();
//! let summary = BudgetSummary::compute(&store);
//! assert_eq!(summary.income_totals.len(), store.months().len());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
pub mod tui;

pub use error::BudgetError;
