//! Display formatting for terminal output
//!
//! Plain-text formatting of month lists and summary tables for the CLI.

pub mod summary;

pub use summary::{format_month_list, format_summary_table};
