//! Demo budget shown when the builder starts
//!
//! Two income groups and two expense groups with values for January and
//! February 2024; the rest of the year starts at zero.

use crate::models::{CategoryGroup, CategoryType, MonthRange};

/// Range the demo budget opens with
pub fn demo_range() -> MonthRange {
    MonthRange::year(2024)
}

pub fn demo_income_groups() -> Vec<CategoryGroup> {
    vec![
        CategoryGroup::new(CategoryType::Income, "General Income")
            .with_row("General Income", &[("2024-01", 100.0), ("2024-02", 120.0)])
            .with_row("Sales", &[("2024-01", 200.0), ("2024-02", 400.0)])
            .with_row("Commission", &[("2024-01", 0.0), ("2024-02", 200.0)]),
        CategoryGroup::new(CategoryType::Income, "Other Income")
            .with_row("Training", &[("2024-01", 500.0), ("2024-02", 550.0)])
            .with_row("Consulting", &[("2024-01", 500.0), ("2024-02", 600.0)]),
    ]
}

pub fn demo_expense_groups() -> Vec<CategoryGroup> {
    vec![
        CategoryGroup::new(CategoryType::Expense, "Operational Expenses")
            .with_row("Management Fees", &[("2024-01", 100.0), ("2024-02", 200.0)])
            .with_row("Cloud Hosting", &[("2024-01", 200.0), ("2024-02", 400.0)]),
        CategoryGroup::new(CategoryType::Expense, "Salaries & Wages")
            .with_row("Full Time Dev Salaries", &[("2024-01", 100.0), ("2024-02", 120.0)])
            .with_row("Part Time Dev Salaries", &[("2024-01", 80.0), ("2024-02", 80.0)])
            .with_row("Remote Salaries", &[("2024-01", 20.0), ("2024-02", 0.0)]),
    ]
}
