//! Summary and month list formatting
//!
//! Plain-text tables for the CLI: one line per month with the derived
//! totals and balances.

use crate::config::Settings;
use crate::models::Month;
use crate::services::summary::{value_at, BudgetSummary};

/// Format the month sequence as "key  label" lines
pub fn format_month_list(months: &[Month]) -> String {
    if months.is_empty() {
        return "No months in range.\n".to_string();
    }

    let mut output = String::new();
    for month in months {
        output.push_str(&format!("{}  {}\n", month.key, month.label));
    }
    output
}

/// Format the per-month summary table with a totals footer
pub fn format_summary_table(summary: &BudgetSummary, months: &[Month], settings: &Settings) -> String {
    if months.is_empty() {
        return "No months in range.\n".to_string();
    }

    let fmt = |v: f64| settings.format_amount(v);

    let mut rows: Vec<[String; 6]> = months
        .iter()
        .map(|m| {
            [
                m.key.clone(),
                fmt(value_at(&summary.income_totals, &m.key)),
                fmt(value_at(&summary.expense_totals, &m.key)),
                fmt(value_at(&summary.profit_loss, &m.key)),
                fmt(value_at(&summary.opening, &m.key)),
                fmt(value_at(&summary.closing, &m.key)),
            ]
        })
        .collect();

    rows.push([
        "Total".to_string(),
        fmt(summary.total_income()),
        fmt(summary.total_expense()),
        fmt(summary.total_profit_loss()),
        String::new(),
        fmt(summary.final_closing(months)),
    ]);

    let header = ["Month", "Income", "Expenses", "Profit/Loss", "Opening", "Closing"];

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    output.push_str(&format_line(&header.map(String::from), &widths));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&separator.join("  "));
    output.push('\n');

    let last = rows.len() - 1;
    for (i, row) in rows.iter().enumerate() {
        if i == last {
            output.push_str(&separator.join("  "));
            output.push('\n');
        }
        output.push_str(&format_line(row, &widths));
    }

    output
}

fn format_line(cells: &[String; 6], widths: &[usize]) -> String {
    let mut parts = Vec::with_capacity(cells.len());
    for (i, cell) in cells.iter().enumerate() {
        let pad = widths[i].saturating_sub(cell.chars().count());
        if i == 0 {
            parts.push(format!("{}{}", cell, " ".repeat(pad)));
        } else {
            parts.push(format!("{}{}", " ".repeat(pad), cell));
        }
    }
    format!("{}\n", parts.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{build_months, MonthRange};
    use crate::store::BudgetStore;

    #[test]
    fn test_month_list() {
        let output = format_month_list(&build_months(2024, 4, 2024, 5));
        assert_eq!(output, "2024-04  April 2024\n2024-05  May 2024\n");
        assert_eq!(format_month_list(&[]), "No months in range.\n");
    }

    #[test]
    fn test_summary_table() {
        let store = BudgetStore::with_demo_data_in(MonthRange::new(2024, 1, 2024, 2));
        let summary = BudgetSummary::compute(&store);
        let output = format_summary_table(&summary, store.months(), &Settings::default());

        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("Month"));
        assert!(lines[2].starts_with("2024-01"));
        assert!(lines[2].contains("$1,300.00"));
        assert!(lines[3].contains("$1,870.00"));
        assert!(lines[3].contains("$1,070.00"));
        assert!(lines[5].starts_with("Total"));
        assert!(lines[5].contains("$3,170.00"));
    }
}
