//! Monthly totals derived from the budget store
//!
//! Income and expense totals, profit/loss, and the running opening and
//! closing cash balances, one value per month in range. Everything here
//! is a pure function of the store's groups and months.

use std::collections::BTreeMap;

use crate::models::{BudgetId, CategoryGroup, Month, MonthKey};
use crate::store::BudgetStore;

/// Month key -> amount
pub type MonthlySeries = BTreeMap<MonthKey, f64>;

/// All derived series for the active range
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetSummary {
    pub income_totals: MonthlySeries,
    pub expense_totals: MonthlySeries,
    pub profit_loss: MonthlySeries,
    pub opening: MonthlySeries,
    pub closing: MonthlySeries,
}

impl BudgetSummary {
    /// Compute every series from the store
    pub fn compute(store: &BudgetStore) -> Self {
        let months = store.months();
        let income_totals = sum_by_month(store.income_groups(), months);
        let expense_totals = sum_by_month(store.expense_groups(), months);
        let profit_loss = profit_loss_by_month(&income_totals, &expense_totals, months);
        let opening = opening_by_month(&profit_loss, months);
        let closing = closing_by_month(&opening, &profit_loss, months);

        Self {
            income_totals,
            expense_totals,
            profit_loss,
            opening,
            closing,
        }
    }

    pub fn total_income(&self) -> f64 {
        self.income_totals.values().sum()
    }

    pub fn total_expense(&self) -> f64 {
        self.expense_totals.values().sum()
    }

    pub fn total_profit_loss(&self) -> f64 {
        self.profit_loss.values().sum()
    }

    /// Closing balance of the last month, zero for an empty range
    pub fn final_closing(&self, months: &[Month]) -> f64 {
        months
            .last()
            .map(|month| value_at(&self.closing, &month.key))
            .unwrap_or(0.0)
    }
}

/// Read a series value, zero when absent
pub fn value_at(series: &MonthlySeries, month_key: &str) -> f64 {
    series.get(month_key).copied().unwrap_or(0.0)
}

/// Sum every row of every group per month
pub fn sum_by_month(groups: &[CategoryGroup], months: &[Month]) -> MonthlySeries {
    let mut result: MonthlySeries = months.iter().map(|m| (m.key.clone(), 0.0)).collect();
    for row in groups.iter().flat_map(|g| g.rows.iter()) {
        for month in months {
            if let Some(total) = result.get_mut(&month.key) {
                *total += row.value(&month.key);
            }
        }
    }
    result
}

pub fn profit_loss_by_month(
    income: &MonthlySeries,
    expense: &MonthlySeries,
    months: &[Month],
) -> MonthlySeries {
    months
        .iter()
        .map(|m| (m.key.clone(), value_at(income, &m.key) - value_at(expense, &m.key)))
        .collect()
}

/// Opening balance: zero for the first month, then the prior month's closing
pub fn opening_by_month(profit_loss: &MonthlySeries, months: &[Month]) -> MonthlySeries {
    let mut result = MonthlySeries::new();
    let mut running = 0.0;
    for (i, month) in months.iter().enumerate() {
        let opening = if i == 0 { 0.0 } else { running };
        result.insert(month.key.clone(), opening);
        running = opening + value_at(profit_loss, &month.key);
    }
    result
}

pub fn closing_by_month(
    opening: &MonthlySeries,
    profit_loss: &MonthlySeries,
    months: &[Month],
) -> MonthlySeries {
    months
        .iter()
        .map(|m| {
            let closing = value_at(opening, &m.key) + value_at(profit_loss, &m.key);
            (m.key.clone(), closing)
        })
        .collect()
}

/// Memoized summary keyed on the store identity and revision
#[derive(Debug, Default)]
pub struct SummaryCache {
    cached: Option<(BudgetId, u64, BudgetSummary)>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The summary for the store's current state, recomputed if stale
    pub fn get(&mut self, store: &BudgetStore) -> &BudgetSummary {
        let (id, revision) = (store.id(), store.revision());
        let fresh = matches!(&self.cached, Some((cached_id, cached, _)) if *cached_id == id && *cached == revision);
        if !fresh {
            tracing::trace!(%id, revision, "recomputing budget summary");
            self.cached = None;
        }

        let (_, _, summary) = self
            .cached
            .get_or_insert_with(|| (id, revision, BudgetSummary::compute(store)));
        summary
    }
}
