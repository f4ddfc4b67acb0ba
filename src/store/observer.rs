//! Observers notified when the month sequence is replaced
//!
//! The store keeps every row's values covering the active months by running
//! [`CoverageSync`] after each range change, instead of asking every
//! mutation to re-check coverage.

use crate::models::Month;

use super::GroupCollections;

/// Reacts to a freshly built month sequence
pub trait MonthsObserver {
    /// Called after the store replaced its months.
    ///
    /// Returns true if the observer changed any group data.
    fn months_changed(&mut self, months: &[Month], groups: &mut GroupCollections) -> bool;
}

/// Backfills zero values for months a row does not have yet
#[derive(Debug, Default, Clone, Copy)]
pub struct CoverageSync;

impl MonthsObserver for CoverageSync {
    fn months_changed(&mut self, months: &[Month], groups: &mut GroupCollections) -> bool {
        let mut changed = false;
        for row in groups.rows_mut() {
            if row.ensure_month_coverage(months) {
                changed = true;
            }
        }
        if changed {
            tracing::debug!(months = months.len(), "backfilled row values for new months");
        }
        changed
    }
}
