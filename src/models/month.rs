//! Month descriptors and the selectable month range
//!
//! The grid's columns are a contiguous, inclusive run of calendar months.
//! The sequence is rebuilt wholesale whenever the range changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BudgetError, BudgetResult};

/// Canonical `YYYY-MM` identifier for a calendar month
pub type MonthKey = String;

/// A single month column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Month {
    /// `YYYY-MM`, unique and sortable
    pub key: MonthKey,

    /// Display label, e.g. "January 2024"
    pub label: String,

    pub year: i32,

    /// 1..=12
    pub month: u32,
}

impl Month {
    /// Build the descriptor for a calendar month.
    ///
    /// Month numbers outside 1..=12 roll over into the neighbouring years.
    pub fn new(year: i32, month: u32) -> Self {
        let (year, month) = from_index(to_index(year, month));
        Self {
            key: month_key(year, month),
            label: month_label(year, month),
            year,
            month,
        }
    }

    /// Short column header, e.g. "Jan 24"
    pub fn short_label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %y").to_string())
            .unwrap_or_else(|| self.key.clone())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Format a month key with a zero-padded month
pub fn month_key(year: i32, month: u32) -> MonthKey {
    format!("{}-{:02}", year, month)
}

/// English "Month Year" label
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| month_key(year, month))
}

/// Parse a `YYYY-MM` key into (year, month)
pub fn parse_month_key(input: &str) -> BudgetResult<(i32, u32)> {
    let (year, month) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| BudgetError::invalid_month(input))?;

    let year: i32 = year.parse().map_err(|_| BudgetError::invalid_month(input))?;
    let month: u32 = month
        .parse()
        .map_err(|_| BudgetError::invalid_month(input))?;

    if !(1..=12).contains(&month) {
        return Err(BudgetError::invalid_month(input));
    }

    Ok((year, month))
}

/// Walk calendar months inclusively from start to end.
///
/// Assumes start <= end; a reversed range yields an empty sequence, so
/// callers normalize with [`MonthRange::normalized`] first.
pub fn build_months(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Vec<Month> {
    let start = to_index(start_year, start_month);
    let end = to_index(end_year, end_month);

    (start..=end)
        .map(|index| {
            let (year, month) = from_index(index);
            Month::new(year, month)
        })
        .collect()
}

fn to_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Inverse of `to_index`, saturating at the first and last representable months
fn from_index(index: i64) -> (i32, u32) {
    let index = index.clamp(to_index(i32::MIN, 1), to_index(i32::MAX, 12));
    // In i32 range after the clamp
    let year = index.div_euclid(12) as i32;
    let month = index.rem_euclid(12) as u32 + 1;
    (year, month)
}

/// Inclusive start/end selection of months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
}

impl MonthRange {
    pub fn new(start_year: i32, start_month: u32, end_year: i32, end_month: u32) -> Self {
        Self {
            start_year,
            start_month,
            end_year,
            end_month,
        }
    }

    /// A full calendar year
    pub fn year(year: i32) -> Self {
        Self::new(year, 1, year, 12)
    }

    /// Roll month numbers outside 1..=12 into the neighbouring years
    pub fn canonical(self) -> Self {
        let (start_year, start_month) = from_index(to_index(self.start_year, self.start_month));
        let (end_year, end_month) = from_index(to_index(self.end_year, self.end_month));
        Self::new(start_year, start_month, end_year, end_month)
    }

    /// Both month numbers are within 1..=12
    pub fn has_valid_months(&self) -> bool {
        (1..=12).contains(&self.start_month) && (1..=12).contains(&self.end_month)
    }

    /// Swap start and end when end precedes start
    pub fn normalized(self) -> Self {
        let same_or_after_start = (self.end_year, self.end_month) >= (self.start_year, self.start_month);
        if same_or_after_start {
            return self;
        }

        Self {
            start_year: self.end_year,
            start_month: self.end_month,
            end_year: self.start_year,
            end_month: self.start_month,
        }
    }

    pub fn is_normalized(&self) -> bool {
        *self == self.normalized()
    }

    /// Build the month sequence for the normalized range
    pub fn months(&self) -> Vec<Month> {
        let r = self.normalized();
        build_months(r.start_year, r.start_month, r.end_year, r.end_month)
    }

    /// Move the start by a number of months (negative moves back)
    pub fn shift_start(self, delta: i64) -> Self {
        let (start_year, start_month) = from_index(to_index(self.start_year, self.start_month) + delta);
        Self {
            start_year,
            start_month,
            ..self
        }
    }

    /// Move the end by a number of months (negative moves back)
    pub fn shift_end(self, delta: i64) -> Self {
        let (end_year, end_month) = from_index(to_index(self.end_year, self.end_month) + delta);
        Self {
            end_year,
            end_month,
            ..self
        }
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        Self::year(2024)
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            month_key(self.start_year, self.start_month),
            month_key(self.end_year, self.end_month)
        )
    }
}
