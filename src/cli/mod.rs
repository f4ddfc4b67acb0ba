//! CLI command handlers
//!
//! Bridges clap argument parsing with the store, summary, and display
//! layers. Every command works on an in-memory budget.

use clap::Args;

use crate::config::{BuilderPaths, Settings};
use crate::display::{format_month_list, format_summary_table};
use crate::error::BudgetResult;
use crate::models::month::parse_month_key;
use crate::models::MonthRange;
use crate::services::BudgetSummary;
use crate::store::BudgetStore;

/// `--start` / `--end` month arguments shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First month (YYYY-MM); defaults to the configured range
    #[arg(short, long)]
    pub start: Option<String>,

    /// Last month (YYYY-MM); defaults to the configured range
    #[arg(short, long)]
    pub end: Option<String>,
}

impl RangeArgs {
    /// Resolve the arguments against a fallback range, normalized
    pub fn resolve(&self, fallback: MonthRange) -> BudgetResult<MonthRange> {
        let (start_year, start_month) = match &self.start {
            Some(start) => parse_month_key(start)?,
            None => (fallback.start_year, fallback.start_month),
        };
        let (end_year, end_month) = match &self.end {
            Some(end) => parse_month_key(end)?,
            None => (fallback.end_year, fallback.end_month),
        };

        Ok(MonthRange::new(start_year, start_month, end_year, end_month).normalized())
    }
}

/// Print the months of a range
pub fn handle_months_command(settings: &Settings, range: &RangeArgs) -> BudgetResult<()> {
    let range = range.resolve(settings.default_range)?;
    print!("{}", format_month_list(&range.months()));
    Ok(())
}

/// Print the demo budget's totals for a range
pub fn handle_summary_command(settings: &Settings, range: &RangeArgs) -> BudgetResult<()> {
    let range = range.resolve(settings.default_range)?;
    let store = BudgetStore::with_demo_data_in(range);
    let summary = BudgetSummary::compute(&store);

    println!("Budget summary: {}", store.range());
    println!();
    print!("{}", format_summary_table(&summary, store.months(), settings));
    Ok(())
}

/// Show resolved paths and settings
pub fn handle_config_command(paths: &BuilderPaths, settings: &Settings) {
    println!("Budget Builder Configuration");
    println!("============================");
    println!("Base directory: {}", paths.base_dir().display());
    println!("Settings file:  {}", paths.settings_file().display());
    println!("Log file:       {}", paths.log_file().display());
    println!(
        "Initialized:    {}",
        if paths.is_initialized() { "yes" } else { "no (run 'budget-builder init')" }
    );
    println!();
    println!("Settings:");
    println!("  Default range:  {}", settings.default_range);
    println!("  Currency:       {}", settings.currency_symbol);
    println!("  Decimal places: {}", settings.decimal_places);
    println!(
        "  Year options:   {}",
        settings
            .year_options
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Write the default settings file
pub fn handle_init_command(paths: &BuilderPaths, settings: &Settings) -> BudgetResult<()> {
    settings.save(paths)?;
    println!("Settings written to {}", paths.settings_file().display());
    Ok(())
}
