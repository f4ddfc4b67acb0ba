//! User settings for Budget Builder
//!
//! Only display and startup preferences live here. Budgets themselves are
//! never written to disk.

use serde::{Deserialize, Serialize};

use super::paths::BuilderPaths;
use crate::error::BudgetError;
use crate::models::{format_amount, MonthRange};

/// User settings for Budget Builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Range the grid opens with
    #[serde(default)]
    pub default_range: MonthRange,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Decimal places shown for amounts
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,

    /// Years offered by the range dialog
    #[serde(default = "default_year_options")]
    pub year_options: Vec<i32>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_decimal_places() -> usize {
    2
}

fn default_year_options() -> Vec<i32> {
    vec![2023, 2024, 2025, 2026]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_range: MonthRange::default(),
            currency_symbol: default_currency(),
            decimal_places: default_decimal_places(),
            year_options: default_year_options(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &BuilderPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BudgetError::Config(format!("Failed to parse settings file: {}", e)))?;

        if !settings.default_range.has_valid_months() {
            return Err(BudgetError::Config(format!(
                "Default range {} has a month outside 1-12",
                settings.default_range
            )));
        }

        settings.default_range = settings.default_range.normalized();
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BuilderPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Format an amount using the configured symbol and precision
    pub fn format_amount(&self, value: f64) -> String {
        format_amount(value, &self.currency_symbol, self.decimal_places)
    }
}
