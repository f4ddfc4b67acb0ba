//! Custom error types for Budget Builder
//!
//! Budget operations themselves never fail: unknown ids are no-ops and bad
//! numeric input is coerced to zero. The errors here cover the ambient
//! edges of the application (settings, terminal, argument parsing).

use thiserror::Error;

/// The main error type for Budget Builder
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A month argument that is not `YYYY-MM`
    #[error("Invalid month '{input}': expected YYYY-MM with a month between 01 and 12")]
    InvalidMonth { input: String },

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl BudgetError {
    /// Create an invalid month error
    pub fn invalid_month(input: impl Into<String>) -> Self {
        Self::InvalidMonth {
            input: input.into(),
        }
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Budget Builder operations
pub type BudgetResult<T> = Result<T, BudgetError>;
