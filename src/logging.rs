//! Tracing setup
//!
//! The TUI owns the terminal, so in that mode log lines go to a file under
//! the base directory. CLI subcommands log to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::BudgetResult;

/// Environment variable holding the tracing filter
pub const LOG_ENV_VAR: &str = "BUDGET_BUILDER_LOG";

static TRACING_INIT: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("budget_builder=info"))
}

/// Install a subscriber writing to stderr
pub fn init_stderr() {
    TRACING_INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Install a subscriber appending to a log file
pub fn init_file(path: &Path) -> BudgetResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    TRACING_INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(env_filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .try_init();
    });
    Ok(())
}
