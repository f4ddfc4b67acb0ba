use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use budget_builder::cli::{
    handle_config_command, handle_init_command, handle_months_command, handle_summary_command,
    RangeArgs,
};
use budget_builder::config::{BuilderPaths, Settings};
use budget_builder::logging;
use budget_builder::store::BudgetStore;

#[derive(Parser)]
#[command(
    name = "budget-builder",
    version,
    about = "Terminal spreadsheet for monthly income and expense budgets",
    long_about = "Budget Builder is a keyboard-driven budget grid for the terminal. \
                  Lay out income and expense categories across a range of months \
                  and watch totals, profit/loss, and cash balances update as you type."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive grid editor
    #[command(alias = "ui")]
    Tui(TuiArgs),

    /// List the months in a range
    Months(RangeArgs),

    /// Print totals and balances for the sample budget
    Summary(RangeArgs),

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

#[derive(Args, Default)]
struct TuiArgs {
    /// Start with no categories instead of the sample budget
    #[arg(long)]
    empty: bool,

    #[command(flatten)]
    range: RangeArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = BuilderPaths::new()?;

    let command = match cli.command {
        None => return run_tui(&paths, TuiArgs::default()),
        Some(Commands::Tui(args)) => return run_tui(&paths, args),
        Some(command) => command,
    };

    logging::init_stderr();
    let settings = Settings::load_or_create(&paths)?;

    match command {
        Commands::Months(range) => handle_months_command(&settings, &range)?,
        Commands::Summary(range) => handle_summary_command(&settings, &range)?,
        Commands::Init => handle_init_command(&paths, &settings)?,
        Commands::Config => handle_config_command(&paths, &settings),
        Commands::Tui(_) => {}
    }

    Ok(())
}

fn run_tui(paths: &BuilderPaths, args: TuiArgs) -> Result<()> {
    logging::init_file(&paths.log_file())?;
    let settings = Settings::load_or_create(paths)?;
    let range = args.range.resolve(settings.default_range)?;

    let store = if args.empty {
        BudgetStore::new(range)
    } else {
        BudgetStore::with_demo_data_in(range)
    };
    info!(%range, empty = args.empty, "starting grid editor");

    budget_builder::tui::run_tui(store, settings)
}
