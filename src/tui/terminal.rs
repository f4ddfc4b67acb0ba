//! Terminal setup and teardown
//!
//! Handles raw mode and the alternate screen, including a panic hook that
//! restores the terminal on crash.

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, IsTerminal, Stdout};
use std::panic;
use tracing::info;

use crate::config::Settings;
use crate::error::BudgetError;
use crate::store::BudgetStore;

use super::app::App;
use super::event::EventHandler;
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the grid editor until the user quits
pub fn run_tui(store: BudgetStore, settings: Settings) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(BudgetError::Tui("standard output is not a terminal".into()).into());
    }

    let mut terminal = init_terminal()?;
    let mut app = App::new(store, settings);
    info!(rows = app.store.all_rows().len(), "grid editor started");

    let result = event_loop(&mut terminal, &mut app);

    restore_terminal()?;
    info!(revision = app.store.revision(), "grid editor closed");
    result
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let events = EventHandler::default();

    loop {
        terminal.draw(|frame| {
            super::views::render(frame, app);
        })?;

        let event = events.next().context("terminal event thread stopped")?;
        handle_event(app, event)?;

        if app.should_quit {
            return Ok(());
        }
    }
}
