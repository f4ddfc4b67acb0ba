//! TUI Views module
//!
//! The budget grid, its header line and the status bar, with dialogs drawn
//! on top.

pub mod grid;
pub mod status_bar;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    render_header(frame, app, layout.header);
    grid::render(frame, app, layout.grid);
    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let range = app.store.range();
    let line = Line::from(vec![
        Span::styled(
            " Budget Builder ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{} ({} months)", range, app.store.months().len()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            "  [p] Range  [ / ] End  { / } Start",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match app.active_dialog.clone() {
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::ConfirmDelete(row_id) => dialogs::confirm::render(frame, app, row_id),
        ActiveDialog::RenameRow(_) | ActiveDialog::RenameGroup(_) => {
            dialogs::rename::render(frame, app)
        }
        ActiveDialog::Range => dialogs::range::render(frame, app),
        ActiveDialog::None => {}
    }
}
