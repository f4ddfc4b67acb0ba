//! Status bar view
//!
//! Shows the mode, range totals, the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, InputMode};

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let months = app.store.months().to_vec();
    let summary = app.summary();
    let (income, expense, closing) = (
        summary.total_income(),
        summary.total_expense(),
        summary.final_closing(&months),
    );

    let mut spans = vec![];

    let (mode, mode_color) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Color::Blue),
        InputMode::Editing => (" EDIT ", Color::Magenta),
    };
    spans.push(Span::styled(
        mode,
        Style::default()
            .fg(Color::Black)
            .bg(mode_color)
            .add_modifier(Modifier::BOLD),
    ));

    spans.push(Span::styled(" In: ", Style::default().fg(Color::White)));
    spans.push(Span::styled(
        app.settings.format_amount(income),
        Style::default().fg(Color::Green),
    ));
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("Out: ", Style::default().fg(Color::White)));
    spans.push(Span::styled(
        app.settings.format_amount(expense),
        Style::default().fg(Color::Red),
    ));
    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("Closing: ", Style::default().fg(Color::White)));
    let closing_color = if closing < 0.0 {
        Color::Red
    } else {
        Color::Green
    };
    spans.push(Span::styled(
        app.settings.format_amount(closing),
        Style::default()
            .fg(closing_color)
            .add_modifier(Modifier::BOLD),
    ));

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = match app.input_mode {
        InputMode::Normal => " q:Quit  ?:Help  p:Range ",
        InputMode::Editing => " Enter:Save  Esc:Cancel ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
