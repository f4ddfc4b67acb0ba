//! Month range dialog
//!
//! Four fields: start year, start month, end year, end month. Up/Down step
//! the focused field (years through the configured year options, months
//! through 1-12); digits can also be typed. An inverted range is accepted
//! and swapped by the store.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::MonthRange;
use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;
use crate::tui::widgets::input::TextInput;

/// Which field is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeField {
    #[default]
    StartYear,
    StartMonth,
    EndYear,
    EndMonth,
}

impl RangeField {
    const ALL: [RangeField; 4] = [
        RangeField::StartYear,
        RangeField::StartMonth,
        RangeField::EndYear,
        RangeField::EndMonth,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn is_year(self) -> bool {
        matches!(self, RangeField::StartYear | RangeField::EndYear)
    }

    fn label(self) -> &'static str {
        match self {
            RangeField::StartYear => "Start year",
            RangeField::StartMonth => "Start month",
            RangeField::EndYear => "End year",
            RangeField::EndMonth => "End month",
        }
    }
}

/// State for the range form dialog
#[derive(Debug, Clone, Default)]
pub struct RangeFormState {
    pub start_year: TextInput,
    pub start_month: TextInput,
    pub end_year: TextInput,
    pub end_month: TextInput,
    pub focused_field: RangeField,
    pub error_message: Option<String>,
}

impl RangeFormState {
    /// Prefill the fields from a range
    pub fn from_range(range: MonthRange) -> Self {
        let mut form = Self {
            start_year: TextInput::new().content(range.start_year.to_string()),
            start_month: TextInput::new().content(range.start_month.to_string()),
            end_year: TextInput::new().content(range.end_year.to_string()),
            end_month: TextInput::new().content(range.end_month.to_string()),
            focused_field: RangeField::StartYear,
            error_message: None,
        };
        form.update_focus();
        form
    }

    pub fn field(&self, field: RangeField) -> &TextInput {
        match field {
            RangeField::StartYear => &self.start_year,
            RangeField::StartMonth => &self.start_month,
            RangeField::EndYear => &self.end_year,
            RangeField::EndMonth => &self.end_month,
        }
    }

    fn field_mut(&mut self, field: RangeField) -> &mut TextInput {
        match field {
            RangeField::StartYear => &mut self.start_year,
            RangeField::StartMonth => &mut self.start_month,
            RangeField::EndYear => &mut self.end_year,
            RangeField::EndMonth => &mut self.end_month,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
        self.update_focus();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
        self.update_focus();
    }

    fn update_focus(&mut self) {
        for field in RangeField::ALL {
            let focused = field == self.focused_field;
            self.field_mut(field).focused = focused;
        }
    }

    /// Step the focused field up (+1) or down (-1).
    ///
    /// Years move through `year_options`, months wrap within 1-12.
    pub fn step(&mut self, delta: i32, year_options: &[i32]) {
        let field = self.focused_field;
        let current: Option<i32> = self.field(field).value().trim().parse().ok();

        let stepped = if field.is_year() {
            step_year(current, delta, year_options)
        } else {
            let month = current.unwrap_or(1).clamp(1, 12);
            Some((month - 1 + delta).rem_euclid(12) + 1)
        };

        if let Some(value) = stepped {
            self.field_mut(field).set_value(value.to_string());
            self.clear_error();
        }
    }

    /// Validate all four fields into a range
    pub fn build_range(&self) -> Result<MonthRange, String> {
        let start_year = parse_year(self.start_year.value(), RangeField::StartYear)?;
        let start_month = parse_month(self.start_month.value(), RangeField::StartMonth)?;
        let end_year = parse_year(self.end_year.value(), RangeField::EndYear)?;
        let end_month = parse_month(self.end_month.value(), RangeField::EndMonth)?;

        Ok(MonthRange::new(start_year, start_month, end_year, end_month))
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
    }
}

fn step_year(current: Option<i32>, delta: i32, year_options: &[i32]) -> Option<i32> {
    if year_options.is_empty() {
        return current.map(|y| y.saturating_add(delta));
    }

    let position = current.and_then(|y| year_options.iter().position(|o| *o == y));
    let index = match position {
        Some(i) => (i as i32 + delta).clamp(0, year_options.len() as i32 - 1) as usize,
        None => 0,
    };
    year_options.get(index).copied()
}

fn parse_year(value: &str, field: RangeField) -> Result<i32, String> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1..=9999).contains(y))
        .ok_or_else(|| format!("{} must be a year", field.label()))
}

fn parse_month(value: &str, field: RangeField) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| format!("{} must be 1-12", field.label()))
}

/// Render the range dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(44, 11, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Month Range ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, area);

    let inner = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(2),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Start year
            Constraint::Length(1), // Start month
            Constraint::Length(1), // End year
            Constraint::Length(1), // End month
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Error
            Constraint::Length(1), // Hints
            Constraint::Min(0),
        ])
        .split(inner);

    let form = &app.range_form;
    for (i, field) in RangeField::ALL.into_iter().enumerate() {
        let input = form.field(field);
        let label_style = if input.focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };

        let mut spans = vec![Span::styled(format!("{:<13}", field.label()), label_style)];
        spans.extend(input.value_spans(Style::default().fg(Color::White)));
        frame.render_widget(Paragraph::new(Line::from(spans)), chunks[i]);
    }

    if let Some(ref error) = form.error_message {
        let error_line = Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(Paragraph::new(error_line), chunks[5]);
    }

    let hints = Line::from(vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" Field  "),
        Span::styled("[↑↓]", Style::default().fg(Color::Yellow)),
        Span::raw(" Step  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Apply  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" Cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[6]);
}

/// Handle key input for the range dialog
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => app.commit_range(),
        KeyCode::Tab => app.range_form.next_field(),
        KeyCode::BackTab => app.range_form.prev_field(),
        KeyCode::Up | KeyCode::Char('+') => {
            let options = app.settings.year_options.clone();
            app.range_form.step(1, &options);
        }
        KeyCode::Down | KeyCode::Char('-') => {
            let options = app.settings.year_options.clone();
            app.range_form.step(-1, &options);
        }
        KeyCode::Char(c) if !c.is_ascii_digit() => {}
        _ => {
            let field = app.range_form.focused_field;
            app.range_form.clear_error();
            app.range_form.field_mut(field).handle_key(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEARS: [i32; 4] = [2023, 2024, 2025, 2026];

    #[test]
    fn test_from_range_prefills() {
        let form = RangeFormState::from_range(MonthRange::new(2024, 3, 2025, 2));
        assert_eq!(form.start_year.value(), "2024");
        assert_eq!(form.start_month.value(), "3");
        assert_eq!(form.end_year.value(), "2025");
        assert_eq!(form.end_month.value(), "2");
        assert!(form.start_year.focused);
        assert!(!form.end_month.focused);
    }

    #[test]
    fn test_field_cycle() {
        let mut form = RangeFormState::from_range(MonthRange::default());
        form.prev_field();
        assert_eq!(form.focused_field, RangeField::EndMonth);
        assert!(form.end_month.focused);
        form.next_field();
        assert_eq!(form.focused_field, RangeField::StartYear);
    }

    #[test]
    fn test_step_month_wraps() {
        let mut form = RangeFormState::from_range(MonthRange::new(2024, 12, 2024, 12));
        form.next_field();
        form.step(1, &YEARS);
        assert_eq!(form.start_month.value(), "1");
        form.step(-1, &YEARS);
        assert_eq!(form.start_month.value(), "12");
    }

    #[test]
    fn test_step_year_through_options() {
        let mut form = RangeFormState::from_range(MonthRange::year(2026));
        form.step(1, &YEARS);
        assert_eq!(form.start_year.value(), "2026");
        form.step(-1, &YEARS);
        assert_eq!(form.start_year.value(), "2025");

        let mut outside = RangeFormState::from_range(MonthRange::year(1999));
        outside.step(1, &YEARS);
        assert_eq!(outside.start_year.value(), "2023");
    }

    #[test]
    fn test_step_year_without_options_saturates() {
        assert_eq!(step_year(Some(i32::MAX), 1, &[]), Some(i32::MAX));
        assert_eq!(step_year(Some(i32::MIN), -1, &[]), Some(i32::MIN));
        assert_eq!(step_year(Some(2024), 1, &[]), Some(2025));
    }

    #[test]
    fn test_build_range_validates() {
        let mut form = RangeFormState::from_range(MonthRange::year(2024));
        assert_eq!(form.build_range().unwrap(), MonthRange::year(2024));

        form.end_month.set_value("13");
        assert_eq!(form.build_range().unwrap_err(), "End month must be 1-12");

        form.end_month.set_value("4");
        form.start_year.set_value("");
        assert!(form.build_range().is_err());
    }

    #[test]
    fn test_build_range_keeps_inverted_input() {
        let form = RangeFormState::from_range(MonthRange::new(2024, 5, 2024, 4));
        let range = form.build_range().unwrap();
        assert_eq!(range.normalized(), MonthRange::new(2024, 4, 2024, 5));
    }
}
