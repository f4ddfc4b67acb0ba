//! Budget grid view
//!
//! Rows are laid out the way the budget reads: an Income section and an
//! Expenses section, each with group headers, category rows, group
//! subtotals and a section total, followed by profit/loss and the opening
//! and closing balances. Columns are the months of the current range;
//! when they don't all fit, the window scrolls to keep the focused month
//! visible.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{CategoryType, GroupId, RowId};
use crate::services::summary::{value_at, MonthlySeries};
use crate::store::BudgetStore;
use crate::tui::app::{App, InputMode};
use crate::tui::layout::scroll_to_show;

const NAME_WIDTH: u16 = 26;
const MONTH_WIDTH: u16 = 13;
const HIGHLIGHT_WIDTH: u16 = 2;

/// One display line of the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridLine {
    Section(CategoryType),
    Group(GroupId),
    Row(RowId),
    Subtotal(GroupId),
    Total(CategoryType),
    Blank,
    ProfitLoss,
    Opening,
    Closing,
}

/// Display lines for the store, top to bottom
pub fn grid_lines(store: &BudgetStore) -> Vec<GridLine> {
    let mut lines = Vec::new();

    for kind in [CategoryType::Income, CategoryType::Expense] {
        lines.push(GridLine::Section(kind));
        for group in store.groups_of(kind) {
            lines.push(GridLine::Group(group.id));
            lines.extend(group.rows.iter().map(|row| GridLine::Row(row.id)));
            lines.push(GridLine::Subtotal(group.id));
        }
        lines.push(GridLine::Total(kind));
        lines.push(GridLine::Blank);
    }

    lines.push(GridLine::ProfitLoss);
    lines.push(GridLine::Opening);
    lines.push(GridLine::Closing);
    lines
}

/// How many month columns fit in a grid of the given width
pub fn visible_month_count(width: u16) -> usize {
    let usable = width.saturating_sub(2 + NAME_WIDTH + HIGHLIGHT_WIDTH);
    ((usable / (MONTH_WIDTH + 1)) as usize).max(1)
}

/// Render the grid
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let months = app.store.months().to_vec();
    if months.is_empty() {
        let text = Paragraph::new("No months in range. Press 'p' to choose a range.")
            .block(block)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(text, area);
        return;
    }

    // Keep the focused month on screen
    let visible = visible_month_count(area.width);
    let active_month = app
        .active_cell()
        .and_then(|cell| months.iter().position(|m| m.key == cell.month_key))
        .unwrap_or(0);
    app.month_scroll = scroll_to_show(app.month_scroll, active_month, visible, months.len());
    let shown = &months[app.month_scroll..(app.month_scroll + visible).min(months.len())];

    let summary = app.summary().clone();
    let lines = grid_lines(&app.store);
    let fmt = |v: f64| app.settings.format_amount(v);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut rows: Vec<Row> = Vec::with_capacity(lines.len());
    let mut selected_line = None;

    for line in &lines {
        let row = match line {
            GridLine::Section(kind) => Row::new(vec![Cell::from(kind.label().to_uppercase())])
                .style(bold.fg(Color::Yellow)),
            GridLine::Group(group_id) => {
                let name = app
                    .store
                    .find_group_by_id(*group_id)
                    .map(|g| g.name.clone())
                    .unwrap_or_default();
                Row::new(vec![Cell::from(format!("▼ {}", name))]).style(bold.fg(Color::Cyan))
            }
            GridLine::Row(row_id) => {
                let Some(category) = app.store.find_row(*row_id) else {
                    continue;
                };
                let mut cells = vec![Cell::from(format!("  {}", category.name))];
                for month in shown {
                    if app.navigator.is_active(*row_id, &month.key) {
                        selected_line = Some(rows.len());
                        cells.push(active_cell(app, fmt(category.value(&month.key))));
                    } else {
                        cells.push(amount_cell(fmt(category.value(&month.key)), Style::default()));
                    }
                }
                Row::new(cells)
            }
            GridLine::Subtotal(group_id) => {
                let Some(group) = app.store.find_group_by_id(*group_id) else {
                    continue;
                };
                let mut cells = vec![Cell::from("  Subtotal")];
                cells.extend(
                    shown
                        .iter()
                        .map(|m| amount_cell(fmt(group.subtotal(&m.key)), Style::default())),
                );
                Row::new(cells).style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
            }
            GridLine::Total(kind) => {
                let (label, series) = match kind {
                    CategoryType::Income => ("Total Income", &summary.income_totals),
                    CategoryType::Expense => ("Total Expenses", &summary.expense_totals),
                };
                series_row(label, series, shown.iter().map(|m| m.key.as_str()), &fmt, false)
                    .style(bold)
            }
            GridLine::Blank => Row::new(vec![Cell::from("")]),
            GridLine::ProfitLoss => series_row(
                "Profit / Loss",
                &summary.profit_loss,
                shown.iter().map(|m| m.key.as_str()),
                &fmt,
                true,
            )
            .style(bold),
            GridLine::Opening => series_row(
                "Opening Balance",
                &summary.opening,
                shown.iter().map(|m| m.key.as_str()),
                &fmt,
                true,
            ),
            GridLine::Closing => series_row(
                "Closing Balance",
                &summary.closing,
                shown.iter().map(|m| m.key.as_str()),
                &fmt,
                true,
            )
            .style(bold),
        };
        rows.push(row);
    }

    let mut widths = vec![Constraint::Length(NAME_WIDTH)];
    widths.extend(shown.iter().map(|_| Constraint::Length(MONTH_WIDTH)));

    let mut header_cells = vec![Cell::from("Category")];
    header_cells.extend(
        shown
            .iter()
            .map(|m| Cell::from(Line::from(m.short_label()).right_aligned())),
    );
    let header = Row::new(header_cells)
        .style(bold.fg(Color::Yellow))
        .height(1);

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(selected_line);

    frame.render_stateful_widget(table, area, &mut state);
}

fn amount_cell(text: String, style: Style) -> Cell<'static> {
    Cell::from(Line::from(Span::styled(text, style)).right_aligned())
}

fn active_cell(app: &App, formatted: String) -> Cell<'static> {
    if app.input_mode == InputMode::Editing {
        let spans = app.editor.value_spans(Style::default().fg(Color::White));
        return Cell::from(Line::from(spans).right_aligned())
            .style(Style::default().bg(Color::DarkGray));
    }

    amount_cell(
        formatted,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn series_row<'a>(
    label: &'static str,
    series: &MonthlySeries,
    month_keys: impl Iterator<Item = &'a str>,
    fmt: &dyn Fn(f64) -> String,
    signed_colors: bool,
) -> Row<'static> {
    let mut cells = vec![Cell::from(label)];
    for key in month_keys {
        let value = value_at(series, key);
        let style = if !signed_colors {
            Style::default()
        } else if value < 0.0 {
            Style::default().fg(Color::Red)
        } else if value > 0.0 {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Yellow)
        };
        cells.push(amount_cell(fmt(value), style));
    }
    Row::new(cells)
}
