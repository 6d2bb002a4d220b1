//! Pivot table views for the Grocery Spend TUI.
//!
//! Renders the spending and transaction-count pivots as bordered
//! [`ratatui::widgets::Table`]s with one row per month, a per-month total
//! column, and highlighted TOTAL and Average rows at the bottom.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use spend_core::formatting;
use spend_data::aggregator::{PivotTable, PivotValue};
use spend_data::analysis::SpendingReport;

use crate::themes::Theme;

/// Render both pivots of `report`, spending above counts.
pub fn render_report_tables(frame: &mut Frame, area: Rect, report: &SpendingReport, theme: &Theme) {
    let [top, bottom] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    render_pivot_table(
        frame,
        top,
        "Monthly Spending",
        &report.spending,
        formatting::format_amount,
        theme,
    );
    render_pivot_table(
        frame,
        bottom,
        "Monthly Transactions",
        &report.counts,
        formatting::format_count,
        theme,
    );
}

/// Render one pivot into `area`; `format` renders a single cell value.
pub fn render_pivot_table<V: PivotValue>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    pivot: &PivotTable<V>,
    format: impl Fn(V) -> String,
    theme: &Theme,
) {
    let header_cells = std::iter::once("Month")
        .chain(pivot.merchants().iter().map(String::as_str))
        .chain(std::iter::once("Total"))
        .map(|h| Cell::from(h.to_string()).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let month_totals = pivot.month_totals();
    let mut all_rows: Vec<Row> = pivot
        .rows()
        .zip(&month_totals)
        .enumerate()
        .map(|(i, ((month, values), total))| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let cells = std::iter::once(month.label())
                .chain(values.iter().map(|v| format(*v)))
                .chain(std::iter::once(format(*total)));
            Row::new(cells.map(Cell::from)).style(style)
        })
        .collect();

    let merchant_totals = pivot.merchant_totals();
    let total_row = Row::new(
        std::iter::once("TOTAL".to_string())
            .chain(merchant_totals.iter().map(|v| format(*v)))
            .chain(std::iter::once(format(pivot.grand_total())))
            .map(Cell::from),
    )
    .style(theme.table_total);
    all_rows.push(total_row);

    let months = pivot.months().len().max(1) as f64;
    let average_row = Row::new(
        std::iter::once("Average".to_string())
            .chain(
                merchant_totals
                    .iter()
                    .map(|v| formatting::format_number(v.to_f64() / months, 2)),
            )
            .chain(std::iter::once(formatting::format_number(
                pivot.average_month_total(),
                2,
            )))
            .map(Cell::from),
    )
    .style(theme.table_total);
    all_rows.push(average_row);

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(10))
        .chain(pivot.merchants().iter().map(|m| {
            Constraint::Length((m.chars().count() as u16).max(12) + 1)
        }))
        .chain(std::iter::once(Constraint::Length(14)))
        .collect();

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), theme.title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
