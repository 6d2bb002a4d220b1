//! Monthly spending and transaction-count charts.
//!
//! [`ChartData`] flattens one pivot table of a [`SpendingReport`] into the
//! series the [`MonthlyBarChart`] widget draws; [`render_chart`] wraps the
//! widget in a titled block with a legend and axis captions.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use spend_data::aggregator::{PivotTable, PivotValue};
use spend_data::analysis::SpendingReport;

use crate::components::bar_chart::{AVERAGE_SYMBOL, BAR_SYMBOL};
use crate::components::{BarMode, MonthlyBarChart};
use crate::themes::Theme;

pub const SPENDING_TITLE: &str = "Monthly Groceries Spending by Supermarket";
pub const SPENDING_Y_LABEL: &str = "Total Amount Spent";
pub const TRANSACTIONS_TITLE: &str = "Monthly Number of Transactions per Supermarket";
pub const TRANSACTIONS_Y_LABEL: &str = "Number of Transactions";
pub const X_LABEL: &str = "Month and Year";

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: &'static str,
    pub y_label: &'static str,
    pub mode: BarMode,
    /// `Mon-YYYY` label per month.
    pub labels: Vec<String>,
    /// Merchant names, one per series.
    pub series: Vec<String>,
    /// `values[month][series]`
    pub values: Vec<Vec<f64>>,
    /// Reference line; `None` hides it.
    pub average: Option<f64>,
}

impl ChartData {
    /// Stacked spending chart.
    pub fn spending(report: &SpendingReport, show_average: bool) -> Self {
        Self::from_pivot(
            &report.spending,
            SPENDING_TITLE,
            SPENDING_Y_LABEL,
            BarMode::Stacked,
            show_average.then_some(report.average_monthly_spending),
        )
    }

    /// Grouped transaction-count chart.
    pub fn transactions(report: &SpendingReport, show_average: bool) -> Self {
        Self::from_pivot(
            &report.counts,
            TRANSACTIONS_TITLE,
            TRANSACTIONS_Y_LABEL,
            BarMode::Grouped,
            show_average.then_some(report.average_monthly_transactions),
        )
    }

    fn from_pivot<V: PivotValue>(
        pivot: &PivotTable<V>,
        title: &'static str,
        y_label: &'static str,
        mode: BarMode,
        average: Option<f64>,
    ) -> Self {
        let labels = pivot.months().iter().map(|m| m.label()).collect();
        let values = pivot
            .rows()
            .map(|(_, row)| row.iter().map(|v| v.to_f64()).collect())
            .collect();
        Self {
            title,
            y_label,
            mode,
            labels,
            series: pivot.merchants().to_vec(),
            values,
            average,
        }
    }
}

/// Legend line: one coloured swatch per merchant, then the average entry.
fn legend_line<'a>(data: &'a ChartData, theme: &Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(data.series.len() * 2 + 2);
    for (i, name) in data.series.iter().enumerate() {
        spans.push(Span::styled(BAR_SYMBOL, theme.series_style(i)));
        spans.push(Span::styled(format!(" {name}  "), theme.text));
    }
    if let Some(avg) = data.average {
        spans.push(Span::styled(AVERAGE_SYMBOL.repeat(2), theme.average_line));
        spans.push(Span::styled(format!(" Average: {avg:.2}"), theme.text));
    }
    Line::from(spans)
}

/// Draw `data` into `area` as a bordered, titled chart.
pub fn render_chart(frame: &mut Frame, area: Rect, data: &ChartData, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", data.title), theme.title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [legend_area, y_label_area, plot_area, x_label_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(legend_line(data, theme)), legend_area);
    frame.render_widget(
        Paragraph::new(Span::styled(data.y_label, theme.label)),
        y_label_area,
    );

    let styles: Vec<_> = (0..data.series.len())
        .map(|i| theme.series_style(i))
        .collect();
    let chart = MonthlyBarChart::new(&data.labels, &data.values, &styles, data.mode)
        .average(data.average, theme.average_line)
        .axis_style(theme.axis);
    frame.render_widget(chart, plot_area);

    frame.render_widget(
        Paragraph::new(Span::styled(X_LABEL, theme.label)).alignment(Alignment::Center),
        x_label_area,
    );
}

// ── Tests ─────────────────────────────────────────────────────────────────────
