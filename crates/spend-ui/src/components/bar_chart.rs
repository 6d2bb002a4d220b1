use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use spend_core::formatting::format_axis_value;

/// Glyph used to fill bar cells.
pub const BAR_SYMBOL: &str = "█";
/// Glyph used for the dashed average line.
pub const AVERAGE_SYMBOL: &str = "╌";

/// How multiple series are drawn within one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarMode {
    /// One column per month, series stacked bottom to top.
    Stacked,
    /// One thin bar per series, side by side.
    Grouped,
}

/// Multi-series vertical bar chart with an optional horizontal reference line.
///
/// `values[group][series]`; every group must have one value per style. When
/// the area is too narrow for every group, the trailing (latest) groups are
/// drawn.
pub struct MonthlyBarChart<'a> {
    labels: &'a [String],
    values: &'a [Vec<f64>],
    styles: &'a [Style],
    mode: BarMode,
    average: Option<f64>,
    average_style: Style,
    axis_style: Style,
}

impl<'a> MonthlyBarChart<'a> {
    pub fn new(
        labels: &'a [String],
        values: &'a [Vec<f64>],
        styles: &'a [Style],
        mode: BarMode,
    ) -> Self {
        Self {
            labels,
            values,
            styles,
            mode,
            average: None,
            average_style: Style::default(),
            axis_style: Style::default(),
        }
    }

    /// Draw a dashed line at `value`.
    pub fn average(mut self, value: Option<f64>, style: Style) -> Self {
        self.average = value;
        self.average_style = style;
        self
    }

    pub fn axis_style(mut self, style: Style) -> Self {
        self.axis_style = style;
        self
    }

    /// Top of the y-axis: tallest column (or the reference line if higher).
    fn y_max(&self) -> f64 {
        let tallest = self
            .values
            .iter()
            .map(|group| match self.mode {
                BarMode::Stacked => group.iter().sum::<f64>(),
                BarMode::Grouped => group.iter().copied().fold(0.0, f64::max),
            })
            .fold(0.0, f64::max);
        let top = tallest.max(self.average.unwrap_or(0.0));
        if top > 0.0 {
            top
        } else {
            1.0
        }
    }
}

/// Number of rows (from the bottom) covered by `value` on a `height`-row axis.
pub fn scaled_rows(value: f64, y_max: f64, height: u16) -> u16 {
    if y_max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let rows = (value / y_max * f64::from(height)).round();
    rows.clamp(0.0, f64::from(height)) as u16
}

impl Widget for MonthlyBarChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.values.is_empty() || area.height < 3 {
            return;
        }

        let y_max = self.y_max();
        let top_label = format_axis_value(y_max);
        let axis_width = top_label.width().max(1) as u16 + 1;
        if area.width <= axis_width + 1 {
            return;
        }

        // Plot region excludes the y-axis column(s) and the two bottom rows
        // (x-axis rule and month labels).
        let plot = Rect {
            x: area.x + axis_width,
            y: area.y,
            width: area.width - axis_width,
            height: area.height - 2,
        };
        let bottom = plot.y + plot.height;
        let right = plot.x + plot.width;

        // ── Axes ──────────────────────────────────────────────────────────────
        for y in plot.y..bottom {
            buf.set_string(plot.x - 1, y, "│", self.axis_style);
        }
        buf.set_string(plot.x - 1, bottom, "└", self.axis_style);
        buf.set_string(plot.x, bottom, "─".repeat(plot.width as usize), self.axis_style);

        let label_x = |text: &str| area.x + (axis_width - 1).saturating_sub(text.width() as u16);
        buf.set_string(label_x(&top_label), plot.y, &top_label, self.axis_style);
        buf.set_string(label_x("0"), bottom - 1, "0", self.axis_style);

        // ── Bars ──────────────────────────────────────────────────────────────
        // Each month needs a one-cell gap plus room for its bars; when the
        // plot is too narrow for every month, only the latest ones are shown.
        let series = self.styles.len().max(1) as u16;
        let min_group = match self.mode {
            BarMode::Stacked => 2,
            BarMode::Grouped => series + 1,
        };
        let fit = usize::from((plot.width / min_group).max(1));
        let skip = self.values.len().saturating_sub(fit);
        let shown = &self.values[skip..];
        let group_width = plot.width / shown.len() as u16;
        let usable = group_width.saturating_sub(1);
        let drawable: &[Vec<f64>] = if group_width >= min_group { shown } else { &[] };

        for (g, group) in drawable.iter().enumerate() {
            let gx = plot.x + g as u16 * group_width;

            match self.mode {
                BarMode::Stacked => {
                    let bar_width = usable.min(9);
                    let x0 = gx + (usable - bar_width) / 2;
                    let mut cumulative = 0.0;
                    let mut drawn = 0u16;
                    for (s, value) in group.iter().enumerate() {
                        cumulative += value;
                        let top = scaled_rows(cumulative, y_max, plot.height);
                        let style = self.styles.get(s).copied().unwrap_or_default();
                        for level in drawn..top {
                            fill_row(buf, x0, bar_width, bottom - 1 - level, right, style);
                        }
                        drawn = drawn.max(top);
                    }
                }
                BarMode::Grouped => {
                    // `usable >= series`, so every bar gets at least one
                    // column inside its own month.
                    let bar_width = (usable / series).min(4);
                    let x0 = gx + (usable - bar_width * series) / 2;
                    for (s, value) in group.iter().enumerate().take(usize::from(series)) {
                        let x = x0 + s as u16 * bar_width;
                        let rows = scaled_rows(*value, y_max, plot.height);
                        let style = self.styles.get(s).copied().unwrap_or_default();
                        for level in 0..rows {
                            fill_row(buf, x, bar_width, bottom - 1 - level, right, style);
                        }
                    }
                }
            }
        }

        // ── Average line ──────────────────────────────────────────────────────
        if let Some(avg) = self.average {
            let level = scaled_rows(avg, y_max, plot.height).max(1);
            let y = bottom - level;
            buf.set_string(
                plot.x,
                y,
                AVERAGE_SYMBOL.repeat(plot.width as usize),
                self.average_style,
            );
        }

        // ── Month labels ──────────────────────────────────────────────────────
        let labels = self.labels.get(skip..).unwrap_or_default();
        let widest = labels.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let step = (widest + 1).div_ceil(group_width).max(1) as usize;
        for (g, label) in labels.iter().enumerate().step_by(step) {
            let x = plot.x + g as u16 * group_width;
            if x + label.width() as u16 > right {
                break;
            }
            buf.set_string(x, bottom + 1, label, self.axis_style);
        }
    }
}

/// Fill `width` cells of row `y` starting at `x`, clipped at `right`.
fn fill_row(buf: &mut Buffer, x: u16, width: u16, y: u16, right: u16, style: Style) {
    let end = (x + width).min(right);
    if end > x {
        buf.set_string(x, y, BAR_SYMBOL.repeat((end - x) as usize), style);
    }
}
