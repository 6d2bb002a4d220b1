//! Reusable widgets shared by the chart and table views.

pub mod bar_chart;

pub use bar_chart::{BarMode, MonthlyBarChart};
