//! Terminal UI layer for Grocery Spend.
//!
//! Provides themes, the monthly bar-chart widget, chart and table views, and
//! the application event loop built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use spend_core as core;
