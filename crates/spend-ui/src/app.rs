//! Application state and TUI event loops for Grocery Spend.
//!
//! [`App`] owns the theme, the chart layout and the average-overlay switch.
//! It drives the chart and table event loops; both are static views that
//! only redraw on resize and exit on `q`, `Esc` or `Ctrl+C`.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Frame, Terminal,
};
use tracing::debug;

use spend_data::analysis::SpendingReport;

use crate::chart_view::{self, ChartData};
use crate::table_view;
use crate::themes::Theme;

const TICK_RATE: Duration = Duration::from_millis(250);

// ── ChartLayout ───────────────────────────────────────────────────────────────

/// Which charts the chart view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartLayout {
    /// Spending above transactions.
    #[default]
    Both,
    Spending,
    Transactions,
}

impl ChartLayout {
    pub fn next(self) -> Self {
        match self {
            Self::Both => Self::Spending,
            Self::Spending => Self::Transactions,
            Self::Transactions => Self::Both,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Both => Self::Transactions,
            Self::Spending => Self::Both,
            Self::Transactions => Self::Spending,
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the Grocery Spend TUI.
pub struct App {
    pub theme: Theme,
    pub layout: ChartLayout,
    /// Draw the dashed average line and its legend entry.
    pub show_average: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, show_average: bool) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            layout: ChartLayout::default(),
            show_average,
            should_quit: false,
        }
    }

    // ── Public event loops ────────────────────────────────────────────────────

    /// Show the spending and transaction charts until the user quits.
    pub fn run_charts(self, report: &SpendingReport) -> io::Result<()> {
        let spending = ChartData::spending(report, self.show_average);
        let transactions = ChartData::transactions(report, self.show_average);

        self.run(|app, frame| app.render_charts(frame, &spending, &transactions))
    }

    /// Show both pivots as tables until the user quits.
    pub fn run_table(self, report: &SpendingReport) -> io::Result<()> {
        self.run(|app, frame| {
            let area = frame.area();
            table_view::render_report_tables(frame, area, report, &app.theme);
        })
    }

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.layout = self.layout.next(),
            KeyCode::BackTab | KeyCode::Left => self.layout = self.layout.prev(),
            _ => {}
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Enter the alternate screen, loop `draw` + key handling, then restore
    /// the terminal whether or not the loop failed.
    fn run<F>(mut self, mut draw: F) -> io::Result<()>
    where
        F: FnMut(&App, &mut Frame),
    {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = (|| -> io::Result<()> {
            while !self.should_quit {
                terminal.draw(|frame| draw(&self, frame))?;

                if event::poll(TICK_RATE)? {
                    if let Event::Key(key) = event::read()? {
                        self.handle_key(key);
                        debug!("Key {:?}, layout now {:?}", key.code, self.layout);
                    }
                }
            }
            Ok(())
        })();

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn render_charts(&self, frame: &mut Frame, spending: &ChartData, transactions: &ChartData) {
        let area = frame.area();
        match self.layout {
            ChartLayout::Both => {
                let [top, bottom] =
                    Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(area);
                chart_view::render_chart(frame, top, spending, &self.theme);
                chart_view::render_chart(frame, bottom, transactions, &self.theme);
            }
            ChartLayout::Spending => {
                chart_view::render_chart(frame, area, spending, &self.theme);
            }
            ChartLayout::Transactions => {
                chart_view::render_chart(frame, area, transactions, &self.theme);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
