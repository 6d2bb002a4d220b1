use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 light. Absent or unparseable values yield
/// `BackgroundType::Dark`.
pub fn detect_background() -> BackgroundType {
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(value: Option<&str>) -> BackgroundType {
    match value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.parse::<u8>().ok())
    {
        Some(bg) if bg > 6 => BackgroundType::Light,
        _ => BackgroundType::Dark,
    }
}

/// Colour roles a theme is built from.
struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
    faint: Color,
    highlight: Color,
    series: [Color; 6],
    bold: bool,
}

/// Complete theme definition carrying all UI styles used by spend-ui views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Text ─────────────────────────────────────────────────────────────────
    pub title: Style,
    pub text: Style,
    pub dim: Style,
    pub label: Style,
    pub warning: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// One colour per merchant series, cycled when there are more merchants.
    pub series: Vec<Style>,
    /// Dashed average line and its legend swatch.
    pub average_line: Style,
    pub axis: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,
}

impl Theme {
    fn from_palette(p: Palette) -> Self {
        let fg = |c: Color| Style::default().fg(c);
        let strong = |c: Color| {
            if p.bold {
                fg(c).add_modifier(Modifier::BOLD)
            } else {
                fg(c)
            }
        };

        Self {
            title: strong(p.accent),
            text: fg(p.text),
            dim: fg(p.faint),
            label: fg(p.muted),
            warning: fg(Color::Yellow),

            series: p.series.iter().map(|&c| fg(c)).collect(),
            average_line: fg(Color::Red),
            axis: fg(p.muted),

            table_header: strong(p.accent),
            table_row: fg(p.text),
            table_row_alt: fg(p.muted),
            table_total: strong(p.highlight),
        }
    }

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self::from_palette(Palette {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
            faint: Color::DarkGray,
            highlight: Color::Yellow,
            series: [
                Color::Blue,
                Color::LightYellow,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::LightRed,
            ],
            bold: true,
        })
    }

    /// Light-background terminal theme: dark text, saturated accents.
    pub fn light() -> Self {
        Self::from_palette(Palette {
            accent: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            faint: Color::Gray,
            highlight: Color::Magenta,
            series: [
                Color::Blue,
                Color::Yellow,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::DarkGray,
            ],
            bold: true,
        })
    }

    /// Basic 8-colour ANSI palette, no bold.
    pub fn classic() -> Self {
        Self::from_palette(Palette {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
            faint: Color::DarkGray,
            highlight: Color::Yellow,
            series: [
                Color::Blue,
                Color::Yellow,
                Color::Green,
                Color::Magenta,
                Color::Cyan,
                Color::White,
            ],
            bold: false,
        })
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            BackgroundType::Dark => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names (including `"auto"`) use
    /// [`Theme::auto_detect`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    /// Colour of the `index`-th merchant series.
    pub fn series_style(&self, index: usize) -> Style {
        if self.series.is_empty() {
            return self.text;
        }
        self.series[index % self.series.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
