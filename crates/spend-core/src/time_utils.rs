use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Serialize, Serializer};

// ── Strict date parsing ───────────────────────────────────────────────────────

/// Parse a bank booking date written as exactly eight digits, `YYYYMMDD`.
///
/// Surrounding whitespace is ignored. Returns `None` for any other shape or
/// for a calendar date that does not exist (e.g. `20240230`).
///
/// # Examples
///
/// ```
/// use spend_core::time_utils::parse_compact_date;
///
/// assert!(parse_compact_date("20240131").is_some());
/// assert!(parse_compact_date("2024-01-31").is_none());
/// ```
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ── Month ─────────────────────────────────────────────────────────────────────

/// A calendar month bucket, held as its first day. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    first: NaiveDate,
}

impl Month {
    /// Build a month; `None` when `month` is outside `1..=12` or the year is
    /// out of chrono's range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Days::new(u64::from(date.day0())),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Axis label, e.g. `"Jan-2024"`.
    pub fn label(&self) -> String {
        self.first_day().format("%b-%Y").to_string()
    }

    /// Sortable key, e.g. `"2024-01"`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
