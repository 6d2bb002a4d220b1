use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpendError};

/// Supermarket names matched when no configuration overrides them.
pub const DEFAULT_MERCHANTS: &[&str] = &["ALBERT HEIJN", "Makro", "Jumbo", "darya"];

/// Columns every input CSV must provide.
pub const REQUIRED_COLUMNS: &[&str] = &["description", "amount", "transactiondate"];

/// One CSV data row as read from disk, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based line number of the row in the source file (header is line 1).
    #[serde(skip)]
    pub line: u64,
    /// Free-text transaction description from the bank.
    pub description: String,
    /// Signed decimal amount, still as text.
    pub amount: String,
    /// Booking date as `YYYYMMDD` text.
    pub transactiondate: String,
}

/// A parsed, sign-normalised transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Free-text transaction description from the bank.
    pub description: String,
    /// Absolute value of the booked amount; `None` when the cell was blank.
    pub amount: Option<f64>,
    /// Booking date.
    pub date: NaiveDate,
    /// Matched merchant name, `None` until classified.
    pub merchant: Option<String>,
}

/// Ordered list of merchant names; earlier names win when several match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MerchantSet {
    names: Vec<String>,
}

impl MerchantSet {
    /// Build a merchant set from `names`, trimming each entry and dropping
    /// case-insensitive duplicates (first occurrence kept).
    ///
    /// Fails when a name is blank or nothing is left.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(SpendError::Config(
                    "merchant names must not be blank".to_string(),
                ));
            }
            let lower = trimmed.to_lowercase();
            if kept.iter().any(|k| k.to_lowercase() == lower) {
                continue;
            }
            kept.push(trimmed.to_string());
        }

        if kept.is_empty() {
            return Err(SpendError::Config("merchant list is empty".to_string()));
        }
        Ok(Self { names: kept })
    }

    /// Merchant names in priority order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `name` in the set, compared exactly.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl Default for MerchantSet {
    fn default() -> Self {
        Self {
            names: DEFAULT_MERCHANTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for MerchantSet {
    type Error = SpendError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<MerchantSet> for Vec<String> {
    fn from(set: MerchantSet) -> Self {
        set.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_merchants_order() {
        let set = MerchantSet::default();
        assert_eq!(set.names(), &["ALBERT HEIJN", "Makro", "Jumbo", "darya"]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_new_trims_and_dedups_case_insensitively() {
        let set = MerchantSet::new([" Jumbo ", "Lidl", "JUMBO"]).unwrap();
        assert_eq!(set.names(), &["Jumbo", "Lidl"]);
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let err = MerchantSet::new(["Jumbo", "  "]).unwrap_err();
        assert!(matches!(err, SpendError::Config(_)));
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let err = MerchantSet::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: merchant list is empty");
    }

    #[test]
    fn test_position() {
        let set = MerchantSet::default();
        assert_eq!(set.position("Jumbo"), Some(2));
        assert_eq!(set.position("jumbo"), None);
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let set: MerchantSet = serde_json::from_str(r#"["Lidl","Aldi"]"#).unwrap();
        assert_eq!(set.names(), &["Lidl", "Aldi"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["Lidl","Aldi"]"#);

        assert!(serde_json::from_str::<MerchantSet>("[]").is_err());
    }
}
