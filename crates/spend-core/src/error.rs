use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Grocery Spend.
#[derive(Error, Debug)]
pub enum SpendError {
    /// The input CSV path does not resolve to a file.
    #[error("Error: File not found at {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// One or more of the required CSV columns is absent.
    #[error("Error: The CSV file must contain columns named 'description', 'amount', and 'transactiondate'.")]
    Schema { missing: Vec<String> },

    /// No row matched any merchant after classification.
    #[error("No transactions found for the specified supermarkets.")]
    NoMatchingTransactions,

    /// An `amount` field is not a finite decimal number.
    #[error("Invalid amount on line {line}: {value:?}")]
    InvalidAmount { line: u64, value: String },

    /// A `transactiondate` field is not a valid `YYYYMMDD` date.
    #[error("Invalid transaction date on line {line}: {value:?} (expected YYYYMMDD)")]
    InvalidDate { line: u64, value: String },

    /// The CSV content could not be read or is structurally broken.
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A merchant name could not be turned into a match pattern.
    #[error("Invalid merchant pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SpendError {
    /// `true` for the conditions that end a run with a console message
    /// rather than an error exit: missing file, missing columns, and an
    /// empty result after merchant filtering.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            SpendError::FileNotFound { .. }
                | SpendError::Schema { .. }
                | SpendError::NoMatchingTransactions
        )
    }
}

/// Convenience alias used throughout the spend crates.
pub type Result<T> = std::result::Result<T, SpendError>;
