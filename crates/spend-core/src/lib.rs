//! Shared domain layer for Grocery Spend.
//!
//! Holds the transaction and merchant types, the error enum, month
//! bucketing, number formatting and the command-line / config-file settings
//! used by the data, UI and binary crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, SpendError};
pub use models::{MerchantSet, RawRecord, Transaction};
pub use time_utils::Month;
