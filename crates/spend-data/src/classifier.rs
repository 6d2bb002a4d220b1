//! Supermarket classification of raw CSV rows.
//!
//! Each row's amount is reduced to its magnitude (a blank cell is a missing
//! amount, not an error), its date parsed strictly
//! as `YYYYMMDD`, and its description matched against the merchant set:
//! one case-insensitive whole-word pattern per merchant, tried in set order,
//! first match wins.

use regex::{Regex, RegexBuilder};
use spend_core::time_utils::parse_compact_date;
use spend_core::{MerchantSet, RawRecord, Result, SpendError, Transaction};
use tracing::debug;

// ── MerchantClassifier ────────────────────────────────────────────────────────

/// Internal pairing of a merchant name with its compiled word-boundary pattern.
struct CompiledMerchant {
    name: String,
    pattern: Regex,
}

/// Maps transaction descriptions to merchant names.
pub struct MerchantClassifier {
    merchants: Vec<CompiledMerchant>,
}

impl MerchantClassifier {
    /// Compile one pattern per merchant, preserving set order.
    pub fn new(merchants: &MerchantSet) -> Result<Self> {
        let merchants = merchants
            .names()
            .iter()
            .map(|name| -> Result<CompiledMerchant> {
                let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(name)))
                    .case_insensitive(true)
                    .build()?;
                Ok(CompiledMerchant {
                    name: name.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { merchants })
    }

    /// First merchant (in set order) named as a whole word in `description`.
    pub fn classify(&self, description: &str) -> Option<&str> {
        self.merchants
            .iter()
            .find(|m| m.pattern.is_match(description))
            .map(|m| m.name.as_str())
    }

    /// Parse every record, then keep only the classified ones.
    ///
    /// All rows are parsed before filtering, so a malformed amount or date
    /// fails the whole batch even on a row that would not have matched.
    pub fn classify_records(&self, records: &[RawRecord]) -> Result<Vec<Transaction>> {
        let parsed = records
            .iter()
            .map(parse_record)
            .collect::<Result<Vec<_>>>()?;

        let total = parsed.len();
        let kept: Vec<Transaction> = parsed
            .into_iter()
            .filter_map(|mut tx| {
                let merchant = self.classify(&tx.description)?.to_string();
                tx.merchant = Some(merchant);
                Some(tx)
            })
            .collect();

        debug!("Classified {} of {} rows", kept.len(), total);
        Ok(kept)
    }
}

// ── Row parsing ───────────────────────────────────────────────────────────────

/// Turn a raw record into an unclassified [`Transaction`].
pub fn parse_record(record: &RawRecord) -> Result<Transaction> {
    let amount = parse_amount(record)?;
    let date =
        parse_compact_date(&record.transactiondate).ok_or_else(|| SpendError::InvalidDate {
            line: record.line,
            value: record.transactiondate.clone(),
        })?;

    Ok(Transaction {
        description: record.description.clone(),
        amount,
        date,
        merchant: None,
    })
}

/// Absolute value of the row's signed decimal amount; `None` for a blank
/// cell.
fn parse_amount(record: &RawRecord) -> Result<Option<f64>> {
    let text = record.amount.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value.abs())),
        _ => Err(SpendError::InvalidAmount {
            line: record.line,
            value: record.amount.clone(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
