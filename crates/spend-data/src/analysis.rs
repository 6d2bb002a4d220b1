//! Main analysis pipeline for Grocery Spend.
//!
//! Orchestrates loading, classification and aggregation, returning a
//! [`SpendingReport`] ready for the UI layer.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use spend_core::{MerchantSet, RawRecord, Result, SpendError};
use tracing::info;

use crate::aggregator::{PivotTable, SpendingAggregator};
use crate::classifier::MerchantClassifier;
use crate::reader::{load_records, read_records};

// ── Public types ──────────────────────────────────────────────────────────────

/// The complete output of the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SpendingReport {
    /// Configured merchant names, in priority order.
    pub merchants: Vec<String>,
    /// Data rows read from the CSV.
    pub rows_read: usize,
    /// Rows that matched a merchant.
    pub rows_matched: usize,
    /// Sum of amounts per month and merchant.
    pub spending: PivotTable<f64>,
    /// Number of transactions per month and merchant.
    pub counts: PivotTable<u64>,
    /// Mean of the per-month spending totals.
    pub average_monthly_spending: f64,
    /// Mean of the per-month transaction counts.
    pub average_monthly_transactions: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on the CSV at `path`.
///
/// 1. Load rows and check the required columns.
/// 2. Parse amounts and dates, tag rows with their merchant, drop the rest.
/// 3. Aggregate by month and merchant.
///
/// Fails with [`SpendError::NoMatchingTransactions`] when step 2 keeps nothing.
pub fn analyze_file(path: &Path, merchants: &MerchantSet) -> Result<SpendingReport> {
    info!("Analysing {}", path.display());
    let records = load_records(path)?;
    analyze_records(&records, merchants)
}

/// Same as [`analyze_file`] over any CSV source.
pub fn analyze_reader<R: Read>(data: R, merchants: &MerchantSet) -> Result<SpendingReport> {
    let records = read_records(data)?;
    analyze_records(&records, merchants)
}

/// Classify and aggregate already-loaded rows.
pub fn analyze_records(records: &[RawRecord], merchants: &MerchantSet) -> Result<SpendingReport> {
    let classifier = MerchantClassifier::new(merchants)?;
    let transactions = classifier.classify_records(records)?;

    if transactions.is_empty() {
        info!("No rows matched any of {} merchants", merchants.len());
        return Err(SpendError::NoMatchingTransactions);
    }

    let pivots = SpendingAggregator::aggregate(&transactions, merchants);
    let average_monthly_spending = pivots.spending.average_month_total();
    let average_monthly_transactions = pivots.counts.average_month_total();

    info!(
        "Matched {} of {} rows across {} months",
        transactions.len(),
        records.len(),
        pivots.spending.months().len()
    );

    Ok(SpendingReport {
        merchants: merchants.names().to_vec(),
        rows_read: records.len(),
        rows_matched: transactions.len(),
        spending: pivots.spending,
        counts: pivots.counts,
        average_monthly_spending,
        average_monthly_transactions,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
