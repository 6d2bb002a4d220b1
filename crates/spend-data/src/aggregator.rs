//! Month × merchant aggregation of classified transactions.
//!
//! Produces two zero-filled [`PivotTable`]s (spending totals and row counts)
//! with months in ascending order and merchants in merchant-set order.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Add;

use serde::Serialize;
use spend_core::{MerchantSet, Month, Transaction};
use tracing::debug;

// ── PivotValue ────────────────────────────────────────────────────────────────

/// Cell type of a pivot table.
pub trait PivotValue: Copy + Default + PartialOrd + Add<Output = Self> + Serialize {
    fn to_f64(self) -> f64;
}

impl PivotValue for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl PivotValue for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

// ── PivotTable ────────────────────────────────────────────────────────────────

/// Dense month × merchant matrix. Every combination of an observed month and
/// an observed merchant has a cell; absent combinations hold zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable<V> {
    months: Vec<Month>,
    merchants: Vec<String>,
    /// `values[month_idx][merchant_idx]`
    values: Vec<Vec<V>>,
}

impl<V: PivotValue> PivotTable<V> {
    fn zeroed(months: Vec<Month>, merchants: Vec<String>) -> Self {
        let values = vec![vec![V::default(); merchants.len()]; months.len()];
        Self {
            months,
            merchants,
            values,
        }
    }

    /// Months in ascending order.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Merchant columns in merchant-set order.
    pub fn merchants(&self) -> &[String] {
        &self.merchants
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Value of one cell; `None` if the month or merchant is not a row/column.
    pub fn get(&self, month: Month, merchant: &str) -> Option<V> {
        let row = self.months.iter().position(|m| *m == month)?;
        let col = self.merchants.iter().position(|m| m == merchant)?;
        Some(self.values[row][col])
    }

    /// All merchant values for the month at `index`, in column order.
    pub fn row(&self, index: usize) -> &[V] {
        &self.values[index]
    }

    /// Iterate `(month, values)` pairs in month order.
    pub fn rows(&self) -> impl Iterator<Item = (Month, &[V])> {
        self.months
            .iter()
            .copied()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    /// Sum across merchants for each month.
    pub fn month_totals(&self) -> Vec<V> {
        self.values.iter().map(|row| sum(row.iter().copied())).collect()
    }

    /// Sum across months for each merchant.
    pub fn merchant_totals(&self) -> Vec<V> {
        (0..self.merchants.len())
            .map(|col| sum(self.values.iter().map(|row| row[col])))
            .collect()
    }

    /// Sum of every cell.
    pub fn grand_total(&self) -> V {
        sum(self.month_totals())
    }

    /// Arithmetic mean of the per-month totals; `0.0` with no months.
    pub fn average_month_total(&self) -> f64 {
        if self.months.is_empty() {
            return 0.0;
        }
        let total: f64 = self.month_totals().into_iter().map(V::to_f64).sum();
        total / self.months.len() as f64
    }

    fn add(&mut self, row: usize, col: usize, value: V) {
        let cell = &mut self.values[row][col];
        *cell = *cell + value;
    }
}

fn sum<V: PivotValue>(values: impl IntoIterator<Item = V>) -> V {
    values.into_iter().fold(V::default(), |acc, v| acc + v)
}

// ── MonthlyPivots ─────────────────────────────────────────────────────────────

/// Spending and count pivots over the same months and merchants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPivots {
    pub spending: PivotTable<f64>,
    pub counts: PivotTable<u64>,
}

// ── SpendingAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups classified transactions by month and merchant.
pub struct SpendingAggregator;

impl SpendingAggregator {
    /// Aggregate `transactions` into spending and count pivots.
    ///
    /// Transactions without a merchant, or whose merchant is not in
    /// `merchants`, are skipped.
    pub fn aggregate(transactions: &[Transaction], merchants: &MerchantSet) -> MonthlyPivots {
        // (month, merchant index in set) -> (sum, count); BTreeMap keeps
        // months sorted.
        let mut cells: BTreeMap<(Month, usize), (f64, u64)> = BTreeMap::new();
        let mut months: BTreeSet<Month> = BTreeSet::new();
        let mut observed: BTreeSet<usize> = BTreeSet::new();
        let mut skipped = 0usize;

        for tx in transactions {
            let Some(idx) = tx.merchant.as_deref().and_then(|m| merchants.position(m)) else {
                skipped += 1;
                continue;
            };
            let month = Month::from_date(tx.date);
            months.insert(month);
            observed.insert(idx);

            // A row with a missing amount still counts as a transaction.
            let cell = cells.entry((month, idx)).or_default();
            cell.0 += tx.amount.unwrap_or(0.0);
            cell.1 += 1;
        }

        if skipped > 0 {
            debug!("Skipped {} unclassified transactions", skipped);
        }

        // Every key of `cells` was recorded in `months` and `observed`, so
        // both position maps cover it.
        let rows: BTreeMap<Month, usize> =
            months.iter().enumerate().map(|(row, &m)| (m, row)).collect();
        let columns: BTreeMap<usize, usize> = observed
            .iter()
            .enumerate()
            .map(|(col, &idx)| (idx, col))
            .collect();
        let names: Vec<String> = observed
            .iter()
            .map(|&i| merchants.names()[i].clone())
            .collect();

        let months: Vec<Month> = months.into_iter().collect();
        let mut spending = PivotTable::zeroed(months.clone(), names.clone());
        let mut counts = PivotTable::zeroed(months, names);

        for ((month, idx), (amount, count)) in cells {
            let (row, col) = (rows[&month], columns[&idx]);
            spending.add(row, col, amount);
            counts.add(row, col, count);
        }

        debug!(
            "Aggregated {} months x {} merchants",
            spending.months.len(),
            spending.merchants.len()
        );

        MonthlyPivots { spending, counts }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, merchant: Option<&str>, amount: f64) -> Transaction {
        Transaction {
            description: merchant.unwrap_or("other").to_string(),
            amount: Some(amount),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            merchant: merchant.map(str::to_string),
        }
    }

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx("2024-02-10", Some("Jumbo"), 20.0),
            tx("2024-01-01", Some("Jumbo"), 10.0),
            tx("2024-01-31", Some("Jumbo"), 5.0),
            tx("2024-01-15", Some("ALBERT HEIJN"), 7.5),
            tx("2024-03-03", Some("darya"), 2.25),
        ]
    }

    // ── Single-merchant month ─────────────────────────────────────────────────

    #[test]
    fn test_single_month_single_merchant() {
        let txs = vec![
            tx("2024-01-01", Some("Jumbo"), 10.0),
            tx("2024-01-31", Some("Jumbo"), 5.0),
        ];
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());

        assert_eq!(pivots.spending.months(), &[month(2024, 1)]);
        assert_eq!(pivots.spending.merchants(), &["Jumbo"]);
        assert_eq!(pivots.spending.get(month(2024, 1), "Jumbo"), Some(15.0));
        assert_eq!(pivots.counts.get(month(2024, 1), "Jumbo"), Some(2));
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn test_months_ascending_and_merchants_in_set_order() {
        let pivots = SpendingAggregator::aggregate(&sample(), &MerchantSet::default());

        assert_eq!(
            pivots.spending.months(),
            &[month(2024, 1), month(2024, 2), month(2024, 3)]
        );
        // Makro never occurs, so it has no column.
        assert_eq!(pivots.spending.merchants(), &["ALBERT HEIJN", "Jumbo", "darya"]);
        assert_eq!(pivots.counts.merchants(), pivots.spending.merchants());
        assert_eq!(pivots.counts.months(), pivots.spending.months());
    }

    // ── Zero fill ─────────────────────────────────────────────────────────────

    #[test]
    fn test_every_cell_present_and_zero_filled() {
        let pivots = SpendingAggregator::aggregate(&sample(), &MerchantSet::default());

        for &m in pivots.spending.months() {
            for name in pivots.spending.merchants() {
                assert!(pivots.spending.get(m, name).is_some());
                assert!(pivots.counts.get(m, name).is_some());
            }
        }
        assert_eq!(pivots.spending.get(month(2024, 2), "ALBERT HEIJN"), Some(0.0));
        assert_eq!(pivots.counts.get(month(2024, 3), "Jumbo"), Some(0));
        assert_eq!(pivots.spending.get(month(2024, 1), "Makro"), None);
    }

    // ── Totals ────────────────────────────────────────────────────────────────

    #[test]
    fn test_grand_totals_match_inputs() {
        let txs = sample();
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());

        let expected: f64 = txs.iter().filter_map(|t| t.amount).sum();
        assert!((pivots.spending.grand_total() - expected).abs() < 1e-9);
        assert_eq!(pivots.counts.grand_total(), txs.len() as u64);
    }

    #[test]
    fn test_month_and_merchant_totals() {
        let pivots = SpendingAggregator::aggregate(&sample(), &MerchantSet::default());

        assert_eq!(pivots.spending.month_totals(), vec![22.5, 20.0, 2.25]);
        assert_eq!(pivots.spending.merchant_totals(), vec![7.5, 35.0, 2.25]);
        assert_eq!(pivots.counts.month_totals(), vec![3, 1, 1]);
        assert_eq!(pivots.counts.merchant_totals(), vec![1, 3, 1]);
    }

    #[test]
    fn test_average_is_mean_of_month_totals() {
        let pivots = SpendingAggregator::aggregate(&sample(), &MerchantSet::default());

        let expected = (22.5 + 20.0 + 2.25) / 3.0;
        assert_eq!(pivots.spending.average_month_total(), expected);
        assert_eq!(pivots.counts.average_month_total(), 5.0 / 3.0);
    }

    // ── Exclusions ────────────────────────────────────────────────────────────

    #[test]
    fn test_unclassified_and_unknown_merchants_are_skipped() {
        let txs = vec![
            tx("2024-01-01", Some("Jumbo"), 10.0),
            tx("2024-01-02", None, 99.0),
            tx("2024-01-03", Some("Lidl"), 42.0),
        ];
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());

        assert_eq!(pivots.spending.merchants(), &["Jumbo"]);
        assert_eq!(pivots.spending.grand_total(), 10.0);
        assert_eq!(pivots.counts.grand_total(), 1);
    }

    #[test]
    fn test_empty_input() {
        let pivots = SpendingAggregator::aggregate(&[], &MerchantSet::default());
        assert!(pivots.spending.is_empty());
        assert!(pivots.counts.is_empty());
        assert_eq!(pivots.spending.average_month_total(), 0.0);
        assert_eq!(pivots.counts.grand_total(), 0);
    }

    #[test]
    fn test_missing_amount_counts_but_adds_nothing() {
        let mut txs = vec![
            tx("2024-01-01", Some("Jumbo"), 0.0),
            tx("2024-01-02", Some("Jumbo"), 2.0),
        ];
        txs[0].amount = None;
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());

        assert_eq!(pivots.spending.get(month(2024, 1), "Jumbo"), Some(2.0));
        assert_eq!(pivots.counts.get(month(2024, 1), "Jumbo"), Some(2));
    }

    #[test]
    fn test_sparse_cells_land_in_their_own_row_and_column() {
        // darya only in the last month, Makro only in the first, fed in
        // reverse chronological order.
        let txs = vec![
            tx("2024-06-09", Some("darya"), 4.0),
            tx("2024-03-20", Some("Jumbo"), 3.0),
            tx("2024-01-05", Some("Makro"), 1.0),
        ];
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());

        assert_eq!(pivots.spending.merchants(), &["Makro", "Jumbo", "darya"]);
        assert_eq!(pivots.spending.row(0), &[1.0, 0.0, 0.0]);
        assert_eq!(pivots.spending.row(1), &[0.0, 3.0, 0.0]);
        assert_eq!(pivots.spending.row(2), &[0.0, 0.0, 4.0]);
        assert_eq!(pivots.counts.row(2), &[0, 0, 1]);
    }

    #[test]
    fn test_rows_iterates_in_month_order() {
        let pivots = SpendingAggregator::aggregate(&sample(), &MerchantSet::default());
        let keys: Vec<String> = pivots.counts.rows().map(|(m, _)| m.key()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(pivots.counts.row(0), &[1, 2, 0]);
    }

    #[test]
    fn test_serializes_months_as_keys() {
        let txs = vec![tx("2024-01-05", Some("Jumbo"), 1.5)];
        let pivots = SpendingAggregator::aggregate(&txs, &MerchantSet::default());
        let json = serde_json::to_value(&pivots.spending).unwrap();

        assert_eq!(json["months"][0], "2024-01");
        assert_eq!(json["merchants"][0], "Jumbo");
        assert_eq!(json["values"][0][0], 1.5);
    }
}
