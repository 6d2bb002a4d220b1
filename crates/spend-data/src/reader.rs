//! CSV loading for Grocery Spend.
//!
//! Reads the whole file into memory as [`RawRecord`]s after checking that the
//! required columns are present. Field contents are not interpreted here.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use spend_core::models::REQUIRED_COLUMNS;
use spend_core::{RawRecord, Result, SpendError};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every data row of the CSV at `path`.
///
/// Fails with [`SpendError::FileNotFound`] when `path` is not a file and with
/// [`SpendError::Schema`] when a required column is missing.
pub fn load_records(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.is_file() {
        warn!("CSV path does not exist: {}", path.display());
        return Err(SpendError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path)?;
    let records = read_records(file)?;

    debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read every data row from any CSV source. The first row must be the header.
pub fn read_records<R: Read>(data: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(i as u64 + 2);

        records.push(RawRecord {
            line,
            description: columns.field(&row, columns.description),
            amount: columns.field(&row, columns.amount),
            transactiondate: columns.field(&row, columns.transactiondate),
        });
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns within the header row.
struct ColumnIndex {
    description: usize,
    amount: usize,
    transactiondate: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        match (find("description"), find("amount"), find("transactiondate")) {
            (Some(description), Some(amount), Some(transactiondate)) => Ok(Self {
                description,
                amount,
                transactiondate,
            }),
            _ => {
                let missing: Vec<String> = REQUIRED_COLUMNS
                    .iter()
                    .filter(|&&c| find(c).is_none())
                    .map(|c| c.to_string())
                    .collect();
                warn!("CSV is missing required columns: {}", missing.join(", "));
                Err(SpendError::Schema { missing })
            }
        }
    }

    fn field(&self, row: &StringRecord, idx: usize) -> String {
        row.get(idx).unwrap_or_default().to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
