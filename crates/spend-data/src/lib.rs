//! Data pipeline for Grocery Spend.
//!
//! Reads the bank-transaction CSV, classifies rows by supermarket,
//! aggregates them into month × merchant pivot tables and runs the
//! top-level analysis that feeds the UI layer.

pub mod aggregator;
pub mod analysis;
pub mod classifier;
pub mod reader;

pub use spend_core as core;
