//! Data-quality validation.
//!
//! Rules run in a fixed order, each on the output of the previous one:
//!
//! 1. Missing values (report only, nothing removed)
//! 2. Duplicate rows (first occurrence kept)
//! 3. OHLC consistency
//! 4. Non-positive prices, column by column: open, high, low, close
//! 5. Negative volume
//!
//! A rule that removes at least one row (or, for rule 1, finds at least one
//! missing value) appends one issue string to the report entry.

pub mod rules;

use crate::domain::{OhlcvRecord, QualityReportEntry};
use chrono::NaiveDateTime;

pub use rules::{
    drop_duplicates, drop_inverted_ranges, drop_negative_volume, drop_non_positive,
    missing_value_counts, PriceColumn,
};

/// Applies the rule pipeline and builds one report entry per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a series, stamping the report entry with `run_at`.
    pub fn validate(
        &self,
        records: Vec<OhlcvRecord>,
        run_at: NaiveDateTime,
    ) -> (Vec<OhlcvRecord>, QualityReportEntry) {
        tracing::info!(rows = records.len(), "validating data quality");

        let initial_rows = records.len();
        let mut issues = Vec::new();

        let missing = missing_value_counts(&records);
        if !missing.is_empty() {
            let fields: Vec<String> = missing
                .iter()
                .map(|(field, count)| format!("{field}: {count}"))
                .collect();
            issues.push(format!("Missing values: {{{}}}", fields.join(", ")));
        }

        let (records, duplicates) = drop_duplicates(records);
        if duplicates > 0 {
            issues.push(format!("Duplicate rows: {duplicates}"));
        }

        let (records, inverted) = drop_inverted_ranges(records);
        if inverted > 0 {
            issues.push(format!("Invalid OHLC relationships: {inverted} rows"));
        }

        let mut records = records;
        for column in PriceColumn::ALL {
            let (kept, removed) = drop_non_positive(records, column);
            if removed > 0 {
                issues.push(format!("Negative {}: {removed} rows", column.name()));
            }
            records = kept;
        }

        let (records, negative_volume) = drop_negative_volume(records);
        if negative_volume > 0 {
            issues.push(format!("Negative volume: {negative_volume} rows"));
        }

        let final_rows = records.len();
        let removed_rows = initial_rows - final_rows;
        for issue in &issues {
            tracing::warn!(issue = %issue, "data quality issue");
        }
        tracing::info!(removed = removed_rows, "validation complete");

        let entry = QualityReportEntry {
            timestamp: run_at,
            initial_rows,
            final_rows,
            removed_rows,
            issues,
        };
        (records, entry)
    }
}
