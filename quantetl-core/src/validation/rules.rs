//! Individual validation rules.
//!
//! Each removal rule consumes the series and returns the kept rows plus the
//! number of rows it removed. Relative order of kept rows is preserved.

use crate::domain::OhlcvRecord;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// Price columns checked by the non-positive rule, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
}

impl PriceColumn {
    pub const ALL: [PriceColumn; 4] = [
        PriceColumn::Open,
        PriceColumn::High,
        PriceColumn::Low,
        PriceColumn::Close,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PriceColumn::Open => "open",
            PriceColumn::High => "high",
            PriceColumn::Low => "low",
            PriceColumn::Close => "close",
        }
    }

    pub fn value(self, record: &OhlcvRecord) -> f64 {
        match self {
            PriceColumn::Open => record.open,
            PriceColumn::High => record.high,
            PriceColumn::Low => record.low,
            PriceColumn::Close => record.close,
        }
    }
}

/// Count missing values per field, in schema order. Fields with no missing
/// values are omitted.
pub fn missing_value_counts(records: &[OhlcvRecord]) -> Vec<(&'static str, usize)> {
    let mut counts = Vec::new();

    let missing_symbols = records.iter().filter(|r| r.symbol.is_none()).count();
    if missing_symbols > 0 {
        counts.push(("symbol", missing_symbols));
    }

    for (i, field) in OhlcvRecord::NUMERIC_FIELDS.iter().enumerate() {
        let missing = records
            .iter()
            .filter(|r| r.numeric_fields()[i].1.is_nan())
            .count();
        if missing > 0 {
            counts.push((*field, missing));
        }
    }

    counts
}

/// Remove rows that repeat an earlier row on every field.
///
/// `NaN` matches `NaN` and `-0.0` matches `0.0`, so two rows that print the
/// same are treated as the same row.
pub fn drop_duplicates(records: Vec<OhlcvRecord>) -> (Vec<OhlcvRecord>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();
    let kept: Vec<OhlcvRecord> = records
        .into_iter()
        .filter(|r| seen.insert(RowKey::from(r)))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Remove rows whose high/low do not bracket open and close.
pub fn drop_inverted_ranges(records: Vec<OhlcvRecord>) -> (Vec<OhlcvRecord>, usize) {
    retain_counting(records, |r| !r.has_inverted_range())
}

/// Remove rows whose `column` is zero or negative.
pub fn drop_non_positive(
    records: Vec<OhlcvRecord>,
    column: PriceColumn,
) -> (Vec<OhlcvRecord>, usize) {
    // Negated so a void field is kept.
    retain_counting(records, |r| !(column.value(r) <= 0.0))
}

/// Remove rows with negative volume. Zero volume is valid.
pub fn drop_negative_volume(records: Vec<OhlcvRecord>) -> (Vec<OhlcvRecord>, usize) {
    retain_counting(records, |r| !(r.volume < 0.0))
}

fn retain_counting(
    mut records: Vec<OhlcvRecord>,
    keep: impl Fn(&OhlcvRecord) -> bool,
) -> (Vec<OhlcvRecord>, usize) {
    let before = records.len();
    records.retain(keep);
    let removed = before - records.len();
    (records, removed)
}

/// Hashable identity of a row.
#[derive(Debug, PartialEq, Eq, Hash)]
struct RowKey {
    timestamp: NaiveDateTime,
    symbol: Option<String>,
    fields: [u64; 5],
}

impl From<&OhlcvRecord> for RowKey {
    fn from(r: &OhlcvRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            symbol: r.symbol.clone(),
            fields: r.numeric_fields().map(|(_, v)| canonical_bits(v)),
        }
    }
}

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, close: f64) -> OhlcvRecord {
        OhlcvRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            symbol: Some("QQQ".into()),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let rows = vec![
            record(1, 10.0),
            record(2, 11.0),
            record(1, 10.0),
            record(3, 12.0),
            record(2, 11.0),
        ];
        let (kept, removed) = drop_duplicates(rows);
        assert_eq!(removed, 2);
        let closes: Vec<f64> = kept.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn same_timestamp_different_values_is_not_duplicate() {
        let rows = vec![record(1, 10.0), record(1, 10.5)];
        let (kept, removed) = drop_duplicates(rows);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn nan_rows_compare_equal_for_duplicates() {
        let mut a = record(1, 10.0);
        a.volume = f64::NAN;
        let b = a.clone();
        let (kept, removed) = drop_duplicates(vec![a, b]);
        assert_eq!(removed, 1);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn signed_zero_compares_equal_for_duplicates() {
        let mut a = record(1, 10.0);
        a.volume = 0.0;
        let mut b = a.clone();
        b.volume = -0.0;
        let (_, removed) = drop_duplicates(vec![a, b]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn symbol_participates_in_duplicate_check() {
        let a = record(1, 10.0);
        let mut b = a.clone();
        b.symbol = Some("SPY".into());
        let (_, removed) = drop_duplicates(vec![a, b]);
        assert_eq!(removed, 0);
    }

    #[test]
    fn zero_price_is_non_positive() {
        let mut r = record(1, 10.0);
        r.open = 0.0;
        let (kept, removed) = drop_non_positive(vec![r, record(2, 11.0)], PriceColumn::Open);
        assert_eq!(removed, 1);
        assert_eq!(kept[0].close, 11.0);
    }

    #[test]
    fn nan_price_survives_non_positive_check() {
        let mut r = record(1, 10.0);
        r.close = f64::NAN;
        let (kept, removed) = drop_non_positive(vec![r], PriceColumn::Close);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn zero_volume_is_valid() {
        let mut r = record(1, 10.0);
        r.volume = 0.0;
        let (kept, removed) = drop_negative_volume(vec![r]);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn missing_counts_follow_schema_order() {
        let mut a = record(1, 10.0);
        a.volume = f64::NAN;
        a.symbol = None;
        let mut b = record(2, 11.0);
        b.high = f64::NAN;
        b.volume = f64::NAN;
        let counts = missing_value_counts(&[a, b]);
        assert_eq!(counts, vec![("symbol", 1), ("high", 1), ("volume", 2)]);
    }
}
