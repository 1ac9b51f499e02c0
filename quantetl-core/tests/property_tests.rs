//! Property tests for validation, indicator and resampling invariants.
//!
//! Uses proptest to verify:
//! 1. Row accounting: final <= initial, removed = initial - final
//! 2. Every surviving row satisfies the OHLC and sign rules
//! 3. Validation is idempotent
//! 4. No two surviving rows are identical
//! 5. RSI stays within [0, 100]; SMA stays within the window's close range
//! 6. Resampling never produces more rows than it receives

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use quantetl_core::indicators::add_indicators;
use quantetl_core::resample::resample;
use quantetl_core::validation::Validator;
use quantetl_core::{Frequency, OhlcvRecord};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn run_at() -> NaiveDateTime {
    base() + Duration::days(1000)
}

// ── Strategies (proptest) ────────────────────────────────────────────

/// A price that is sometimes void, sometimes non-positive.
fn arb_field() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => (0.5..200.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        1 => (-50.0..0.0_f64),
        1 => Just(0.0),
        1 => Just(f64::NAN),
    ]
}

/// Arbitrary, possibly dirty, records on a small set of dates so duplicates
/// occur.
fn arb_record() -> impl Strategy<Value = OhlcvRecord> {
    (
        0..10_i64,
        prop::option::of(Just("SPY".to_string())),
        arb_field(),
        arb_field(),
        arb_field(),
        arb_field(),
        arb_field(),
    )
        .prop_map(|(day, symbol, open, high, low, close, volume)| OhlcvRecord {
            timestamp: base() + Duration::days(day),
            symbol,
            open,
            high,
            low,
            close,
            volume,
        })
}

fn arb_records() -> impl Strategy<Value = Vec<OhlcvRecord>> {
    prop::collection::vec(arb_record(), 0..60).prop_flat_map(|rows| {
        // Repeat some rows verbatim to exercise the duplicate rule.
        let n = rows.len();
        (Just(rows), prop::collection::vec(0..n.max(1), 0..5)).prop_map(move |(mut rows, picks)| {
            if n > 0 {
                for i in picks {
                    rows.push(rows[i].clone());
                }
            }
            rows
        })
    })
}

/// A clean, strictly positive close series.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, 1..120)
}

fn records_from_closes(closes: &[f64]) -> Vec<OhlcvRecord> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvRecord {
            timestamp: base() + Duration::days(i as i64),
            symbol: Some("SPY".into()),
            open: close,
            high: close + 1.0,
            low: (close - 1.0).max(0.01),
            close,
            volume: 1000.0,
        })
        .collect()
}

fn satisfies_rules(r: &OhlcvRecord) -> bool {
    !r.has_inverted_range()
        && !(r.open <= 0.0)
        && !(r.high <= 0.0)
        && !(r.low <= 0.0)
        && !(r.close <= 0.0)
        && !(r.volume < 0.0)
}

// ── 1-4. Validation ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn row_accounting_holds(records in arb_records()) {
        let initial = records.len();
        let (cleaned, entry) = Validator::new().validate(records, run_at());
        prop_assert!(cleaned.len() <= initial);
        prop_assert_eq!(entry.initial_rows, initial);
        prop_assert_eq!(entry.final_rows, cleaned.len());
        prop_assert_eq!(entry.removed_rows, initial - cleaned.len());
    }

    #[test]
    fn survivors_satisfy_every_rule(records in arb_records()) {
        let (cleaned, _) = Validator::new().validate(records, run_at());
        for r in &cleaned {
            prop_assert!(satisfies_rules(r), "row violates a rule: {:?}", r);
        }
    }

    #[test]
    fn validation_is_idempotent(records in arb_records()) {
        let validator = Validator::new();
        let (once, _) = validator.validate(records, run_at());
        let (twice, entry) = validator.validate(once.clone(), run_at());
        prop_assert_eq!(entry.removed_rows, 0);
        prop_assert_eq!(twice.len(), once.len());
        prop_assert!(entry
            .issues
            .iter()
            .all(|issue| issue.starts_with("Missing values")));
    }

    #[test]
    fn survivors_are_distinct(records in arb_records()) {
        let (cleaned, _) = Validator::new().validate(records, run_at());
        for (i, a) in cleaned.iter().enumerate() {
            for b in &cleaned[i + 1..] {
                let same = a.timestamp == b.timestamp
                    && a.symbol == b.symbol
                    && a.numeric_fields()
                        .iter()
                        .zip(b.numeric_fields().iter())
                        .all(|((_, x), (_, y))| x == y || (x.is_nan() && y.is_nan()));
                prop_assert!(!same, "duplicate survived: {:?}", a);
            }
        }
    }

    #[test]
    fn survivors_keep_input_order(records in arb_records()) {
        let (cleaned, _) = Validator::new().validate(records.clone(), run_at());
        let mut cursor = records.iter();
        for kept in &cleaned {
            prop_assert!(
                cursor.any(|r| r.timestamp == kept.timestamp && r.symbol == kept.symbol),
                "row out of order: {:?}", kept
            );
        }
    }
}

// ── 5. Indicators ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes()) {
        let enriched = add_indicators(&records_from_closes(&closes));
        for rsi in enriched.iter().filter_map(|r| r.rsi) {
            prop_assert!((0.0..=100.0).contains(&rsi), "rsi out of range: {}", rsi);
        }
    }

    #[test]
    fn sma_within_window_range(closes in arb_closes()) {
        let enriched = add_indicators(&records_from_closes(&closes));
        for (i, row) in enriched.iter().enumerate() {
            if let Some(sma) = row.sma_20 {
                let window = &closes[i + 1 - 20..=i];
                let lo = window.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = window.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(sma >= lo - 1e-9 && sma <= hi + 1e-9);
            }
        }
    }

    #[test]
    fn volatility_is_non_negative(closes in arb_closes()) {
        let enriched = add_indicators(&records_from_closes(&closes));
        for vol in enriched.iter().filter_map(|r| r.volatility_20) {
            prop_assert!(vol >= 0.0);
        }
    }
}

// ── 6. Resampling ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn resample_never_grows(closes in arb_closes()) {
        let records = records_from_closes(&closes);
        for freq in [Frequency::Weekly, Frequency::Monthly, Frequency::Quarterly] {
            let out = resample(&records, freq);
            prop_assert!(out.len() <= records.len());
            prop_assert!(out.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            let total: f64 = out.iter().map(|r| r.volume).sum();
            prop_assert!((total - 1000.0 * records.len() as f64).abs() < 1e-6);
        }
    }
}
