//! Indicator engine.
//!
//! Indicators are pure functions: record history in, one value per record
//! out. `None` marks an undefined value (warm-up rows, undefined inputs,
//! indeterminate results) and propagates through every indicator that
//! consumes it.
//!
//! # Look-ahead contamination guard
//! No indicator value at row t may depend on data from row t+1 or later.

pub mod engine;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod volatility;
pub mod window;

pub use engine::add_indicators;
pub use returns::{LogReturns, Returns};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::Volatility;
pub use window::RollingWindow;

use crate::domain::OhlcvRecord;

/// Trait for indicators computed over the close series.
pub trait Indicator: Send + Sync {
    /// Output field name (e.g., "sma_20").
    fn name(&self) -> &str;

    /// Number of leading rows that are always undefined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec` of the same length as `records`.
    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>>;
}

/// Keep a result only if it is a finite number.
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Create synthetic records from close prices for testing.
///
/// open = prev_close (or close for the first record),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_records(closes: &[f64]) -> Vec<OhlcvRecord> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            OhlcvRecord {
                timestamp: base + chrono::Duration::days(i as i64),
                symbol: Some("TEST".to_string()),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
