//! Simple and log returns between consecutive closes.
//!
//! Lookback: 1 (row 0 has no predecessor).

use super::{finite, Indicator};
use crate::domain::OhlcvRecord;

/// Fractional change from the previous close: `(c[i] - c[i-1]) / c[i-1]`.
#[derive(Debug, Clone, Default)]
pub struct Returns;

/// Natural log of the close ratio: `ln(c[i] / c[i-1])`.
#[derive(Debug, Clone, Default)]
pub struct LogReturns;

/// Apply `f(prev, curr)` to every consecutive pair of defined closes.
fn pairwise(records: &[OhlcvRecord], f: impl Fn(f64, f64) -> f64) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(records.len());
    if records.is_empty() {
        return result;
    }
    result.push(None);
    for pair in records.windows(2) {
        let value = match (pair[0].close_value(), pair[1].close_value()) {
            (Some(prev), Some(curr)) => finite(f(prev, curr)),
            _ => None,
        };
        result.push(value);
    }
    result
}

impl Indicator for Returns {
    fn name(&self) -> &str {
        "returns"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>> {
        pairwise(records, |prev, curr| (curr - prev) / prev)
    }
}

impl Indicator for LogReturns {
    fn name(&self) -> &str {
        "log_returns"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>> {
        pairwise(records, |prev, curr| (curr / prev).ln())
    }
}
