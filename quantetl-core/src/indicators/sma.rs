//! Simple Moving Average (SMA).
//!
//! Trailing mean of close prices over a window inclusive of the current row.
//! Lookback: period - 1 (first valid value at index period-1).

use super::{Indicator, RollingWindow};
use crate::domain::OhlcvRecord;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>> {
        let mut window = RollingWindow::new(self.period);
        records
            .iter()
            .map(|r| {
                window.push(r.close_value());
                window.mean()
            })
            .collect()
    }
}
