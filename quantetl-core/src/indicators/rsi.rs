//! Relative Strength Index (RSI).
//!
//! Simple rolling means of gains and losses over the last `period` price
//! changes: RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//! Lookback: period (row 0 has no price change).
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0;
//! both zero → undefined.

use super::{Indicator, RollingWindow};
use crate::domain::OhlcvRecord;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: "rsi".to_string(),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>> {
        let mut gains = RollingWindow::new(self.period);
        let mut losses = RollingWindow::new(self.period);
        let mut prev: Option<f64> = None;

        let mut result = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            let curr = record.close_value();
            let change = if i == 0 {
                None
            } else {
                prev.zip(curr).map(|(p, c)| c - p)
            };
            gains.push(change.map(|ch| ch.max(0.0)));
            losses.push(change.map(|ch| (-ch).max(0.0)));
            prev = curr;

            let value = match (gains.mean(), losses.mean()) {
                (Some(avg_gain), Some(avg_loss)) => compute_rsi(avg_gain, avg_loss),
                _ => None,
            };
            result.push(value);
        }
        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        None // 0/0: no movement in the window
    } else if avg_loss == 0.0 {
        Some(100.0)
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
