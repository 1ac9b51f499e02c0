//! Annualized rolling volatility of simple returns.
//!
//! Sample standard deviation of the last `window` returns, scaled by
//! `sqrt(annualization)`. Returns start at row 1, so the first value is at
//! row `window`. Lookback: window.

use super::{Indicator, Returns, RollingWindow};
use crate::domain::OhlcvRecord;

#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    annualization: f64,
    name: String,
}

impl Volatility {
    pub fn new(window: usize, annualization_days: u32) -> Self {
        assert!(window >= 2, "volatility window must be >= 2");
        Self {
            window,
            annualization: f64::from(annualization_days),
            name: format!("volatility_{window}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn compute(&self, records: &[OhlcvRecord]) -> Vec<Option<f64>> {
        let scale = self.annualization.sqrt();
        let mut window = RollingWindow::new(self.window);
        Returns
            .compute(records)
            .into_iter()
            .map(|ret| {
                window.push(ret);
                window.sample_std().map(|sd| sd * scale)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_records};

    #[test]
    fn first_value_at_window_index() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let result = Volatility::new(20, 252).compute(&make_records(&closes));
        for (i, v) in result.iter().enumerate().take(20) {
            assert!(v.is_none(), "expected undefined at index {i}");
        }
        assert!(result[20].is_some());
    }

    #[test]
    fn constant_growth_has_zero_volatility() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 * 1.02_f64.powi(i)).collect();
        let result = Volatility::new(3, 252).compute(&make_records(&closes));
        assert_approx(result[5].unwrap(), 0.0, 1e-9);
    }

    #[test]
    fn annualizes_sample_std() {
        let records = make_records(&[100.0, 110.0, 121.0, 108.9]);
        let result = Volatility::new(2, 252).compute(&records);
        // returns[2] = 0.1, returns[3] = -0.1
        // sample std of [0.1, -0.1] = sqrt(0.02) with N-1 = 1
        let expected = 0.02_f64.sqrt() * 252.0_f64.sqrt();
        assert_approx(result[3].unwrap(), expected, 1e-9);
    }

    #[test]
    fn volatility_lookback_and_name() {
        let vol = Volatility::new(20, 252);
        assert_eq!(vol.lookback(), 20);
        assert_eq!(vol.name(), "volatility_20");
    }
}
