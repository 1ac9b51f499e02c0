//! Fixed-size trailing window over an optional-valued series.

use std::collections::VecDeque;

/// Trailing window holding the last `len` observations.
///
/// A statistic is only available once the window is full and every value in
/// it is defined. Statistics are recomputed from the buffer rather than from
/// a running sum, so a window of exact zeros always yields exactly zero.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    len: usize,
    values: VecDeque<Option<f64>>,
    undefined: usize,
}

impl RollingWindow {
    pub fn new(len: usize) -> Self {
        assert!(len >= 1, "window length must be >= 1");
        Self {
            len,
            values: VecDeque::with_capacity(len),
            undefined: 0,
        }
    }

    /// Push the next observation, evicting the oldest once full.
    pub fn push(&mut self, value: Option<f64>) {
        if self.values.len() == self.len {
            if let Some(None) = self.values.pop_front() {
                self.undefined -= 1;
            }
        }
        if value.is_none() {
            self.undefined += 1;
        }
        self.values.push_back(value);
    }

    /// True once the window is full and contains no undefined values.
    pub fn is_ready(&self) -> bool {
        self.values.len() == self.len && self.undefined == 0
    }

    fn defined(&self) -> Option<impl Iterator<Item = f64> + '_> {
        self.is_ready().then(|| self.values.iter().flatten().copied())
    }

    pub fn sum(&self) -> Option<f64> {
        self.defined().map(|it| it.sum())
    }

    pub fn mean(&self) -> Option<f64> {
        self.sum().map(|s| s / self.len as f64)
    }

    /// Sample standard deviation (N-1 denominator). Undefined for a window of one.
    pub fn sample_std(&self) -> Option<f64> {
        if self.len < 2 {
            return None;
        }
        let mean = self.mean()?;
        let sq: f64 = self.defined()?.map(|v| (v - mean).powi(2)).sum();
        Some((sq / (self.len - 1) as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn not_ready_until_full() {
        let mut w = RollingWindow::new(3);
        w.push(Some(1.0));
        w.push(Some(2.0));
        assert!(!w.is_ready());
        assert_eq!(w.mean(), None);
        w.push(Some(3.0));
        assert_approx(w.mean().unwrap(), 2.0, DEFAULT_EPSILON);
    }

    #[test]
    fn evicts_oldest() {
        let mut w = RollingWindow::new(2);
        for v in [1.0, 2.0, 10.0] {
            w.push(Some(v));
        }
        assert_approx(w.sum().unwrap(), 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn undefined_value_blocks_until_evicted() {
        let mut w = RollingWindow::new(2);
        w.push(Some(1.0));
        w.push(None);
        assert_eq!(w.mean(), None);
        w.push(Some(3.0));
        assert_eq!(w.mean(), None);
        w.push(Some(5.0));
        assert_approx(w.mean().unwrap(), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let mut w = RollingWindow::new(4);
        for v in [2.0, 4.0, 4.0, 6.0] {
            w.push(Some(v));
        }
        // mean 4, squared deviations 4+0+0+4 = 8, 8/3
        assert_approx(w.sample_std().unwrap(), (8.0_f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn zero_window_sums_exactly_zero() {
        let mut w = RollingWindow::new(3);
        for v in [0.5, 0.25, 0.0, 0.0, 0.0] {
            w.push(Some(v));
        }
        assert_eq!(w.sum(), Some(0.0));
    }
}
