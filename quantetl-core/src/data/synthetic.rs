//! Synthetic market-data API.
//!
//! Stands in for a remote price feed: a deterministic random walk of daily
//! bars for any symbol. Nothing is fetched over the network.

use super::extract::Extractor;
use crate::domain::OhlcvRecord;
use crate::error::ExtractError;
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

pub const DEFAULT_DAYS: usize = 365;
const START_PRICE: f64 = 100.0;
const DRIFT: f64 = 0.001;
const DAILY_VOL: f64 = 0.02;

/// Generates `days` consecutive daily bars ending on `end_date` (today by
/// default). The locator is the symbol.
///
/// The RNG seed comes from the symbol's BLAKE3 hash unless an explicit seed
/// is set, so the same symbol always yields the same series.
#[derive(Debug, Clone)]
pub struct SyntheticApiExtractor {
    days: usize,
    seed: Option<u64>,
    end_date: Option<NaiveDate>,
}

impl Default for SyntheticApiExtractor {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            seed: None,
            end_date: None,
        }
    }
}

impl SyntheticApiExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn ending_on(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_seed(*blake3::hash(symbol.as_bytes()).as_bytes()),
        }
    }

    /// Generate the series for `symbol`.
    pub fn generate(&self, symbol: &str) -> Vec<OhlcvRecord> {
        let end = self
            .end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let mut rng = self.rng_for(symbol);
        let mut price = START_PRICE;

        // Bars that would fall before the first representable date are skipped.
        (0..self.days)
            .filter_map(|i| {
                let z: f64 = rng.sample(StandardNormal);
                price *= 1.0 + DRIFT + DAILY_VOL * z;

                let open = price * (1.0 + rng.gen_range(-0.01..0.01));
                let high = price * (1.0 + rng.gen_range(0.0..0.02));
                let low = price * (1.0 - rng.gen_range(0.0..0.02));
                let volume = rng.gen_range(1e6..5e6);

                let offset = (self.days - 1 - i) as u64;
                let timestamp = end
                    .checked_sub_days(Days::new(offset))?
                    .and_hms_opt(0, 0, 0)?;
                Some(OhlcvRecord {
                    timestamp,
                    symbol: Some(symbol.to_string()),
                    open,
                    high,
                    low,
                    close: price,
                    volume,
                })
            })
            .collect()
    }
}

impl Extractor for SyntheticApiExtractor {
    fn name(&self) -> &str {
        "api"
    }

    fn try_extract(&self, locator: &str) -> Result<Vec<OhlcvRecord>, ExtractError> {
        tracing::info!(symbol = locator, days = self.days, "generating synthetic bars");
        Ok(self.generate(locator))
    }
}
