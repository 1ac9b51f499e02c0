//! Attaches the standard indicator set to a validated series.

use super::{Indicator, LogReturns, Returns, Rsi, Sma, Volatility};
use crate::domain::{EnrichedRecord, OhlcvRecord};

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const VOLATILITY_WINDOW: usize = 20;
pub const RSI_PERIOD: usize = 14;
/// Trading days per year used to annualize volatility.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Compute `sma_20`, `sma_50`, `returns`, `log_returns`, `volatility_20` and
/// `rsi` for every record. The input is left untouched.
pub fn add_indicators(records: &[OhlcvRecord]) -> Vec<EnrichedRecord> {
    tracing::info!(rows = records.len(), "adding technical indicators");

    let sma_short = Sma::new(SMA_SHORT_PERIOD).compute(records);
    let sma_long = Sma::new(SMA_LONG_PERIOD).compute(records);
    let returns = Returns.compute(records);
    let log_returns = LogReturns.compute(records);
    let volatility = Volatility::new(VOLATILITY_WINDOW, TRADING_DAYS_PER_YEAR).compute(records);
    let rsi = Rsi::new(RSI_PERIOD).compute(records);

    let enriched: Vec<EnrichedRecord> = records
        .iter()
        .enumerate()
        .map(|(i, record)| EnrichedRecord {
            record: record.clone(),
            sma_20: sma_short[i],
            sma_50: sma_long[i],
            returns: returns[i],
            log_returns: log_returns[i],
            volatility_20: volatility[i],
            rsi: rsi[i],
        })
        .collect();

    tracing::debug!(
        rows = enriched.len(),
        columns = 7 + EnrichedRecord::INDICATOR_FIELDS.len(),
        "indicators added"
    );
    enriched
}
