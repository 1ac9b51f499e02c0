//! Frame: the typed output of the last pipeline stage that ran.

use super::record::{EnrichedRecord, OhlcvRecord};

/// Records as produced by a pipeline stage.
///
/// The variant fixes the column set written by the loader: resampled frames
/// carry only the five OHLCV aggregates, so symbol and indicator columns do
/// not survive resampling.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Validated(Vec<OhlcvRecord>),
    Enriched(Vec<EnrichedRecord>),
    Resampled(Vec<OhlcvRecord>),
}

const BASE_COLUMNS: [&str; 7] = [
    "timestamp",
    "symbol",
    "open",
    "high",
    "low",
    "close",
    "volume",
];

const RESAMPLED_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

impl Frame {
    /// Ordered column names for this frame.
    pub fn columns(&self) -> Vec<&'static str> {
        match self {
            Frame::Validated(_) => BASE_COLUMNS.to_vec(),
            Frame::Enriched(_) => BASE_COLUMNS
                .iter()
                .chain(EnrichedRecord::INDICATOR_FIELDS.iter())
                .copied()
                .collect(),
            Frame::Resampled(_) => RESAMPLED_COLUMNS.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frame::Validated(rows) | Frame::Resampled(rows) => rows.len(),
            Frame::Enriched(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The base OHLCV record at `index`, regardless of variant.
    pub fn record(&self, index: usize) -> Option<&OhlcvRecord> {
        match self {
            Frame::Validated(rows) | Frame::Resampled(rows) => rows.get(index),
            Frame::Enriched(rows) => rows.get(index).map(|r| &r.record),
        }
    }

    /// Derived fields at `index`; `None` for frames without indicators.
    pub fn indicators(&self, index: usize) -> Option<[Option<f64>; 6]> {
        match self {
            Frame::Enriched(rows) => rows.get(index).map(EnrichedRecord::indicator_fields),
            _ => None,
        }
    }

    pub fn has_symbol_column(&self) -> bool {
        !matches!(self, Frame::Resampled(_))
    }

    /// Lower-case stage name for logs and summaries.
    pub fn stage(&self) -> &'static str {
        match self {
            Frame::Validated(_) => "validated",
            Frame::Enriched(_) => "enriched",
            Frame::Resampled(_) => "resampled",
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::Validated(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resampled_columns_are_ohlcv_only() {
        let frame = Frame::Resampled(Vec::new());
        assert_eq!(
            frame.columns(),
            vec!["timestamp", "open", "high", "low", "close", "volume"]
        );
        assert!(!frame.has_symbol_column());
    }

    #[test]
    fn enriched_columns_append_indicators() {
        let columns = Frame::Enriched(Vec::new()).columns();
        assert_eq!(columns.len(), 13);
        assert_eq!(columns[0], "timestamp");
        assert_eq!(columns[7], "sma_20");
        assert_eq!(columns[12], "rsi");
    }

    #[test]
    fn default_frame_is_empty() {
        let frame = Frame::default();
        assert!(frame.is_empty());
        assert_eq!(frame.stage(), "validated");
        assert!(frame.record(0).is_none());
    }
}
