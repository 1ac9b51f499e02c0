//! OhlcvRecord and EnrichedRecord: the row types flowing through the pipeline.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single timestamped OHLCV row.
///
/// A price or volume that was missing in the source is carried as `NaN`
/// (a "void" field). The validator reports void fields but does not remove
/// them; every comparison against `NaN` is false, so void fields never trip
/// the removal rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvRecord {
    pub timestamp: NaiveDateTime,
    pub symbol: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvRecord {
    /// Names of the numeric fields, in schema order.
    pub const NUMERIC_FIELDS: [&'static str; 5] = ["open", "high", "low", "close", "volume"];

    /// Numeric fields in schema order, paired with their names.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ]
    }

    /// Returns true if any numeric field is `NaN`.
    pub fn is_void(&self) -> bool {
        self.numeric_fields().iter().any(|(_, v)| v.is_nan())
    }

    /// OHLC consistency: high is the top of the bar, low is the bottom.
    ///
    /// Mirrors the removal rule exactly, so a void field counts as consistent.
    pub fn has_inverted_range(&self) -> bool {
        self.high < self.low
            || self.high < self.open
            || self.high < self.close
            || self.low > self.open
            || self.low > self.close
    }

    /// Close as an indicator input: `None` when the close is void or non-finite.
    pub fn close_value(&self) -> Option<f64> {
        self.close.is_finite().then_some(self.close)
    }
}

impl AsRef<OhlcvRecord> for OhlcvRecord {
    fn as_ref(&self) -> &OhlcvRecord {
        self
    }
}

/// An `OhlcvRecord` extended with derived indicator fields.
///
/// `None` marks an undefined value: a warm-up row, an undefined input, or an
/// indeterminate result such as RSI over a window with no price movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: OhlcvRecord,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub returns: Option<f64>,
    pub log_returns: Option<f64>,
    pub volatility_20: Option<f64>,
    pub rsi: Option<f64>,
}

impl EnrichedRecord {
    /// Names of the derived fields, in output order.
    pub const INDICATOR_FIELDS: [&'static str; 6] = [
        "sma_20",
        "sma_50",
        "returns",
        "log_returns",
        "volatility_20",
        "rsi",
    ];

    /// Wrap a record with every derived field undefined.
    pub fn undefined(record: OhlcvRecord) -> Self {
        Self {
            record,
            sma_20: None,
            sma_50: None,
            returns: None,
            log_returns: None,
            volatility_20: None,
            rsi: None,
        }
    }

    /// Derived fields in output order.
    pub fn indicator_fields(&self) -> [Option<f64>; 6] {
        [
            self.sma_20,
            self.sma_50,
            self.returns,
            self.log_returns,
            self.volatility_20,
            self.rsi,
        ]
    }
}

impl AsRef<OhlcvRecord> for EnrichedRecord {
    fn as_ref(&self) -> &OhlcvRecord {
        &self.record
    }
}
