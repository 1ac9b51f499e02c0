//! JSON extractor: a top-level array of row objects.

use super::extract::Extractor;
use super::timestamp::{from_epoch_millis, parse_timestamp};
use crate::domain::OhlcvRecord;
use crate::error::ExtractError;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

/// Timestamps arrive either as text or as epoch milliseconds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

/// One row as written in the document. Absent and `null` numbers are void.
#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: RawTimestamp,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<OhlcvRecord, ExtractError> {
        let timestamp = match self.timestamp {
            RawTimestamp::Millis(ms) => from_epoch_millis(ms).ok_or_else(|| {
                ExtractError::InvalidTimestamp {
                    row,
                    value: ms.to_string(),
                }
            })?,
            RawTimestamp::Text(text) => {
                parse_timestamp(&text).ok_or(ExtractError::InvalidTimestamp { row, value: text })?
            }
        };
        let void = |v: Option<f64>| v.unwrap_or(f64::NAN);
        Ok(OhlcvRecord {
            timestamp,
            symbol: self.symbol,
            open: void(self.open),
            high: void(self.high),
            low: void(self.low),
            close: void(self.close),
            volume: void(self.volume),
        })
    }
}

/// Reads OHLCV records from a records-oriented JSON file.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for JsonExtractor {
    fn name(&self) -> &str {
        "json"
    }

    fn try_extract(&self, locator: &str) -> Result<Vec<OhlcvRecord>, ExtractError> {
        let reader = BufReader::new(File::open(locator)?);
        let rows: Vec<RawRow> = serde_json::from_reader(reader)?;
        rows.into_iter()
            .enumerate()
            .map(|(row, raw)| raw.into_record(row))
            .collect()
    }
}
