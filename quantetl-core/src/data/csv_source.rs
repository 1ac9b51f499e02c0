//! Delimited-text extractor.
//!
//! Expects a header row. Columns are matched by name, so order does not
//! matter and extra columns are ignored. Required: `timestamp`, `open`,
//! `high`, `low`, `close`, `volume`. Optional: `symbol`.

use super::extract::Extractor;
use super::timestamp::parse_timestamp;
use crate::domain::OhlcvRecord;
use crate::error::ExtractError;
use csv::StringRecord;

/// Reads OHLCV records from a CSV file.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }
}

/// Header positions of the columns we read.
struct ColumnMap {
    timestamp: usize,
    symbol: Option<usize>,
    numeric: [usize; 5],
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, ExtractError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require =
            |name: &str| find(name).ok_or_else(|| ExtractError::MissingColumn(name.to_string()));

        let mut numeric = [0; 5];
        for (slot, name) in numeric.iter_mut().zip(OhlcvRecord::NUMERIC_FIELDS) {
            *slot = require(name)?;
        }
        Ok(Self {
            timestamp: require("timestamp")?,
            symbol: find("symbol"),
            numeric,
        })
    }
}

impl Extractor for CsvExtractor {
    fn name(&self) -> &str {
        "csv"
    }

    fn try_extract(&self, locator: &str) -> Result<Vec<OhlcvRecord>, ExtractError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(locator)?;
        let columns = ColumnMap::from_headers(reader.headers()?)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let fields = result?;
            records.push(parse_row(&fields, &columns, row)?);
        }
        Ok(records)
    }
}

fn parse_row(
    fields: &StringRecord,
    columns: &ColumnMap,
    row: usize,
) -> Result<OhlcvRecord, ExtractError> {
    let raw_ts = fields.get(columns.timestamp).unwrap_or("");
    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| ExtractError::InvalidTimestamp {
        row,
        value: raw_ts.to_string(),
    })?;

    let symbol = columns
        .symbol
        .and_then(|i| fields.get(i))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let mut values = [f64::NAN; 5];
    for ((value, &idx), name) in values
        .iter_mut()
        .zip(&columns.numeric)
        .zip(OhlcvRecord::NUMERIC_FIELDS)
    {
        *value = parse_number(fields.get(idx).unwrap_or(""), row, name)?;
    }
    let [open, high, low, close, volume] = values;

    Ok(OhlcvRecord {
        timestamp,
        symbol,
        open,
        high,
        low,
        close,
        volume,
    })
}

/// Empty cells are void fields.
fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64, ExtractError> {
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| ExtractError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}
