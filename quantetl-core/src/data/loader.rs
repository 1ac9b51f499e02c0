//! File loader: persists the final frame as Parquet, CSV or JSON.
//!
//! Features:
//! - Atomic writes (write to `.tmp`, rename into place)
//! - Row order preserved
//! - Column set fixed by the frame variant (`Frame::columns`)
//! - Void fields and undefined indicators written as empty cells / `null`

use super::timestamp::{to_epoch_millis, CSV_FORMAT, JSON_FORMAT};
use crate::domain::{Frame, OhlcvRecord};
use crate::error::{ConfigError, LoadError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// On-disk output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parquet" => Ok(OutputFormat::Parquet),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::UnknownOutputFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sink for the pipeline's final frame.
pub trait Loader: Send + Sync {
    fn load(&self, frame: &Frame, path: &Path, format: OutputFormat) -> Result<(), LoadError>;
}

/// Writes frames to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for FileLoader {
    fn load(&self, frame: &Frame, path: &Path, format: OutputFormat) -> Result<(), LoadError> {
        tracing::info!(path = %path.display(), %format, rows = frame.len(), "loading data");

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = tmp_path_for(path);
        let written = match format {
            OutputFormat::Parquet => write_parquet(frame, &tmp_path),
            OutputFormat::Csv => write_csv(frame, &tmp_path),
            OutputFormat::Json => write_json(frame, &tmp_path),
        };

        // Atomic rename
        let result = written.and_then(|()| fs::rename(&tmp_path, path).map_err(LoadError::from));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result?;

        tracing::info!(rows = frame.len(), "successfully loaded");
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

fn frame_records(frame: &Frame) -> impl Iterator<Item = &OhlcvRecord> + '_ {
    (0..frame.len()).filter_map(move |i| frame.record(i))
}

// ── CSV ─────────────────────────────────────────────────────────────

fn write_csv(frame: &Frame, path: &Path) -> Result<(), LoadError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(frame.columns())?;

    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for (i, record) in frame_records(frame).enumerate() {
        let mut row = Vec::with_capacity(frame.columns().len());
        row.push(record.timestamp.format(CSV_FORMAT).to_string());
        if frame.has_symbol_column() {
            row.push(record.symbol.clone().unwrap_or_default());
        }
        row.extend(record.numeric_fields().iter().map(|(_, v)| cell(defined(*v))));
        if let Some(indicators) = frame.indicators(i) {
            row.extend(indicators.into_iter().map(cell));
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

// ── JSON ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct IndicatorRow {
    sma_20: Option<f64>,
    sma_50: Option<f64>,
    returns: Option<f64>,
    log_returns: Option<f64>,
    volatility_20: Option<f64>,
    rsi: Option<f64>,
}

/// One output object. `symbol` is `None` when the frame has no symbol
/// column, `Some(None)` for a row without a symbol.
#[derive(Serialize)]
struct JsonRow<'a> {
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<Option<&'a str>>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    #[serde(flatten)]
    indicators: Option<IndicatorRow>,
}

fn write_json(frame: &Frame, path: &Path) -> Result<(), LoadError> {
    let rows: Vec<JsonRow<'_>> = frame_records(frame)
        .enumerate()
        .map(|(i, r)| JsonRow {
            timestamp: r.timestamp.format(JSON_FORMAT).to_string(),
            symbol: frame.has_symbol_column().then(|| r.symbol.as_deref()),
            open: defined(r.open),
            high: defined(r.high),
            low: defined(r.low),
            close: defined(r.close),
            volume: defined(r.volume),
            indicators: frame.indicators(i).map(
                |[sma_20, sma_50, returns, log_returns, volatility_20, rsi]| IndicatorRow {
                    sma_20,
                    sma_50,
                    returns,
                    log_returns,
                    volatility_20,
                    rsi,
                },
            ),
        })
        .collect();

    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer(&mut writer, &rows)?;
    writer.flush()?;
    Ok(())
}

// ── Parquet ─────────────────────────────────────────────────────────

/// Convert a frame to a Polars DataFrame with the frame's column set.
fn frame_to_dataframe(frame: &Frame) -> Result<DataFrame, LoadError> {
    let records: Vec<&OhlcvRecord> = frame_records(frame).collect();

    let millis: Vec<i64> = records.iter().map(|r| to_epoch_millis(r.timestamp)).collect();
    let mut columns = vec![Column::new("timestamp".into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
        .map_err(|e| LoadError::Parquet(format!("timestamp cast: {e}")))?];

    if frame.has_symbol_column() {
        let symbols: Vec<Option<&str>> = records.iter().map(|r| r.symbol.as_deref()).collect();
        columns.push(Column::new("symbol".into(), symbols));
    }

    for (idx, name) in OhlcvRecord::NUMERIC_FIELDS.iter().enumerate() {
        let values: Vec<Option<f64>> = records
            .iter()
            .map(|r| defined(r.numeric_fields()[idx].1))
            .collect();
        columns.push(Column::new((*name).into(), values));
    }

    if matches!(frame, Frame::Enriched(_)) {
        for (idx, name) in crate::domain::EnrichedRecord::INDICATOR_FIELDS.iter().enumerate() {
            let values: Vec<Option<f64>> = (0..frame.len())
                .map(|i| frame.indicators(i).and_then(|ind| ind[idx]))
                .collect();
            columns.push(Column::new((*name).into(), values));
        }
    }

    DataFrame::new(columns).map_err(|e| LoadError::Parquet(format!("dataframe creation: {e}")))
}

fn write_parquet(frame: &Frame, path: &Path) -> Result<(), LoadError> {
    let mut df = frame_to_dataframe(frame)?;
    let file = fs::File::create(path)?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| LoadError::Parquet(format!("write parquet: {e}")))?;
    Ok(())
}
