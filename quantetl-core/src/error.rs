//! Structured error types for the pipeline.
//!
//! Configuration errors are fatal and surface before any work starts.
//! Extraction errors never reach the orchestrator: extractors log them and
//! hand back an empty series. Load errors propagate to the caller.

use thiserror::Error;

/// Invalid or unsupported configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown source type '{0}' (expected one of: csv, json, api)")]
    UnknownSourceType(String),

    #[error("unknown output format '{0}' (expected one of: parquet, csv, json)")]
    UnknownOutputFormat(String),

    #[error("unknown resample frequency '{0}' (expected one of: D, W, M, Q, A)")]
    UnknownFrequency(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Failure while reading a source. Swallowed by `Extractor::extract`.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Failure while persisting the final frame.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet I/O error: {0}")]
    Parquet(String),
}

/// Errors surfaced by `EtlPipeline::run`.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("load failed: {0}")]
    Load(#[from] LoadError),
}
