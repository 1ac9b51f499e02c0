//! Extractor trait and source type selection.
//!
//! Extractors abstract over where raw records come from (delimited text,
//! JSON documents, the synthetic market-data API) so the pipeline can swap
//! implementations and tests can inject fakes.

use crate::domain::OhlcvRecord;
use crate::error::{ConfigError, ExtractError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported source kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Csv,
    Json,
    Api,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [SourceType::Csv, SourceType::Json, SourceType::Api];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Csv => "csv",
            SourceType::Json => "json",
            SourceType::Api => "api",
        }
    }
}

impl FromStr for SourceType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(SourceType::Csv),
            "json" => Ok(SourceType::Json),
            "api" => Ok(SourceType::Api),
            other => Err(ConfigError::UnknownSourceType(other.to_string())),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source of raw OHLCV records.
///
/// Implementations report failures through `try_extract`. The pipeline
/// calls `extract`, which never fails: errors are logged and surface as an
/// empty series.
pub trait Extractor: Send + Sync {
    /// Human-readable name of this extractor.
    fn name(&self) -> &str;

    /// Read all records from `locator`.
    fn try_extract(&self, locator: &str) -> Result<Vec<OhlcvRecord>, ExtractError>;

    /// Read all records from `locator`, or an empty series on failure.
    fn extract(&self, locator: &str) -> Vec<OhlcvRecord> {
        tracing::info!(extractor = self.name(), locator, "extracting data");
        match self.try_extract(locator) {
            Ok(records) => {
                tracing::info!(rows = records.len(), "extracted");
                records
            }
            Err(e) => {
                tracing::error!(extractor = self.name(), locator, error = %e, "extraction failed");
                Vec::new()
            }
        }
    }
}
