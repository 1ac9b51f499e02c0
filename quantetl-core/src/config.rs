//! Pipeline configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file is a valid config. CLI flags
//! are applied on top by the binary.

use crate::data::{OutputFormat, SourceType, SyntheticApiExtractor};
use crate::error::ConfigError;
use crate::resample::Frequency;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    pub pipeline: PipelineConfig,
    pub api: ApiConfig,
}

/// What to run: source, destination and optional stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub source_type: SourceType,
    /// File path for `csv`/`json`, symbol for `api`.
    pub source: String,
    pub output: PathBuf,
    pub output_format: OutputFormat,
    pub add_indicators: bool,
    pub resample: Option<Frequency>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_type: SourceType::Api,
            source: "BTCUSD".to_string(),
            output: PathBuf::from("output_data.csv"),
            output_format: OutputFormat::Csv,
            add_indicators: true,
            resample: None,
        }
    }
}

/// Synthetic market-data API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub days: usize,
    pub seed: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            days: crate::data::synthetic::DEFAULT_DAYS,
            seed: None,
        }
    }
}

impl ApiConfig {
    /// Build the synthetic extractor these settings describe.
    pub fn extractor(&self) -> SyntheticApiExtractor {
        let api = SyntheticApiExtractor::new().with_days(self.days);
        match self.seed {
            Some(seed) => api.with_seed(seed),
            None => api,
        }
    }
}

impl EtlConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfig(format!("read config file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidConfig(format!("parse TOML: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidConfig(format!("serialize config: {e}")))
    }
}
