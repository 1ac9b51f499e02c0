//! QuantETL Core: extract, validate, enrich, resample and load daily OHLCV series.
//!
//! This crate contains the whole pipeline:
//! - Record model (raw, enriched, typed stage frames) and quality report
//! - Ordered data-quality rules with corrective row removal
//! - Rolling-window indicators (SMA, returns, volatility, RSI)
//! - Calendar resampling (daily through yearly)
//! - CSV / JSON / synthetic-API extractors and Parquet / CSV / JSON loaders
//! - The orchestrator that sequences the stages and owns the report

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod pipeline;
pub mod resample;
pub mod validation;

pub use config::EtlConfig;
pub use data::{OutputFormat, SourceType};
pub use domain::{EnrichedRecord, Frame, OhlcvRecord, QualityReportEntry};
pub use error::{ConfigError, EtlError, ExtractError, LoadError};
pub use pipeline::{EtlPipeline, RunOutcome};
pub use resample::Frequency;
