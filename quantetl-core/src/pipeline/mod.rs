//! Pipeline orchestrator.
//!
//! Sequences Extract → Validate → Indicators → Resample → Load and owns the
//! quality report accumulated across runs. One instance, one report list:
//! entries are appended and only go away with the instance.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use crate::data::{
    CsvExtractor, Extractor, FileLoader, JsonExtractor, Loader, OutputFormat, SourceType,
    SyntheticApiExtractor,
};
use crate::domain::{EnrichedRecord, Frame, OhlcvRecord, QualityReportEntry};
use crate::error::{ConfigError, EtlError};
use crate::indicators;
use crate::resample::{resample, Frequency};
use crate::validation::Validator;
use std::collections::HashMap;
use std::path::Path;

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    /// The frame handed to the loader.
    pub records: Frame,
    /// The indicator stage, kept when resampling replaced it in `records`.
    pub enriched: Option<Vec<EnrichedRecord>>,
}

impl RunOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indicator rows from this run, whether or not they were resampled away.
    pub fn enriched_records(&self) -> Option<&[EnrichedRecord]> {
        match &self.records {
            Frame::Enriched(rows) => Some(rows),
            _ => self.enriched.as_deref(),
        }
    }
}

/// The ETL pipeline.
pub struct EtlPipeline {
    output_format: OutputFormat,
    validator: Validator,
    clock: Box<dyn Clock>,
    extractors: HashMap<SourceType, Box<dyn Extractor>>,
    loader: Box<dyn Loader>,
    quality_reports: Vec<QualityReportEntry>,
}

impl EtlPipeline {
    /// A pipeline with the built-in extractors, the file loader and the
    /// system clock.
    pub fn new(output_format: OutputFormat) -> Self {
        let mut extractors: HashMap<SourceType, Box<dyn Extractor>> = HashMap::new();
        extractors.insert(SourceType::Csv, Box::new(CsvExtractor::new()));
        extractors.insert(SourceType::Json, Box::new(JsonExtractor::new()));
        extractors.insert(SourceType::Api, Box::new(SyntheticApiExtractor::new()));

        Self {
            output_format,
            validator: Validator::new(),
            clock: Box::new(SystemClock),
            extractors,
            loader: Box::new(FileLoader::new()),
            quality_reports: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the extractor used for `source`.
    pub fn with_extractor(mut self, source: SourceType, extractor: impl Extractor + 'static) -> Self {
        self.extractors.insert(source, Box::new(extractor));
        self
    }

    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Every report entry recorded by this instance, oldest first.
    pub fn quality_report(&self) -> &[QualityReportEntry] {
        &self.quality_reports
    }

    /// Validate `records` and append the report entry.
    pub fn validate(&mut self, records: Vec<OhlcvRecord>) -> Vec<OhlcvRecord> {
        let (cleaned, entry) = self.validator.validate(records, self.clock.now());
        self.quality_reports.push(entry);
        cleaned
    }

    /// Run the full pipeline.
    ///
    /// An unknown `source_type` fails before anything is extracted. An empty
    /// extraction ends the run early with an empty outcome and nothing
    /// written. Load failures propagate.
    pub fn run(
        &mut self,
        source_type: &str,
        source_locator: &str,
        output_locator: &Path,
        add_indicators: bool,
        resample_frequency: Option<Frequency>,
    ) -> Result<RunOutcome, EtlError> {
        let source: SourceType = source_type.parse()?;
        let span = tracing::info_span!("etl_run", source = %source, locator = source_locator);
        let _guard = span.enter();
        tracing::info!("starting ETL pipeline");

        let extractor = self
            .extractors
            .get(&source)
            .ok_or_else(|| ConfigError::UnknownSourceType(source_type.to_string()))?;
        let raw = extractor.extract(source_locator);
        if raw.is_empty() {
            tracing::error!("no data extracted");
            return Ok(RunOutcome::default());
        }

        let validated = self.validate(raw);

        let (records, enriched) = match (add_indicators, resample_frequency) {
            (true, Some(freq)) => {
                let enriched = indicators::add_indicators(&validated);
                (Frame::Resampled(resample(&enriched, freq)), Some(enriched))
            }
            (true, None) => (Frame::Enriched(indicators::add_indicators(&validated)), None),
            (false, Some(freq)) => (Frame::Resampled(resample(&validated, freq)), None),
            (false, None) => (Frame::Validated(validated), None),
        };

        self.loader
            .load(&records, output_locator, self.output_format)?;

        tracing::info!(
            rows = records.len(),
            stage = records.stage(),
            "ETL pipeline complete"
        );
        Ok(RunOutcome { records, enriched })
    }
}

impl Default for EtlPipeline {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}
