//! QuantETL CLI: run the OHLCV pipeline and inspect data quality.
//!
//! Commands:
//! - `run`: extract, validate, enrich, resample and write a series
//! - `validate`: extract and validate only, print the quality report

mod obs;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use quantetl_core::data::{CsvExtractor, Extractor, JsonExtractor};
use quantetl_core::{
    EtlConfig, EtlPipeline, Frame, Frequency, OutputFormat, QualityReportEntry, RunOutcome,
    SourceType,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "quantetl",
    about = "QuantETL CLI: financial OHLCV extract/transform/load pipeline"
)]
struct Cli {
    /// Log level or filter directive (overridden by QUANTETL_LOG).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format: text or json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

/// Source selection shared by both commands.
#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Path to a TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source type: csv, json or api.
    #[arg(long)]
    source_type: Option<String>,

    /// Source file path, or symbol for the api source.
    #[arg(long)]
    source: Option<String>,

    /// Number of daily bars generated by the api source.
    #[arg(long)]
    days: Option<usize>,

    /// Fixed RNG seed for the api source.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the result.
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: parquet, csv or json.
        #[arg(long)]
        format: Option<String>,

        /// Skip the indicator stage.
        #[arg(long, default_value_t = false)]
        no_indicators: bool,

        /// Resample to D, W, M, Q or A.
        #[arg(long)]
        resample: Option<String>,

        /// Write the quality report as JSON to this path.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Extract and validate only; print the quality report as JSON.
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    obs::init_tracing(&cli.log_level, &cli.log_format).map_err(|e| anyhow!(e))?;

    match cli.command {
        Commands::Run {
            source,
            output,
            format,
            no_indicators,
            resample,
            report,
        } => {
            let mut config = load_config(&source)?;
            apply_run_overrides(
                &mut config,
                output,
                format.as_deref(),
                no_indicators,
                resample.as_deref(),
            )?;
            let source_type = source
                .source_type
                .unwrap_or_else(|| config.pipeline.source_type.to_string());
            run_pipeline_cmd(&config, &source_type, report.as_deref())
        }
        Commands::Validate { source } => {
            let config = load_config(&source)?;
            let source_type = source
                .source_type
                .unwrap_or_else(|| config.pipeline.source_type.to_string());
            run_validate_cmd(&config, &source_type)
        }
    }
}

/// Config file (or defaults) with the source flags applied.
fn load_config(args: &SourceArgs) -> Result<EtlConfig> {
    let mut config = match &args.config {
        Some(path) => EtlConfig::from_file(path)?,
        None => EtlConfig::default(),
    };
    if let Some(source) = &args.source {
        config.pipeline.source = source.clone();
    }
    if let Some(days) = args.days {
        config.api.days = days;
    }
    if args.seed.is_some() {
        config.api.seed = args.seed;
    }
    Ok(config)
}

fn apply_run_overrides(
    config: &mut EtlConfig,
    output: Option<PathBuf>,
    format: Option<&str>,
    no_indicators: bool,
    resample: Option<&str>,
) -> Result<()> {
    if let Some(output) = output {
        config.pipeline.output = output;
    }
    if let Some(format) = format {
        config.pipeline.output_format = format.parse::<OutputFormat>()?;
    }
    if no_indicators {
        config.pipeline.add_indicators = false;
    }
    if let Some(freq) = resample {
        config.pipeline.resample = Some(freq.parse::<Frequency>()?);
    }
    Ok(())
}

fn run_pipeline_cmd(config: &EtlConfig, source_type: &str, report_path: Option<&Path>) -> Result<()> {
    tracing::debug!(?config, source_type, "resolved configuration");
    let pipeline_cfg = &config.pipeline;
    let mut etl = EtlPipeline::new(pipeline_cfg.output_format)
        .with_extractor(SourceType::Api, config.api.extractor());

    let outcome = etl.run(
        source_type,
        &pipeline_cfg.source,
        &pipeline_cfg.output,
        pipeline_cfg.add_indicators,
        pipeline_cfg.resample,
    )?;

    print_summary(&outcome, etl.quality_report());

    if let Some(path) = report_path {
        write_report(etl.quality_report(), path)?;
        println!("Quality report saved to: {}", path.display());
    }
    if !outcome.is_empty() {
        println!(
            "Output written to: {} ({})",
            pipeline_cfg.output.display(),
            pipeline_cfg.output_format
        );
    }
    Ok(())
}

fn run_validate_cmd(config: &EtlConfig, source_type: &str) -> Result<()> {
    let source: SourceType = source_type.parse()?;
    let extractor: Box<dyn Extractor> = match source {
        SourceType::Csv => Box::new(CsvExtractor::new()),
        SourceType::Json => Box::new(JsonExtractor::new()),
        SourceType::Api => Box::new(config.api.extractor()),
    };

    let records = extractor.extract(&config.pipeline.source);
    let mut etl = EtlPipeline::default();
    let cleaned = etl.validate(records);

    println!("{}", serde_json::to_string_pretty(etl.quality_report())?);
    println!("{} rows pass validation", cleaned.len());
    Ok(())
}

fn write_report(report: &[QualityReportEntry], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

const PREVIEW_ROWS: usize = 5;

fn print_summary(outcome: &RunOutcome, report: &[QualityReportEntry]) {
    let frame = &outcome.records;
    println!();
    println!("=== ETL Summary ===");
    println!("Processed {} rows ({})", frame.len(), frame.stage());
    println!("Columns: {}", frame.columns().join(", "));

    if !frame.is_empty() {
        println!();
        println!("First rows:");
        for i in 0..frame.len().min(PREVIEW_ROWS) {
            println!("  {}", format_row(frame, i));
        }
    }

    println!();
    println!("Quality report: {} checks performed", report.len());
    for entry in report {
        println!(
            "  {}: {} -> {} rows ({} removed)",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.initial_rows,
            entry.final_rows,
            entry.removed_rows
        );
        for issue in &entry.issues {
            println!("    - {issue}");
        }
    }
}

fn format_row(frame: &Frame, index: usize) -> String {
    let Some(record) = frame.record(index) else {
        return String::new();
    };
    let number = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |x| format!("{x:.4}"));

    let mut cells = vec![record.timestamp.format("%Y-%m-%d").to_string()];
    if frame.has_symbol_column() {
        cells.push(record.symbol.clone().unwrap_or_else(|| "-".to_string()));
    }
    cells.extend(
        record
            .numeric_fields()
            .iter()
            .map(|(_, v)| number((!v.is_nan()).then_some(*v))),
    );
    if let Some(indicators) = frame.indicators(index) {
        cells.extend(indicators.into_iter().map(number));
    }
    cells.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantetl_core::data::timestamp::parse_timestamp;
    use quantetl_core::OhlcvRecord;
    use tempfile::tempdir;

    #[test]
    fn flags_override_config() {
        let args = SourceArgs {
            source: Some("ETHUSD".into()),
            days: Some(30),
            seed: Some(9),
            ..SourceArgs::default()
        };
        let mut config = load_config(&args).unwrap();
        apply_run_overrides(
            &mut config,
            Some(PathBuf::from("out.json")),
            Some("json"),
            true,
            Some("M"),
        )
        .unwrap();

        assert_eq!(config.pipeline.source, "ETHUSD");
        assert_eq!(config.api.days, 30);
        assert_eq!(config.api.seed, Some(9));
        assert_eq!(config.pipeline.output_format, OutputFormat::Json);
        assert!(!config.pipeline.add_indicators);
        assert_eq!(config.pipeline.resample, Some(Frequency::Monthly));
    }

    #[test]
    fn bad_flags_are_rejected() {
        let mut config = EtlConfig::default();
        assert!(apply_run_overrides(&mut config, None, Some("xlsx"), false, None).is_err());
        assert!(apply_run_overrides(&mut config, None, None, false, Some("hourly")).is_err());
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("etl.toml");
        std::fs::write(&path, "[pipeline]\nsource = \"SPY\"\n[api]\ndays = 10\n").unwrap();
        let args = SourceArgs {
            config: Some(path),
            ..SourceArgs::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.pipeline.source, "SPY");
        assert_eq!(config.api.days, 10);
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut etl = EtlPipeline::default();
        etl.validate(Vec::new());
        write_report(etl.quality_report(), &path).unwrap();

        let parsed: Vec<QualityReportEntry> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].initial_rows, 0);
    }

    #[test]
    fn preview_row_marks_undefined_values() {
        let record = OhlcvRecord {
            timestamp: parse_timestamp("2024-01-02").unwrap(),
            symbol: None,
            open: 1.0,
            high: f64::NAN,
            low: 0.5,
            close: 1.0,
            volume: 10.0,
        };
        let row = format_row(&Frame::Validated(vec![record]), 0);
        assert_eq!(row, "2024-01-02  -  1.0000  -  0.5000  1.0000  10.0000");
    }
}
