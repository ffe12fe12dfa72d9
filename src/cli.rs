//! Command-line interface components.

use crate::config::AnalyzerConfig;
use crate::constants::DEFAULT_TOP_N;
use crate::error::{AnalyzerError, Result};
use crate::intake;
use crate::models::AnalysisOutcome;
use crate::processor::EventAnalyzer;
use crate::report::{self, ChartPayloads};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// How the analysis is presented
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Summary table and text charts
    #[default]
    Text,
    /// Full outcome: result, diagnostics and column features
    Json,
    /// Chart series only, as consumed by a charting front-end
    Charts,
}

#[derive(Parser, Debug)]
#[command(name = "event_analyzer")]
#[command(about = "Summarize a CSV file of event records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// CSV file to analyze
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of event types listed as top types
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Largest accepted upload, in megabytes
    #[arg(long, default_value_t = 16)]
    pub max_upload_mb: u64,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Build the analyzer configuration, with flags overriding defaults
    pub fn to_config(&self) -> AnalyzerConfig {
        AnalyzerConfig::default()
            .with_top_n(self.top_n)
            .with_max_upload_bytes(self.max_upload_mb.saturating_mul(BYTES_PER_MB))
    }
}

/// Set up structured logging on stderr. `RUST_LOG` takes precedence over flags.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("event_analyzer={}", log_level)));

    // try_init: a subscriber may already be installed when embedded
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Rendered output plus the outcome it came from
#[derive(Debug)]
pub struct Rendered {
    pub content: String,
    pub outcome: AnalysisOutcome,
}

/// Check the upload, analyze it and render it in the requested format
pub fn execute(args: &Args) -> Result<Rendered> {
    let config = args.to_config();
    config.validate()?;

    let upload = intake::check_upload(&args.input, &config.intake)?;
    info!(
        "Analyzing {} ({} bytes)",
        upload.file_name, upload.size_bytes
    );

    let outcome = EventAnalyzer::with_config(config).analyze_path(&upload.path)?;

    let content = match args.format {
        OutputFormat::Text => report::render_summary(&upload.file_name, &outcome.result),
        OutputFormat::Json => report::outcome_json(&outcome)?,
        OutputFormat::Charts => ChartPayloads::from_result(&outcome.result).to_json()?,
    };

    Ok(Rendered { content, outcome })
}

/// Run the command end to end, printing diagnostics and writing output
pub fn run(args: &Args) -> anyhow::Result<()> {
    let rendered = execute(args)?;

    if !args.quiet && !rendered.outcome.diagnostics.is_empty() {
        eprint!(
            "{}",
            report::render_diagnostics(&rendered.outcome.diagnostics)
        );
    }

    match &args.output {
        Some(path) => {
            report::write_output(path, &rendered.content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Wrote {:?} output to {}", args.format, path.display());
        }
        None => {
            print!("{}", rendered.content);
            if !rendered.content.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(())
}

/// User-facing text for a failed run
pub fn user_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<AnalyzerError>() {
        Some(AnalyzerError::Load(load)) => load.user_message(),
        _ => format!("{:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IntakeError, LoadError};
    use std::fs;
    use tempfile::TempDir;

    fn args_for(path: &std::path::Path, extra: &[&str]) -> Args {
        let mut argv = vec!["event_analyzer", path.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["event_analyzer", "events.csv"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.top_n, 5);
        assert_eq!(args.get_log_level(), "warn");

        let config = args.to_config();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.intake.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_log_levels() {
        let args = Args::try_parse_from(["event_analyzer", "e.csv", "-vv"]).unwrap();
        assert_eq!(args.get_log_level(), "debug");
        let args = Args::try_parse_from(["event_analyzer", "e.csv", "--quiet"]).unwrap();
        assert_eq!(args.get_log_level(), "error");
        assert!(Args::try_parse_from(["event_analyzer", "e.csv", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_execute_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.csv");
        fs::write(
            &path,
            "event_date,event_type,attendance\n2024-01-05,Concert,100\n2024-01-20,Concert,50\n2024-02-01,Workshop,30\n",
        )
        .unwrap();

        let rendered = execute(&args_for(&path, &["--format", "json", "--top-n", "1"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered.content).unwrap();

        assert_eq!(value["result"]["total_events"], serde_json::json!(3));
        assert_eq!(
            value["result"]["top_event_types"],
            serde_json::json!({"Concert": 2})
        );
        assert_eq!(rendered.outcome.result.top_event_types.len(), 1);
    }

    #[test]
    fn test_execute_charts_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.csv");
        fs::write(&path, "location\nHall\nHall\nPark\n").unwrap();

        let rendered = execute(&args_for(&path, &["-f", "charts"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered.content).unwrap();

        assert_eq!(
            value["location_counts"],
            serde_json::json!({"labels": ["Hall", "Park"], "data": [2, 1]})
        );
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_execute_rejects_wrong_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.json");
        fs::write(&path, "event_type\nTalk\n").unwrap();

        let error = execute(&args_for(&path, &[])).unwrap_err();
        assert!(matches!(
            error,
            AnalyzerError::Intake(IntakeError::InvalidExtension { .. })
        ));
    }

    #[test]
    fn test_execute_rejects_zero_top_n() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.csv");
        fs::write(&path, "event_type\nTalk\n").unwrap();

        let error = execute(&args_for(&path, &["--top-n", "0"])).unwrap_err();
        assert!(matches!(error, AnalyzerError::Configuration { .. }));
    }

    #[test]
    fn test_run_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.csv");
        let output = temp_dir.path().join("out.json");
        fs::write(&path, "event_type\nTalk\nTalk\n").unwrap();

        let args = args_for(
            &path,
            &["-q", "--format", "charts", "--output", output.to_str().unwrap()],
        );
        run(&args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["type_counts"]["data"], serde_json::json!([2]));
    }

    #[test]
    fn test_user_message_for_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events.csv");
        fs::write(&path, "event_date,event_type\n").unwrap();

        let error = run(&args_for(&path, &["-q"])).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<AnalyzerError>(),
            Some(AnalyzerError::Load(LoadError::Empty { .. }))
        ));
        assert_eq!(user_message(&error), "The uploaded CSV file is empty.");
    }
}
