//! Analysis engine for uploaded event datasets.
//!
//! Orchestrates one analysis call: load the source, normalize dates, decide
//! once which optional columns are usable, then run each independent step
//! and assemble a fully populated [`AnalysisResult`]. Only load failures are
//! errors; every data-shape problem becomes a [`Diagnostic`].

pub mod distribution;
pub mod summary;

#[cfg(test)]
pub mod tests;

use self::distribution::{categorical_distribution, monthly_distribution};
use self::summary::{NumericColumn, numeric_column, summarize};

use crate::config::AnalyzerConfig;
use crate::constants::columns;
use crate::error::LoadError;
use crate::loader::{self, RawDataset};
use crate::models::{
    AnalysisOutcome, AnalysisResult, ChartSeries, ColumnFeatures, DateRange, Diagnostic,
    TopCategories,
};
use crate::temporal::{DateParser, TemporalColumn};

use polars::prelude::PolarsResult;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Feature flags plus the numeric columns they were derived from
struct FeatureProbe {
    features: ColumnFeatures,
    attendance: NumericColumn,
    duration: NumericColumn,
}

/// Run a step that may fail internally, substituting `fallback` on error
fn guarded<T>(
    step: &str,
    diagnostics: &mut Vec<Diagnostic>,
    fallback: T,
    run: impl FnOnce() -> PolarsResult<T>,
) -> T {
    match run() {
        Ok(value) => value,
        Err(e) => {
            warn!("{} failed: {}", step, e);
            diagnostics.push(Diagnostic::warning(format!(
                "{} could not be computed: {}",
                step, e
            )));
            fallback
        }
    }
}

/// Stateless analyzer holding only its configuration
#[derive(Debug, Clone)]
pub struct EventAnalyzer {
    config: AnalyzerConfig,
    date_parser: DateParser,
}

impl Default for EventAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let date_parser = DateParser::from_config(&config);
        Self {
            config,
            date_parser,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a CSV file on disk
    pub fn analyze_path(&self, path: &Path) -> Result<AnalysisOutcome, LoadError> {
        let dataset = loader::load_path(path)?;
        Ok(self.analyze_dataset(&dataset))
    }

    /// Analyze CSV content read from a stream
    pub fn analyze_reader(&self, reader: impl Read) -> Result<AnalysisOutcome, LoadError> {
        let dataset = loader::load_reader(reader)?;
        Ok(self.analyze_dataset(&dataset))
    }

    /// Analyze CSV content held in memory
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<AnalysisOutcome, LoadError> {
        let dataset = loader::load_bytes(bytes)?;
        Ok(self.analyze_dataset(&dataset))
    }

    /// Analyze an already loaded dataset. Never fails.
    pub fn analyze_dataset(&self, dataset: &RawDataset) -> AnalysisOutcome {
        let mut diagnostics = Vec::new();
        debug!(
            "Analyzing {} ({} rows)",
            dataset.source_name(),
            dataset.row_count()
        );

        let temporal = self.normalize_dates(dataset, &mut diagnostics);
        let probe = self.detect_features(dataset, &mut diagnostics);
        let features = probe.features;

        let date_range = DateRange::from_dates(temporal.valid_dates());

        let type_counts_chart = if features.has_type {
            guarded(
                "Event type distribution",
                &mut diagnostics,
                ChartSeries::default(),
                || categorical_distribution(dataset, columns::EVENT_TYPE),
            )
        } else {
            ChartSeries::default()
        };

        let location_counts_chart = if features.has_location {
            guarded(
                "Location distribution",
                &mut diagnostics,
                ChartSeries::default(),
                || categorical_distribution(dataset, columns::LOCATION),
            )
        } else {
            ChartSeries::default()
        };

        let monthly_counts_chart = monthly_distribution(&temporal.event_months());

        let summary_stats = summarize(&probe.attendance, &probe.duration);

        let top_event_types = if features.has_type {
            TopCategories::from_distribution(&type_counts_chart, self.config.top_n)
        } else {
            TopCategories::default()
        };

        let result = AnalysisResult {
            total_events: dataset.row_count(),
            date_range,
            type_counts_chart,
            location_counts_chart,
            monthly_counts_chart,
            summary_stats,
            top_event_types,
        };

        info!(
            "Analyzed {} events from {}: {} types, {} locations, {} months, {} diagnostics",
            result.total_events,
            dataset.source_name(),
            result.type_counts_chart.len(),
            result.location_counts_chart.len(),
            result.monthly_counts_chart.len(),
            diagnostics.len()
        );

        AnalysisOutcome {
            result,
            diagnostics,
            features,
        }
    }

    /// Parse `event_date` into per-row dates, recording why temporal analysis degraded
    fn normalize_dates(
        &self,
        dataset: &RawDataset,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> TemporalColumn {
        let row_count = dataset.row_count();

        let values = match dataset.text_column(columns::EVENT_DATE) {
            Ok(Some(values)) => values,
            Ok(None) => {
                warn!("'{}' column not found", columns::EVENT_DATE);
                diagnostics.push(Diagnostic::warning(format!(
                    "'{}' column not found. Temporal analysis skipped.",
                    columns::EVENT_DATE
                )));
                return TemporalColumn::missing(row_count);
            }
            Err(e) => {
                warn!("Could not read '{}': {}", columns::EVENT_DATE, e);
                diagnostics.push(Diagnostic::warning(format!(
                    "Could not parse '{}': {}. Temporal analysis may be incomplete.",
                    columns::EVENT_DATE,
                    e
                )));
                return TemporalColumn::missing(row_count);
            }
        };

        let temporal = TemporalColumn::parse(&values, &self.date_parser);

        if temporal.wholly_unparseable() {
            warn!(
                "None of the {} '{}' values could be parsed",
                temporal.non_null_count(),
                columns::EVENT_DATE
            );
            diagnostics.push(Diagnostic::warning(format!(
                "Could not parse any '{}' values. Temporal analysis may be incomplete.",
                columns::EVENT_DATE
            )));
        } else if temporal.unparsed_count() > 0 {
            debug!(
                "{} of {} '{}' values unparseable",
                temporal.unparsed_count(),
                temporal.non_null_count(),
                columns::EVENT_DATE
            );
            diagnostics.push(Diagnostic::warning(format!(
                "{} of {} '{}' values could not be parsed as dates and were ignored.",
                temporal.unparsed_count(),
                temporal.non_null_count(),
                columns::EVENT_DATE
            )));
        } else if temporal.non_null_count() == 0 {
            diagnostics.push(Diagnostic::info(format!(
                "'{}' column has no values. Temporal analysis skipped.",
                columns::EVENT_DATE
            )));
        }

        temporal
    }

    /// Decide once which optional columns later steps may use
    fn detect_features(
        &self,
        dataset: &RawDataset,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> FeatureProbe {
        for column in columns::RECOGNIZED {
            let repeats = dataset.duplicate_count(column);
            if repeats > 0 {
                debug!("'{}' repeated {} times in header", column, repeats);
                diagnostics.push(Diagnostic::info(format!(
                    "'{}' appears {} more time(s) in the header. Only the first occurrence is analyzed.",
                    column, repeats
                )));
            }
        }

        let has_type = dataset.has_column(columns::EVENT_TYPE);
        let has_location = dataset.has_column(columns::LOCATION);

        for (present, column) in [
            (has_type, columns::EVENT_TYPE),
            (has_location, columns::LOCATION),
        ] {
            if !present {
                diagnostics.push(Diagnostic::info(format!(
                    "'{}' column not found. Its distribution is empty.",
                    column
                )));
            }
        }

        let attendance = self.probe_numeric(dataset, columns::ATTENDANCE, diagnostics);
        let duration = self.probe_numeric(dataset, columns::DURATION_HOURS, diagnostics);

        let features = ColumnFeatures {
            has_type,
            has_location,
            has_attendance: attendance.is_numeric(),
            has_duration: duration.is_numeric(),
        };
        debug!("Column features: {:?}", features);

        FeatureProbe {
            features,
            attendance,
            duration,
        }
    }

    fn probe_numeric(
        &self,
        dataset: &RawDataset,
        column: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> NumericColumn {
        let probed = match numeric_column(dataset, column) {
            Ok(probed) => probed,
            Err(e) => {
                warn!("Could not inspect '{}': {}", column, e);
                diagnostics.push(Diagnostic::warning(format!(
                    "Could not inspect '{}': {}. Excluded from summary statistics.",
                    column, e
                )));
                return NumericColumn::Absent;
            }
        };

        match &probed {
            NumericColumn::Absent => diagnostics.push(Diagnostic::info(format!(
                "'{}' column not found. Excluded from summary statistics.",
                column
            ))),
            NumericColumn::NonNumeric { offending } => {
                warn!("'{}' has {} non-numeric values", column, offending);
                diagnostics.push(Diagnostic::warning(format!(
                    "'{}' contains {} non-numeric value(s). Excluded from summary statistics.",
                    column, offending
                )));
            }
            NumericColumn::Blank => diagnostics.push(Diagnostic::info(format!(
                "'{}' column has no values. Excluded from summary statistics.",
                column
            ))),
            NumericColumn::Numeric(_) => {}
        }

        probed
    }
}

/// Analyze a CSV file with the default configuration
pub fn analyze(path: &Path) -> Result<AnalysisOutcome, LoadError> {
    EventAnalyzer::new().analyze_path(path)
}
