//! Event Analyzer Library
//!
//! Summarizes a CSV file of event records into chart-ready distributions and
//! a small table of summary statistics.
//!
//! This library provides tools for:
//! - Loading CSV data with every column kept as raw text
//! - Normalizing event dates across common formats
//! - Counting events by type, location and calendar month
//! - Computing attendance and duration statistics when those columns are numeric
//! - Reporting missing or unusable columns as diagnostics instead of errors
//! - Rendering results as a terminal summary or JSON chart payloads

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod loader;
pub mod models;
pub mod processor;
pub mod report;
pub mod temporal;

// Re-export commonly used types
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, IntakeError, LoadError, Result};
pub use models::{
    AnalysisOutcome, AnalysisResult, ChartSeries, ColumnFeatures, DateRange, Diagnostic,
    Severity, StatValue, SummaryStats, TopCategories,
};
pub use processor::{EventAnalyzer, analyze};
