//! Core data structures for event analysis.
//!
//! Defines the analysis result handed to presentation code, the chart
//! series and ordered mappings it is built from, the column feature flags
//! and the diagnostics collected along the way.

use crate::constants::{DATE_OUTPUT_FORMAT, NOT_AVAILABLE, stat_labels};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Parallel label/count sequences consumed by a charting component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

impl ChartSeries {
    /// Build a series from ordered (label, count) pairs
    pub fn from_counts(counts: impl IntoIterator<Item = (String, usize)>) -> Self {
        let (labels, data) = counts.into_iter().unzip();
        Self { labels, data }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Iterate over (label, count) pairs in chart order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }
}

/// Earliest and latest valid event date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Span { start: NaiveDate, end: NaiveDate },
    NotAvailable,
}

impl DateRange {
    /// Range covering every date in the iterator, or `NotAvailable` when empty
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for date in dates {
            bounds = Some(match bounds {
                Some((start, end)) => (start.min(date), end.max(date)),
                None => (date, date),
            });
        }

        match bounds {
            Some((start, end)) => DateRange::Span { start, end },
            None => DateRange::NotAvailable,
        }
    }

    /// Both endpoints as `YYYY-MM-DD` strings, or the `N/A` sentinel pair
    pub fn as_pair(&self) -> (String, String) {
        match self {
            DateRange::Span { start, end } => (
                start.format(DATE_OUTPUT_FORMAT).to_string(),
                end.format(DATE_OUTPUT_FORMAT).to_string(),
            ),
            DateRange::NotAvailable => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_pair().serialize(serializer)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.as_pair();
        write!(f, "{} to {}", start, end)
    }
}

/// A single value in the summary statistics table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Whole(v) => write!(f, "{}", v),
            StatValue::Decimal(v) => write!(f, "{:.2}", v),
            StatValue::Text(v) => f.write_str(v),
        }
    }
}

/// Summary statistics keyed by label, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    entries: Vec<(String, StatValue)>,
}

impl SummaryStats {
    /// The informational entry used when no numeric column qualified
    pub fn placeholder() -> Self {
        Self {
            entries: vec![(
                stat_labels::INFO.to_string(),
                StatValue::Text(stat_labels::NO_NUMERIC_COLUMNS.to_string()),
            )],
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: StatValue) {
        self.entries.push((label.into(), value));
    }

    pub fn get(&self, label: &str) -> Option<&StatValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the table only carries the informational placeholder
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl Serialize for SummaryStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, value)| (name, value)))
    }
}

/// Most frequent event types with their counts, most frequent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopCategories {
    entries: Vec<(String, usize)>,
}

impl TopCategories {
    /// Keep the first `limit` entries of an already ordered distribution
    pub fn from_distribution(series: &ChartSeries, limit: usize) -> Self {
        Self {
            entries: series
                .iter()
                .take(limit)
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
        }
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TopCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, count)| (name, count)))
    }
}

/// Complete output of one analysis call. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub total_events: usize,
    pub date_range: DateRange,
    pub type_counts_chart: ChartSeries,
    pub location_counts_chart: ChartSeries,
    pub monthly_counts_chart: ChartSeries,
    pub summary_stats: SummaryStats,
    pub top_event_types: TopCategories,
}

/// Which optional columns are usable, computed once per dataset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnFeatures {
    pub has_type: bool,
    pub has_location: bool,
    /// Present and every non-null value numeric
    pub has_attendance: bool,
    /// Present and every non-null value numeric
    pub has_duration: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Non-fatal data-quality message produced during analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Result plus the diagnostics and feature flags that shaped it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub diagnostics: Vec<Diagnostic>,
    pub features: ColumnFeatures,
}

impl AnalysisOutcome {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_from_unordered_dates() {
        let range = DateRange::from_dates([date(2024, 3, 1), date(2023, 12, 31), date(2024, 1, 15)]);
        assert_eq!(
            range.as_pair(),
            ("2023-12-31".to_string(), "2024-03-01".to_string())
        );
    }

    #[test]
    fn test_date_range_without_dates_is_sentinel() {
        let range = DateRange::from_dates(std::iter::empty());
        assert_eq!(range, DateRange::NotAvailable);
        assert_eq!(range.as_pair(), ("N/A".to_string(), "N/A".to_string()));
    }

    #[test]
    fn test_date_range_serializes_as_pair() {
        let json = serde_json::to_string(&DateRange::NotAvailable).unwrap();
        assert_eq!(json, r#"["N/A","N/A"]"#);
    }

    #[test]
    fn test_summary_stats_preserve_insertion_order_in_json() {
        let mut stats = SummaryStats::default();
        stats.push("Total Attendance", StatValue::Whole(60));
        stats.push("Average Attendance", StatValue::Decimal(20.5));

        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"Total Attendance":60,"Average Attendance":20.5}"#);
    }

    #[test]
    fn test_placeholder_summary() {
        let stats = SummaryStats::placeholder();
        assert!(stats.is_placeholder());
        assert_eq!(
            stats.get("Info"),
            Some(&StatValue::Text(
                "No numeric attendance or duration columns found.".to_string()
            ))
        );
    }

    #[test]
    fn test_top_categories_truncate_distribution() {
        let series = ChartSeries::from_counts(
            ["a", "b", "c"]
                .iter()
                .zip([5, 3, 1])
                .map(|(l, c)| (l.to_string(), c)),
        );
        let top = TopCategories::from_distribution(&series, 2);
        assert_eq!(top.labels(), vec!["a", "b"]);
        assert_eq!(top.get("c"), None);
        assert_eq!(serde_json::to_string(&top).unwrap(), r#"{"a":5,"b":3}"#);
    }

    #[test]
    fn test_stat_value_display() {
        assert_eq!(StatValue::Whole(42).to_string(), "42");
        assert_eq!(StatValue::Decimal(2.5).to_string(), "2.50");
    }
}
