//! Presentation of analysis results.
//!
//! Serializes the chart series for a charting component and renders the
//! summary table for the terminal. Nothing here computes statistics; values
//! are shown exactly as the engine produced them.

use crate::error::Result;
use crate::models::{AnalysisOutcome, AnalysisResult, ChartSeries, Diagnostic, Severity};
use colored::*;
use serde::Serialize;
use std::path::Path;

const BAR_WIDTH: usize = 30;
const LABEL_WIDTH: usize = 26;

/// The three chart series, keyed the way the chart front-end expects them
#[derive(Debug, Serialize)]
pub struct ChartPayloads<'a> {
    pub type_counts: &'a ChartSeries,
    pub location_counts: &'a ChartSeries,
    pub monthly_counts: &'a ChartSeries,
}

impl<'a> ChartPayloads<'a> {
    pub fn from_result(result: &'a AnalysisResult) -> Self {
        Self {
            type_counts: &result.type_counts_chart,
            location_counts: &result.location_counts_chart,
            monthly_counts: &result.monthly_counts_chart,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Full outcome (result, diagnostics, feature flags) as pretty JSON
pub fn outcome_json(outcome: &AnalysisOutcome) -> Result<String> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Write rendered output to a file
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&format!("{}\n", title.bright_yellow().bold()));
}

fn row(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<width$} {}\n", label, value, width = LABEL_WIDTH)
}

fn render_series(out: &mut String, series: &ChartSeries, empty_message: &str) {
    if series.is_empty() {
        out.push_str(&format!("  {}\n", empty_message.bright_black()));
        return;
    }

    let max = series.data.iter().copied().max().unwrap_or(1).max(1);
    for (label, count) in series.iter() {
        let bar_len = (count * BAR_WIDTH).div_ceil(max);
        out.push_str(&row(
            label,
            format!(
                "{} {}",
                "#".repeat(bar_len).bright_blue(),
                count.to_string().bright_white()
            ),
        ));
    }
}

/// Terminal summary: totals, date range, statistics, top types and chart series
pub fn render_summary(file_name: &str, result: &AnalysisResult) -> String {
    let (start, end) = result.date_range.as_pair();
    let mut out = format!(
        "{} {}\n  {} {}\n  {} {} to {}\n",
        "Event Analysis:".bright_green().bold(),
        file_name.bright_white(),
        "Total events:".bright_cyan(),
        result.total_events.to_string().bright_white().bold(),
        "Date range:".bright_cyan(),
        start,
        end
    );

    section(&mut out, "Summary Statistics");
    for (name, value) in result.summary_stats.iter() {
        out.push_str(&row(name, value));
    }

    section(&mut out, "Top Event Types");
    if result.top_event_types.is_empty() {
        out.push_str(&format!("  {}\n", "No event type data found.".bright_black()));
    }
    for (label, count) in result.top_event_types.iter() {
        out.push_str(&row(label, count));
    }

    section(&mut out, "Events by Type");
    render_series(
        &mut out,
        &result.type_counts_chart,
        "No event type data found to display chart.",
    );

    section(&mut out, "Events by Location");
    render_series(
        &mut out,
        &result.location_counts_chart,
        "No location data found to display chart.",
    );

    section(&mut out, "Events per Month");
    render_series(
        &mut out,
        &result.monthly_counts_chart,
        "No monthly data found to display chart.",
    );

    out
}

/// One line per diagnostic, warnings highlighted
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|diagnostic| {
            let tag = match diagnostic.severity {
                Severity::Warning => "Warning:".yellow().bold(),
                Severity::Info => "Info:".bright_black(),
            };
            format!("{} {}\n", tag, diagnostic.message)
        })
        .collect()
}
