//! Numeric column detection and summary statistics.
//!
//! A column only counts as numeric when every non-null value parses as a
//! number. A single stray text value excludes the whole column rather than
//! computing statistics over the rows that happened to parse.

use crate::constants::{STAT_DECIMALS, stat_labels};
use crate::loader::RawDataset;
use crate::models::{StatValue, SummaryStats};
use polars::prelude::*;

/// What a numeric column turned out to contain
#[derive(Debug, Clone)]
pub enum NumericColumn {
    Absent,
    /// Present, but `offending` values could not be read as numbers
    NonNumeric { offending: usize },
    /// Present, but with no values at all
    Blank,
    Numeric(Float64Chunked),
}

impl NumericColumn {
    pub fn is_numeric(&self) -> bool {
        matches!(self, NumericColumn::Numeric(_))
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Classify a column and, when it is fully numeric, materialize it as f64
pub fn numeric_column(dataset: &RawDataset, column: &str) -> PolarsResult<NumericColumn> {
    let Some(values) = dataset.text_column(column)? else {
        return Ok(NumericColumn::Absent);
    };

    let mut offending = 0;
    let parsed: Float64Chunked = (&values)
        .into_iter()
        .map(|value| {
            let value = value.filter(|v| !v.trim().is_empty())?;
            match parse_number(value) {
                // NaN literals count as missing
                Some(number) if number.is_nan() => None,
                Some(number) if number.is_finite() => Some(number),
                _ => {
                    offending += 1;
                    None
                }
            }
        })
        .collect();

    if offending > 0 {
        return Ok(NumericColumn::NonNumeric { offending });
    }
    if parsed.null_count() == parsed.len() {
        return Ok(NumericColumn::Blank);
    }
    Ok(NumericColumn::Numeric(parsed.with_name(column.into())))
}

/// Round half away from zero to the configured number of decimals
pub fn round_decimals(value: f64) -> f64 {
    let factor = 10f64.powi(STAT_DECIMALS);
    (value * factor).round() / factor
}

/// Integral part of a statistic, as shown for whole-number rows
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

/// Build the summary table from whichever columns are numeric
pub fn summarize(attendance: &NumericColumn, duration: &NumericColumn) -> SummaryStats {
    let mut stats = SummaryStats::default();

    if let NumericColumn::Numeric(values) = attendance {
        if let Some(mean) = values.mean() {
            stats.push(
                stat_labels::AVERAGE_ATTENDANCE,
                StatValue::Decimal(round_decimals(mean)),
            );
        }
        if let Some(median) = values.median() {
            stats.push(stat_labels::MEDIAN_ATTENDANCE, StatValue::Whole(whole(median)));
        }
        if let Some(total) = values.sum() {
            stats.push(stat_labels::TOTAL_ATTENDANCE, StatValue::Whole(whole(total)));
        }
    }

    if let NumericColumn::Numeric(values) = duration {
        if let Some(mean) = values.mean() {
            stats.push(
                stat_labels::AVERAGE_DURATION,
                StatValue::Decimal(round_decimals(mean)),
            );
        }
        if let Some(median) = values.median() {
            stats.push(
                stat_labels::MEDIAN_DURATION,
                StatValue::Decimal(round_decimals(median)),
            );
        }
    }

    if stats.is_empty() {
        SummaryStats::placeholder()
    } else {
        stats
    }
}
