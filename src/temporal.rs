//! Date parsing and monthly bucketing for the `event_date` column.
//!
//! Values are parsed one at a time. A value that matches none of the
//! accepted formats becomes null for that row only.

use crate::config::AnalyzerConfig;
use crate::constants::MONTH_OUTPUT_FORMAT;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::StringChunked;

/// Parses date-like strings against an ordered list of formats
#[derive(Debug, Clone)]
pub struct DateParser {
    date_formats: Vec<String>,
    datetime_formats: Vec<String>,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default())
    }
}

impl DateParser {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            date_formats: config.date_formats.clone(),
            datetime_formats: config.datetime_formats.clone(),
        }
    }

    /// Calendar date of `raw`, ignoring any time of day
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
            return Some(timestamp.date_naive());
        }

        self.date_formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .or_else(|| {
                self.datetime_formats.iter().find_map(|format| {
                    NaiveDateTime::parse_from_str(value, format)
                        .ok()
                        .map(|timestamp| timestamp.date())
                })
            })
    }
}

/// `YYYY-MM` bucket of a date
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_OUTPUT_FORMAT).to_string()
}

/// Per-row parse results for the date column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalColumn {
    dates: Vec<Option<NaiveDate>>,
    non_null: usize,
}

impl TemporalColumn {
    /// Every row null, used when the date column is absent
    pub fn missing(row_count: usize) -> Self {
        Self {
            dates: vec![None; row_count],
            non_null: 0,
        }
    }

    /// Parse every value of the raw date column
    pub fn parse(values: &StringChunked, parser: &DateParser) -> Self {
        let mut non_null = 0;
        let dates = values
            .into_iter()
            .map(|value| {
                let value = value?;
                if !value.trim().is_empty() {
                    non_null += 1;
                }
                parser.parse(value)
            })
            .collect();

        Self { dates, non_null }
    }

    /// Rows that held a value at all
    pub fn non_null_count(&self) -> usize {
        self.non_null
    }

    pub fn parsed_count(&self) -> usize {
        self.dates.iter().flatten().count()
    }

    /// Rows that held a value which could not be read as a date
    pub fn unparsed_count(&self) -> usize {
        self.non_null - self.parsed_count()
    }

    /// True when values existed but none could be parsed
    pub fn wholly_unparseable(&self) -> bool {
        self.non_null > 0 && self.parsed_count() == 0
    }

    pub fn valid_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().flatten().copied()
    }

    /// The derived `event_month` column, one entry per row
    pub fn event_months(&self) -> Vec<Option<String>> {
        self.dates.iter().map(|date| date.map(month_label)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parses_supported_formats() {
        let parser = DateParser::default();

        assert_eq!(parser.parse("2024-03-15"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("2024/03/15"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("03/15/2024"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("2024-03-15 18:30:00"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("2024-03-15T18:30"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("2024-03-15T18:30:00.250"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("2024-03-15T18:30:00+02:00"), ymd(2024, 3, 15));
        assert_eq!(parser.parse("  2024-03-15  "), ymd(2024, 3, 15));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let parser = DateParser::default();

        assert_eq!(parser.parse("not a date"), None);
        assert_eq!(parser.parse("2024-13-01"), None);
        assert_eq!(parser.parse("2023-02-29"), None);
        assert_eq!(parser.parse(""), None);
    }

    #[test]
    fn test_extra_format_from_config() {
        let config = AnalyzerConfig::default().with_date_format("%d.%m.%Y");
        let parser = DateParser::from_config(&config);
        assert_eq!(parser.parse("15.03.2024"), ymd(2024, 3, 15));
    }

    #[test]
    fn test_partial_failures_become_null() {
        let values = StringChunked::from_iter([
            Some("2024-01-10"),
            Some("garbage"),
            None,
            Some("2024-02-01"),
        ]);
        let column = TemporalColumn::parse(&values, &DateParser::default());

        assert_eq!(column.non_null_count(), 3);
        assert_eq!(column.parsed_count(), 2);
        assert_eq!(column.unparsed_count(), 1);
        assert!(!column.wholly_unparseable());
        assert_eq!(
            column.event_months(),
            vec![
                Some("2024-01".to_string()),
                None,
                None,
                Some("2024-02".to_string())
            ]
        );
    }

    #[test]
    fn test_wholly_unparseable_column() {
        let values = StringChunked::from_iter([Some("soon"), Some("later")]);
        let column = TemporalColumn::parse(&values, &DateParser::default());
        assert!(column.wholly_unparseable());
        assert_eq!(column.valid_dates().count(), 0);
    }

    #[test]
    fn test_missing_column_is_all_null() {
        let column = TemporalColumn::missing(3);
        assert_eq!(column.event_months(), vec![None, None, None]);
        assert!(!column.wholly_unparseable());
    }
}
