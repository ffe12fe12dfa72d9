//! Frequency distributions for categorical and monthly chart series.

use crate::loader::RawDataset;
use crate::models::ChartSeries;
use polars::prelude::PolarsResult;
use std::collections::{BTreeMap, HashMap};

/// Count occurrences of each non-null value, most frequent first.
///
/// Values with equal counts keep the order in which they first appeared,
/// so the output depends only on the input sequence.
pub fn frequency_counts<'a>(
    values: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<(String, usize)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for value in values.into_iter().flatten() {
        match positions.get(value) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

/// Distribution of a categorical column; empty when the column is absent
pub fn categorical_distribution(dataset: &RawDataset, column: &str) -> PolarsResult<ChartSeries> {
    let Some(values) = dataset.text_column(column)? else {
        return Ok(ChartSeries::default());
    };
    Ok(ChartSeries::from_counts(frequency_counts(&values)))
}

/// Events per `YYYY-MM` bucket in ascending label order, nulls excluded
pub fn monthly_distribution(months: &[Option<String>]) -> ChartSeries {
    let mut buckets: BTreeMap<&str, usize> = BTreeMap::new();
    for month in months.iter().flatten() {
        *buckets.entry(month.as_str()).or_insert(0) += 1;
    }

    ChartSeries::from_counts(
        buckets
            .into_iter()
            .map(|(label, count)| (label.to_string(), count)),
    )
}
