//! Per-column profiles over a leading sample of rows.
//!
//! A compact schema description matching what the remote backend derives
//! from an upload. The CLI prints it for `autodash profile`.

use crate::parser::TabularParser;
use crate::types::{ColumnKind, Schema, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of distinct sample values kept per column.
const MAX_SAMPLES: usize = 5;

/// Distinct count at or below which a column is likely categorical.
const CATEGORICAL_UNIQUE_CAP: usize = 50;

/// Unique-to-total ratio below which a column is likely categorical.
const CATEGORICAL_UNIQUE_RATIO: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub unique_count: usize,
    /// Fraction of blank cells in the sample, rounded to 3 decimals.
    pub missing_pct: f64,
    pub samples: Vec<String>,
    pub likely_categorical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub sample_rows: usize,
    pub columns: Vec<ColumnProfile>,
    /// The sampled rows as CSV, header included.
    pub sample_csv: String,
}

/// Profile the first `sample_n` rows of a table.
///
/// Kinds come from the full-table schema; counts and samples come from the
/// sample. `likely_categorical` compares the sample's distinct count to the
/// full row count.
pub fn profile_columns(table: &Table, schema: &Schema, sample_n: usize) -> DatasetProfile {
    let total = table.row_count();
    let sample = table.with_rows(table.rows.iter().take(sample_n).cloned().collect());
    let sample_len = sample.row_count();

    let columns = table
        .columns
        .iter()
        .map(|name| {
            let mut seen = HashSet::new();
            let mut samples = Vec::new();
            let mut missing = 0usize;

            for value in sample.column_values(name) {
                if value.is_null() {
                    missing += 1;
                    continue;
                }
                let rendered = value.display_string();
                if seen.insert(rendered.clone()) && samples.len() < MAX_SAMPLES {
                    samples.push(rendered);
                }
            }

            let unique_count = seen.len();
            let missing_pct = if sample_len > 0 {
                round3(missing as f64 / sample_len as f64)
            } else {
                0.0
            };
            let likely_categorical = (unique_count as f64 / total.max(1) as f64)
                < CATEGORICAL_UNIQUE_RATIO
                || unique_count <= CATEGORICAL_UNIQUE_CAP;

            ColumnProfile {
                name: name.clone(),
                kind: schema.kind_of(name).unwrap_or(ColumnKind::Text),
                unique_count,
                missing_pct,
                samples,
                likely_categorical,
            }
        })
        .collect();

    DatasetProfile {
        row_count: total,
        sample_rows: sample_len,
        columns,
        sample_csv: TabularParser::new().serialize(&sample.to_raw()),
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::coerce_table;
    use crate::profiler::SchemaInferencer;

    fn table(text: &str) -> Table {
        coerce_table(&TabularParser::new().parse(text))
    }

    #[test]
    fn test_profile_counts_and_samples() {
        let table = table("city,sales\nOslo,10\nRome,\nOslo,30\nLima,40\n");
        let schema = SchemaInferencer::default().infer(&table);
        let profile = profile_columns(&table, &schema, 200);

        assert_eq!(profile.row_count, 4);
        assert_eq!(profile.sample_rows, 4);

        let city = &profile.columns[0];
        assert_eq!(city.kind, ColumnKind::Categorical);
        assert_eq!(city.unique_count, 3);
        assert_eq!(city.samples, vec!["Oslo", "Rome", "Lima"]);
        assert_eq!(city.missing_pct, 0.0);
        assert!(city.likely_categorical);

        let sales = &profile.columns[1];
        assert_eq!(sales.kind, ColumnKind::Numeric);
        assert_eq!(sales.missing_pct, 0.25);
        assert_eq!(sales.samples, vec!["10", "30", "40"]);
    }

    #[test]
    fn test_profile_sample_limit() {
        let table = table("n\n1\n2\n3\n4\n5\n6\n7\n");
        let schema = SchemaInferencer::default().infer(&table);
        let profile = profile_columns(&table, &schema, 3);

        assert_eq!(profile.row_count, 7);
        assert_eq!(profile.sample_rows, 3);
        assert_eq!(profile.columns[0].unique_count, 3);
        assert_eq!(profile.sample_csv, "n\n1\n2\n3\n");
    }

    #[test]
    fn test_profile_samples_capped_at_five() {
        let table = table("k\na\nb\nc\nd\ne\nf\ng\n");
        let schema = SchemaInferencer::default().infer(&table);
        let profile = profile_columns(&table, &schema, 200);
        assert_eq!(profile.columns[0].samples.len(), 5);
        assert_eq!(profile.columns[0].unique_count, 7);
    }
}
