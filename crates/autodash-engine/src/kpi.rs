//! Headline metrics over the filtered rows.

use crate::charts::column_total;
use crate::types::{ColumnKind, KpiSet, Schema, Table};

/// Computes the [`KpiSet`] shown above the charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct KpiAggregator;

impl KpiAggregator {
    /// Compute metrics for `table`, which holds the rows left after filtering.
    ///
    /// The primary and secondary measures are the first two numeric columns
    /// and the category is the first categorical column. A measure whose
    /// column is missing reports `None`; one whose column exists but has no
    /// remaining rows reports `Some(0.0)`. The average is rounded to the
    /// nearest integer with halves away from zero (`-2.5` becomes `-3`).
    pub fn compute(table: &Table, schema: &Schema) -> KpiSet {
        let row_count = table.row_count();
        let primary = schema.first_of(ColumnKind::Numeric);
        let secondary = schema.nth_of(ColumnKind::Numeric, 1);
        let category = schema.first_of(ColumnKind::Categorical);

        let primary_total = primary.map(|name| column_total(table, name));
        let secondary_total = secondary.map(|name| column_total(table, name));

        let avg_primary = match primary_total {
            Some(total) if row_count > 0 => Some((total / row_count as f64).round()),
            _ => None,
        };

        let (top_label, top_value) = primary
            .and_then(|name| top_row(table, name, category))
            .map_or((None, None), |(label, value)| (Some(label), Some(value)));

        KpiSet {
            primary_label: primary.map(str::to_string),
            primary_total,
            secondary_label: secondary.map(str::to_string),
            secondary_total,
            avg_primary,
            top_label,
            top_value,
            row_count,
        }
    }
}

/// Label and value of the row with the largest numeric primary cell.
///
/// Ties keep the earliest row.
fn top_row(table: &Table, primary: &str, category: Option<&str>) -> Option<(String, f64)> {
    let primary_idx = table.column_index(primary)?;
    let label_idx = category.and_then(|c| table.column_index(c)).unwrap_or(0);

    let mut best: Option<(usize, f64)> = None;
    for (i, row) in table.rows.iter().enumerate() {
        let Some(value) = row.get(primary_idx).as_f64() else {
            continue;
        };
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((i, value));
        }
    }

    let (i, value) = best?;
    Some((table.rows[i].get(label_idx).display_string(), value))
}
