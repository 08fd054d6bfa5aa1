//! Aggregations feeding chart payloads.

use crate::types::Table;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Label used for rows whose group cell is blank.
pub const BLANK_LABEL: &str = "(blank)";

/// Sum `value_col` grouped by `group_col`, groups in first-appearance order.
///
/// Non-numeric cells contribute 0, so group sums add up to the column total.
pub fn sum_by_group(table: &Table, group_col: &str, value_col: &str) -> Vec<(String, f64)> {
    let (Some(g), Some(v)) = (table.column_index(group_col), table.column_index(value_col)) else {
        return Vec::new();
    };

    let mut order: Vec<(String, f64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let cell = row.get(g);
        let label = if cell.is_null() {
            BLANK_LABEL.to_string()
        } else {
            cell.display_string()
        };
        let value = row.get(v).as_f64().unwrap_or(0.0);

        match positions.get(&label) {
            Some(&idx) => order[idx].1 += value,
            None => {
                positions.insert(label.clone(), order.len());
                order.push((label, value));
            }
        }
    }

    order
}

/// Sum of the numeric cells of a column.
pub fn column_total(table: &Table, column: &str) -> f64 {
    table
        .column_values(column)
        .filter_map(|v| v.as_f64())
        .sum()
}

/// Rows where both columns are numeric, as `(x, y)` pairs in row order.
pub fn numeric_pairs(table: &Table, x_col: &str, y_col: &str) -> Vec<(f64, f64)> {
    let (Some(x), Some(y)) = (table.column_index(x_col), table.column_index(y_col)) else {
        return Vec::new();
    };

    table
        .rows
        .iter()
        .filter_map(|row| Some((row.get(x).as_f64()?, row.get(y).as_f64()?)))
        .collect()
}

/// Reorder time-series points chronologically when every label is a date.
///
/// Labels must all start with `YYYY-MM-DD` or be a bare year; otherwise the
/// first-appearance order is kept. The [`BLANK_LABEL`] group does not count
/// against this and goes last.
pub fn order_chronologically(points: &mut [(String, f64)]) {
    let keys: Option<Vec<Option<NaiveDate>>> = points
        .iter()
        .map(|(label, _)| match label.as_str() {
            BLANK_LABEL => Some(None),
            other => date_key(other).map(Some),
        })
        .collect();
    let Some(keys) = keys else {
        return;
    };

    // Blank keys sort after every date.
    let mut keyed: Vec<((bool, Option<NaiveDate>), (String, f64))> = keys
        .into_iter()
        .map(|key| (key.is_none(), key))
        .zip(points.iter().cloned())
        .collect();
    keyed.sort_by_key(|(key, _)| *key);

    for (slot, (_, point)) in points.iter_mut().zip(keyed) {
        *slot = point;
    }
}

fn date_key(label: &str) -> Option<NaiveDate> {
    if let Some(prefix) = label.get(..10)
        && let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
    {
        return Some(date);
    }

    if label.len() == 4
        && let Ok(year) = label.parse::<i32>()
    {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::coerce_table;
    use crate::parser::TabularParser;

    fn table(text: &str) -> Table {
        coerce_table(&TabularParser::new().parse(text))
    }

    #[test]
    fn test_sum_by_group_preserves_first_appearance() {
        let t = table("cat,val\nB,1\nA,2\nB,3\n,4\nA,x\n");
        let groups = sum_by_group(&t, "cat", "val");
        assert_eq!(
            groups,
            vec![
                ("B".to_string(), 4.0),
                ("A".to_string(), 2.0),
                (BLANK_LABEL.to_string(), 4.0),
            ]
        );
    }

    #[test]
    fn test_sum_by_group_unknown_column() {
        let t = table("cat,val\nA,1\n");
        assert!(sum_by_group(&t, "nope", "val").is_empty());
    }

    #[test]
    fn test_column_total_ignores_text() {
        let t = table("val\n1\n\"2,000\"\nn/a\n\n");
        assert_eq!(column_total(&t, "val"), 2001.0);
    }

    #[test]
    fn test_numeric_pairs_skip_partial_rows() {
        let t = table("x,y\n1,2\n3,\n5,6\n");
        assert_eq!(numeric_pairs(&t, "x", "y"), vec![(1.0, 2.0), (5.0, 6.0)]);
    }

    #[test]
    fn test_order_chronologically_dates() {
        let mut points = vec![
            ("2024-03-01".to_string(), 3.0),
            ("2024-01-01".to_string(), 1.0),
            ("2024-02-01T08:00".to_string(), 2.0),
        ];
        order_chronologically(&mut points);
        let labels: Vec<&str> = points.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-02-01T08:00", "2024-03-01"]);
    }

    #[test]
    fn test_order_chronologically_blank_goes_last() {
        let mut points = vec![
            ("2024-03-01".to_string(), 3.0),
            (BLANK_LABEL.to_string(), 9.0),
            ("2024-01-01".to_string(), 1.0),
        ];
        order_chronologically(&mut points);
        let labels: Vec<&str> = points.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-03-01", BLANK_LABEL]);
    }

    #[test]
    fn test_order_chronologically_keeps_order_for_mixed_labels() {
        let mut points = vec![("Q2 2023".to_string(), 1.0), ("2023-01-01".to_string(), 2.0)];
        order_chronologically(&mut points);
        assert_eq!(points[0].0, "Q2 2023");
    }
}
