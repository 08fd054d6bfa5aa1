//! Row filtering.
//!
//! A [`FilterSet`] maps column names to optional [`Predicate`]s. Active
//! predicates combine by logical AND; `None` entries impose no constraint.
//! Filtering never reorders rows.

mod coercion;

pub use coercion::{coerce_table, coerce_value};

use crate::error::{DashboardError, Result};
use crate::types::{Row, Table, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// A per-column constraint.
///
/// Deserializes from the UI shapes: an array of strings (multi-select), an
/// object with `min`/`max`, or a plain string (substring search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    /// The cell's display string is one of the selected values.
    /// An empty selection matches everything.
    Membership(BTreeSet<String>),
    /// The cell is a number within the inclusive bounds. A missing bound is open.
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// Case-insensitive containment on the cell's display string.
    Substring(String),
}

impl Predicate {
    pub fn membership<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::Membership(values.into_iter().map(Into::into).collect())
    }

    pub fn range(min: f64, max: f64) -> Self {
        Predicate::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn substring(text: impl Into<String>) -> Self {
        Predicate::Substring(text.into())
    }

    /// Evaluate against a single cell.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Predicate::Membership(set) => set.is_empty() || set.contains(&value.display_string()),
            Predicate::Range { min, max } => match value.as_f64() {
                Some(v) => min.is_none_or(|lo| v >= lo) && max.is_none_or(|hi| v <= hi),
                None => false,
            },
            Predicate::Substring(needle) => value
                .display_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// Column → predicate mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, Option<Predicate>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the UI's JSON filter document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DashboardError::InvalidFilter(e.to_string()))
    }

    /// Set or clear (`None`) the predicate for a column.
    pub fn set(&mut self, column: impl Into<String>, predicate: Option<Predicate>) {
        self.entries.insert(column.into(), predicate);
    }

    pub fn with(mut self, column: impl Into<String>, predicate: Predicate) -> Self {
        self.set(column, Some(predicate));
        self
    }

    pub fn remove(&mut self, column: &str) {
        self.entries.remove(column);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Predicates that actually constrain rows.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.entries
            .iter()
            .filter_map(|(col, pred)| pred.as_ref().map(|p| (col.as_str(), p)))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

/// Applies a [`FilterSet`] to a table.
pub struct FilterEngine;

impl FilterEngine {
    /// Return the rows satisfying every active predicate, in original order.
    ///
    /// A predicate on a column the table does not have sees `Null`.
    pub fn apply(table: &Table, filters: &FilterSet) -> Table {
        if filters.is_empty() {
            return table.clone();
        }

        let rows: Vec<Row> = Self::matching_rows(table, filters)
            .into_iter()
            .map(|i| table.rows[i].clone())
            .collect();
        table.with_rows(rows)
    }

    /// Positions of the rows satisfying every active predicate, ascending.
    pub fn matching_rows(table: &Table, filters: &FilterSet) -> Vec<usize> {
        let resolved: Vec<(Option<usize>, &Predicate)> = filters
            .active()
            .map(|(col, pred)| (table.column_index(col), pred))
            .collect();

        let matching: Vec<usize> = table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                resolved.iter().all(|(idx, pred)| match idx {
                    Some(i) => pred.matches(row.get(*i)),
                    None => pred.matches(&Value::Null),
                })
            })
            .map(|(i, _)| i)
            .collect();

        if !resolved.is_empty() {
            debug!(
                "Filtered {} rows down to {} with {} predicates",
                table.row_count(),
                matching.len(),
                resolved.len()
            );
        }
        matching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Table {
        Table::new(
            vec!["A".into(), "B".into()],
            vec![
                Row::new(vec![Value::Number(1.0), Value::Text("x".into())]),
                Row::new(vec![Value::Number(2.0), Value::Text("y".into())]),
                Row::new(vec![Value::Number(3.0), Value::Text("Xylophone".into())]),
                Row::new(vec![Value::Null, Value::Null]),
            ],
        )
    }

    #[test]
    fn test_range_filter_exact_bound() {
        let filters = FilterSet::new().with("A", Predicate::range(2.0, 2.0));
        let out = FilterEngine::apply(&table(), &filters);
        assert_eq!(
            out.rows,
            vec![Row::new(vec![Value::Number(2.0), Value::Text("y".into())])]
        );
    }

    #[test]
    fn test_range_excludes_non_numeric() {
        let filters = FilterSet::new().with(
            "A",
            Predicate::Range {
                min: None,
                max: None,
            },
        );
        let out = FilterEngine::apply(&table(), &filters);
        assert_eq!(out.row_count(), 3);
    }

    #[test]
    fn test_substring_case_insensitive() {
        let filters = FilterSet::new().with("B", Predicate::substring("X"));
        let out = FilterEngine::apply(&table(), &filters);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn test_membership_and_conjunction() {
        let filters = FilterSet::new()
            .with("B", Predicate::membership(["x", "y"]))
            .with("A", Predicate::range(2.0, 10.0));
        let out = FilterEngine::apply(&table(), &filters);
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0].get(1), &Value::Text("y".into()));
    }

    #[test]
    fn test_membership_matches_number_display() {
        let filters = FilterSet::new().with("A", Predicate::membership(["3"]));
        assert_eq!(FilterEngine::apply(&table(), &filters).row_count(), 1);
    }

    #[test]
    fn test_empty_membership_and_null_predicate_are_vacuous() {
        let mut filters = FilterSet::new().with("B", Predicate::Membership(BTreeSet::new()));
        filters.set("A", None);
        assert!(!filters.is_empty());
        assert_eq!(FilterEngine::apply(&table(), &filters).row_count(), 4);
    }

    #[test]
    fn test_matching_rows_positions() {
        let filters = FilterSet::new().with("B", Predicate::substring("x"));
        assert_eq!(FilterEngine::matching_rows(&table(), &filters), vec![0, 2]);
        assert_eq!(
            FilterEngine::matching_rows(&table(), &FilterSet::new()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_unknown_column_sees_null() {
        let filters = FilterSet::new().with("missing", Predicate::substring("a"));
        assert_eq!(FilterEngine::apply(&table(), &filters).row_count(), 0);
    }

    #[test]
    fn test_filter_from_ui_json() {
        let filters = FilterSet::from_json(
            r#"{"region": ["North", "South"], "revenue": {"min": 10, "max": 20}, "name": "acme", "ignored": null}"#,
        )
        .unwrap();

        let active: Vec<(&str, &Predicate)> = filters.active().collect();
        assert_eq!(active.len(), 3);
        assert_eq!(active[0], ("name", &Predicate::substring("acme")));
        assert_eq!(active[1], ("region", &Predicate::membership(["North", "South"])));
        assert_eq!(active[2], ("revenue", &Predicate::range(10.0, 20.0)));
    }

    #[test]
    fn test_filter_from_bad_json() {
        let err = FilterSet::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FILTER");
    }
}
