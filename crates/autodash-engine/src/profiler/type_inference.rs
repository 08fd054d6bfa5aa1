//! Type inference logic for column classification.

use crate::config::EngineConfig;
use crate::types::{ColumnKind, Value};
use crate::utils::{parse_number, ratio};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// Date pattern regexes - compiled once at startup
static YEAR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])[0-9]{4}(?:[^0-9]|$)").expect("Invalid regex: year token")
});

static ISO_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("Invalid regex: YYYY-MM-DD"));

/// Classify one column from all of its cells.
///
/// Blank cells are excluded from every ratio. A column without any non-blank
/// cell skips the numeric and temporal checks and lands on the uniqueness
/// rule (which it always passes).
pub(crate) fn infer_column_kind<'a, I>(cells: I, row_count: usize, config: &EngineConfig) -> ColumnKind
where
    I: IntoIterator<Item = &'a Value>,
{
    let values: Vec<&Value> = cells.into_iter().filter(|v| !v.is_null()).collect();

    if !values.is_empty() {
        // Check 1: Numeric
        if is_numeric_column(&values, config.numeric_ratio) {
            return ColumnKind::Numeric;
        }

        // Check 2: Temporal
        if is_temporal_column(&values, config.temporal_ratio) {
            return ColumnKind::Temporal;
        }
    }

    // Check 3: Categorical by distinct count
    let distinct: HashSet<String> = values.iter().map(|v| v.display_string()).collect();
    if distinct.len() as f64 <= config.categorical_allowance(row_count) {
        return ColumnKind::Categorical;
    }

    ColumnKind::Text
}

/// At least `threshold` of the non-blank values parse as numbers.
pub(crate) fn is_numeric_column(values: &[&Value], threshold: f64) -> bool {
    let parsed = values
        .iter()
        .filter(|v| match v {
            Value::Number(_) => true,
            Value::Text(s) => parse_number(s).is_some(),
            Value::Null => false,
        })
        .count();
    ratio(parsed, values.len()) >= threshold
}

/// More than `threshold` of the non-blank values carry a 4-digit year token,
/// or more than `threshold` start with an ISO date.
pub(crate) fn is_temporal_column(values: &[&Value], threshold: f64) -> bool {
    let rendered: Vec<String> = values.iter().map(|v| v.display_string()).collect();

    let year_like = rendered.iter().filter(|s| YEAR_TOKEN.is_match(s)).count();
    if ratio(year_like, rendered.len()) > threshold {
        return true;
    }

    let iso_like = rendered
        .iter()
        .filter(|s| ISO_DATE_PREFIX.is_match(s))
        .count();
    ratio(iso_like, rendered.len()) > threshold
}
