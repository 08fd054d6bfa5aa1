//! Cell coercion from parsed text to tagged values.

use crate::types::{RawTable, Row, Table, Value};
use crate::utils::{is_plain_number, strip_thousands};

/// Coerce one raw cell.
///
/// - blank → `Null`
/// - digits with thousands separators (optionally signed or decimal) →
///   `Number`, so a bare year such as `2021` becomes `2021.0`
/// - anything else → `Text`, unchanged
pub fn coerce_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }

    if is_plain_number(trimmed)
        && let Ok(n) = strip_thousands(trimmed).parse::<f64>()
    {
        return Value::Number(n);
    }

    Value::Text(trimmed.to_string())
}

/// Coerce every cell of a parsed table.
pub fn coerce_table(raw: &RawTable) -> Table {
    let rows = raw
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(|c| coerce_value(c)).collect()))
        .collect();
    Table::new(raw.columns.clone(), rows)
}
