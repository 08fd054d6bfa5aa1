//! Shared utilities for the dashboard engine.
//!
//! Numeric parsing helpers used by coercion, schema inference and chart
//! payload construction.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Numeric Parsing Utilities
// =============================================================================

/// Plain numbers with optional sign, thousands separators and decimal part.
///
/// Dates, codes with letters and scientific notation do not match.
static PLAIN_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?\d[\d,]*(\.\d+)?$").expect("Invalid regex: plain number")
});

/// Remove thousands-separator commas from a trimmed string.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(strip_thousands("1,234,567"), "1234567");
/// ```
pub fn strip_thousands(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Try to parse a string as a finite number after removing thousands separators.
///
/// This is the lenient check used by schema inference, so `1e3` and `.5`
/// parse here even though coercion leaves them as text.
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned = strip_thousands(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check whether a cell should be coerced to a number.
///
/// Covers digit-and-comma strings (so a bare year like `2021` becomes a
/// number) plus signed and decimal forms.
pub fn is_plain_number(s: &str) -> bool {
    PLAIN_NUMBER.is_match(s.trim())
}

/// Convert a float to JSON, emitting integral values as integers.
///
/// Keeps chart payloads free of `25.0`-style noise.
pub fn number_json(v: f64) -> serde_json::Value {
    const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INT {
        serde_json::Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// Ratio of `part` to `whole`, `0.0` for an empty whole.
#[inline]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
