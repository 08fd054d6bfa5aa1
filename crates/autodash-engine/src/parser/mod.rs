//! Tabular text parsing.
//!
//! Turns raw CSV text into a [`RawTable`]: an ordered column list plus string
//! rows. Parsing is fail-soft. Ragged rows are padded or truncated to the
//! header width, unmatched quotes consume the rest of the input, and empty
//! input yields an empty table rather than an error.

mod lines;

use crate::types::RawTable;
use lines::{quote_field, split_fields, split_logical_lines};
use std::collections::HashSet;
use tracing::debug;

/// Field delimiter for CSV input.
pub const DEFAULT_DELIMITER: char = ',';

/// Parser for delimited text.
#[derive(Debug, Clone, Copy)]
pub struct TabularParser {
    delimiter: char,
}

impl Default for TabularParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl TabularParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a delimiter other than `,` (e.g. `\t`).
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Parse raw text into columns and rows.
    ///
    /// The first non-blank logical line is the header. Missing trailing fields
    /// become empty strings and extra fields are dropped.
    pub fn parse(&self, text: &str) -> RawTable {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut lines = split_logical_lines(text, self.delimiter)
            .into_iter()
            .filter(|line| !line.trim().is_empty());

        let Some(header) = lines.next() else {
            return RawTable::default();
        };

        let columns = unique_column_names(split_fields(header, self.delimiter));
        let width = columns.len();

        let rows: Vec<Vec<String>> = lines
            .map(|line| {
                let mut fields = split_fields(line, self.delimiter);
                fields.resize(width, String::new());
                fields
            })
            .collect();

        debug!("Parsed {} columns and {} rows", width, rows.len());
        RawTable { columns, rows }
    }

    /// Write a table back out as delimited text.
    ///
    /// Fields the parser would alter (embedded delimiters, quotes, newlines,
    /// surrounding blanks) are quoted.
    pub fn serialize(&self, table: &RawTable) -> String {
        let mut out = String::new();
        self.push_record(&mut out, &table.columns);
        for row in &table.rows {
            self.push_record(&mut out, row);
        }
        out
    }

    fn push_record(&self, out: &mut String, fields: &[String]) {
        let line: Vec<String> = fields
            .iter()
            .map(|f| quote_field(f, self.delimiter))
            .collect();
        out.push_str(&line.join(&self.delimiter.to_string()));
        out.push('\n');
    }
}

/// Make header names unique and non-empty.
///
/// Blank names become `column_<n>` (1-based position); repeats get a `_2`,
/// `_3`, ... suffix.
fn unique_column_names(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }

    names
}
