//! Quote-aware splitting of delimited text.
//!
//! A field is quoted when its first non-blank character is `"`. Inside a
//! quoted field `""` is a literal quote, and both the record separator and the
//! delimiter lose their meaning. An unmatched quote swallows the rest of the
//! input instead of failing.

const QUOTE: char = '"';

/// Split text into logical lines, keeping newlines that sit inside quoted
/// fields. A trailing `\r` on each line is dropped.
pub(crate) fn split_logical_lines(text: &str, delimiter: char) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut chars = text.char_indices().peekable();
    let mut line_start = 0;
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some((idx, ch)) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if matches!(chars.peek(), Some((_, QUOTE))) {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match ch {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            '\n' => {
                lines.push(trim_cr(&text[line_start..idx]));
                line_start = idx + 1;
                at_field_start = true;
            }
            c if c == delimiter => at_field_start = true,
            c if c.is_whitespace() => {}
            _ => at_field_start = false,
        }
    }

    if line_start < text.len() {
        lines.push(trim_cr(&text[line_start..]));
    }

    lines
}

/// Split one logical line into trimmed field values.
pub(crate) fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    current.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }

        if ch == QUOTE && at_field_start {
            // leading blanks before the opening quote are not content
            current.clear();
            in_quotes = true;
            at_field_start = false;
        } else if ch == delimiter {
            fields.push(current.trim().to_string());
            current.clear();
            at_field_start = true;
        } else {
            if !ch.is_whitespace() {
                at_field_start = false;
            }
            current.push(ch);
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Quote a field for output when the parser would otherwise alter it.
pub(crate) fn quote_field(value: &str, delimiter: char) -> String {
    let needs_quotes = value.contains(delimiter)
        || value.contains(QUOTE)
        || value.contains('\n')
        || value.contains('\r')
        || value.trim() != value;

    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
