//! Save format helpers
//!
//! The plugin reads a line-oriented YAML subset: two spaces per nesting
//! level, `key: value` scalars, `- item` list entries. Loading goes the
//! other way through an already-parsed, JSON-shaped value tree.

use serde_json::{Map, Value};

/// A parsed mapping as handed over by the document parser.
pub type Mapping = Map<String, Value>;

/// One nesting level.
pub const INDENT: &str = "  ";

/// Wraps text in single quotes.
///
/// Single quotes inside the text are doubled, nothing else is escaped.
/// Names used as block headers are written raw.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Formats a number the way the plugin expects (`20`, `1.5`).
pub fn number(n: f64) -> String {
    format!("{}", n)
}

/// Like [`number`] but whole values keep a fraction (`1.0`), so a
/// floating-point field still reads back as one.
pub fn decimal(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        number(n)
    }
}

/// Appends `indent` one level deeper.
pub fn deeper(indent: &str) -> String {
    format!("{indent}{INDENT}")
}

/// Reads a scalar as text. Null and containers yield `None`.
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads an integer, truncating floats and parsing numeric strings.
pub fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a float, parsing numeric strings.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|f: &f64| f.is_finite()),
        _ => None,
    }
}

/// Reads a list of lines. An empty block header parses as null and reads
/// as an empty list; a lone scalar reads as a one-line list.
pub fn as_lines(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| as_text(item).unwrap_or_default())
                .collect(),
        ),
        other => as_text(other).map(|line| vec![line]),
    }
}

/// Whether a marker key carries a value (present, not null, not `false`).
pub fn is_set(data: &Mapping, key: &str) -> bool {
    !matches!(data.get(key), None | Some(Value::Null) | Some(Value::Bool(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quote_doubles_single_quotes() {
        assert_eq!(quote("&6Warrior"), "'&6Warrior'");
        assert_eq!(quote("it's"), "'it''s'");
    }

    #[test]
    fn numbers_drop_trailing_zero() {
        assert_eq!(number(20.0), "20");
        assert_eq!(number(1.5), "1.5");
        assert_eq!(number(-0.25), "-0.25");
    }

    #[test]
    fn decimals_keep_a_fraction() {
        assert_eq!(decimal(2.0), "2.0");
        assert_eq!(decimal(-3.0), "-3.0");
        assert_eq!(decimal(2.5), "2.5");
    }

    #[test]
    fn floats_from_text_must_be_finite() {
        assert_eq!(as_f64(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(as_f64(&json!("NaN")), None);
        assert_eq!(as_f64(&json!("inf")), None);
        assert_eq!(as_f64(&json!("-infinity")), None);
    }

    #[test]
    fn lines_accept_null_and_scalars() {
        assert_eq!(as_lines(&Value::Null), Some(vec![]));
        assert_eq!(as_lines(&json!("solo")), Some(vec!["solo".to_string()]));
        assert_eq!(
            as_lines(&json!(["a", 2, null])),
            Some(vec!["a".to_string(), "2".to_string(), String::new()])
        );
        assert_eq!(as_lines(&json!({"a": 1})), None);
    }

    #[test]
    fn integers_truncate_floats() {
        assert_eq!(as_i64(&json!(4.9)), Some(4));
        assert_eq!(as_i64(&json!(" 12 ")), Some(12));
        assert_eq!(as_i64(&json!("x")), None);
    }

    #[test]
    fn markers_ignore_null_and_false() {
        let data = json!({"active": null, "embed": false, "passive": {}});
        let data = data.as_object().expect("object");
        assert!(!is_set(data, "active"));
        assert!(!is_set(data, "embed"));
        assert!(is_set(data, "passive"));
        assert!(!is_set(data, "missing"));
    }
}
