//! Cell normalization helpers.
//!
//! Every comparison in the import pipeline happens on normalized text:
//! whitespace runs collapsed to single spaces, ends trimmed, and (for
//! existence checks) lower-cased. Normalization is total — any JSON cell
//! value, including null, numbers and nested structures, normalizes to a
//! string without failing — and idempotent.

use serde_json::Value;

/// Normalize a raw string cell: collapse internal whitespace runs to a
/// single space and trim the ends. The empty string is the canonical form
/// of a blank cell.
#[must_use]
pub fn normalize_str(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize an arbitrary JSON cell value.
///
/// `null` becomes `""`; strings are normalized directly; numbers and
/// booleans are stringified first; arrays and objects fall back to their
/// compact JSON encoding (a spreadsheet decoder never produces these, but
/// the function must not fail on them).
#[must_use]
pub fn normalize_cell(raw: &Value) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => normalize_str(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => normalize_str(&n.to_string()),
        other => normalize_str(&other.to_string()),
    }
}

/// Canonical comparison key for a cell: normalized and lower-cased.
///
/// All existence checks (departments, positions, employees, projects,
/// within-file duplicates) compare these keys, making matching
/// case-insensitive.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    normalize_str(raw).to_lowercase()
}

/// True iff every cell of the row normalizes to the empty string.
///
/// Used to drop blank trailing/interstitial spreadsheet rows before
/// validation begins.
#[must_use]
pub fn is_row_empty(row: &[String]) -> bool {
    row.iter().all(|cell| normalize_str(cell).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_str_collapses_whitespace() {
        assert_eq!(normalize_str("  Alice   Smith "), "Alice Smith");
        assert_eq!(normalize_str("a\t b\n c"), "a b c");
        assert_eq!(normalize_str("plain"), "plain");
    }

    #[test]
    fn test_normalize_str_blank_becomes_empty() {
        assert_eq!(normalize_str(""), "");
        assert_eq!(normalize_str("   "), "");
        assert_eq!(normalize_str("\t\n"), "");
    }

    #[test]
    fn test_normalize_str_is_idempotent() {
        for raw in ["  Alice   Smith ", "", "  ", "a\tb", "already normal"] {
            let once = normalize_str(raw);
            assert_eq!(normalize_str(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_cell_is_total() {
        // Must never fail, whatever the JSON value
        assert_eq!(normalize_cell(&Value::Null), "");
        assert_eq!(normalize_cell(&json!("  IT  ")), "IT");
        assert_eq!(normalize_cell(&json!(42)), "42");
        assert_eq!(normalize_cell(&json!(4.5)), "4.5");
        assert_eq!(normalize_cell(&json!(true)), "true");
        assert_eq!(normalize_cell(&json!(["a", "b"])), "[\"a\",\"b\"]");
        assert_eq!(normalize_cell(&json!({"k": 1})), "{\"k\":1}");
    }

    #[test]
    fn test_normalize_cell_is_idempotent() {
        for value in [json!(null), json!("  x  y "), json!(7), json!(false)] {
            let once = normalize_cell(&value);
            let twice = normalize_cell(&Value::String(once.clone()));
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_normalize_key_lowercases() {
        assert_eq!(normalize_key("  Sales   Manager "), "sales manager");
        assert_eq!(normalize_key("IT"), "it");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_is_row_empty() {
        assert!(is_row_empty(&[]));
        assert!(is_row_empty(&["".to_string(), "  ".to_string()]));
        assert!(!is_row_empty(&["".to_string(), "x".to_string()]));
    }
}
