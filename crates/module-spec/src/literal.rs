//! Readers for dependency literals and answer values.
//!
//! Text is read exactly as written: surrounding whitespace is never
//! stripped, matching how select labels and free text are compared.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Finite decimal number; `NaN` and infinities are rejected.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// ISO 8601 instant: RFC 3339 date-time, naive date-time (read as UTC), or a
/// plain date at midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    // chrono tolerates padding around numeric fields.
    if raw.trim() != raw {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A value counts as unset when it is null, an empty or blank string, or an
/// empty array.
pub(crate) fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Textual form of a scalar answer. Arrays and objects have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub(crate) fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|number| number.is_finite()),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

pub(crate) fn value_as_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => parse_bool(text).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dates_accept_plain_and_full_forms() {
        let plain = parse_date("2024-03-01").expect("plain date");
        let full = parse_date("2024-03-01T00:00:00Z").expect("rfc3339");
        let naive = parse_date("2024-03-01T00:00:00").expect("naive");
        assert_eq!(plain, full);
        assert_eq!(plain, naive);
        assert!(parse_date("01/03/2024").is_none());
        assert!(parse_date(" 2024-03-01").is_none());
    }

    #[test]
    fn numbers_reject_non_finite() {
        assert_eq!(parse_number("4.5"), Some(4.5));
        assert_eq!(parse_number(" 4.5 "), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn unset_covers_blank_shapes() {
        assert!(is_unset(None));
        assert!(is_unset(Some(&json!(null))));
        assert!(is_unset(Some(&json!("  "))));
        assert!(is_unset(Some(&json!([]))));
        assert!(!is_unset(Some(&json!(false))));
        assert!(!is_unset(Some(&json!(0))));
    }

    #[test]
    fn checkbox_coercion() {
        assert!(value_as_bool(Some(&json!(true))));
        assert!(value_as_bool(Some(&json!("true"))));
        assert!(!value_as_bool(Some(&json!("yes"))));
        assert!(!value_as_bool(Some(&json!("true "))));
        assert!(!value_as_bool(None));
    }
}
