//! Lenient numeric coercion for engine payloads.
//!
//! Engines and proxies occasionally hand back numbers as strings with stray
//! punctuation (`"38.9,"`, `" 1.2e3 "`). Those are cleaned and parsed; a
//! token with nothing parseable left is an error, never a default.

use serde_json::Value;

use crate::error::TripError;

/// Parse a raw token after trimming, dropping trailing commas and stripping
/// every character that cannot appear in a float literal.
pub fn parse_lenient(token: &str, field: &str) -> Result<f64, TripError> {
    let trimmed = token.trim().trim_end_matches(',');
    let cleaned: String = trimmed
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, 'e' | 'E' | '+' | '-' | '.'))
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TripError::MalformedNumber {
            field: field.to_string(),
            token: token.to_string(),
        }),
    }
}

/// Coerce a JSON value that must be numeric.
pub fn coerce_f64(value: &Value, field: &str) -> Result<f64, TripError> {
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| TripError::MalformedNumber {
            field: field.to_string(),
            token: number.to_string(),
        }),
        Value::String(token) => parse_lenient(token, field),
        other => Err(TripError::MalformedNumber {
            field: field.to_string(),
            token: other.to_string(),
        }),
    }
}

/// Look up `key` on an object; absent or `null` yields `Ok(None)`.
pub fn optional_f64(object: &Value, key: &str) -> Result<Option<f64>, TripError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => coerce_f64(value, key).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_trailing_comma_is_stripped() {
        assert_eq!(parse_lenient("38.9,", "lat").unwrap(), 38.9);
    }

    #[test]
    fn test_whitespace_and_exponent() {
        assert_eq!(parse_lenient("  1.5e2 ", "duration").unwrap(), 150.0);
        assert_eq!(parse_lenient("-7.7E-1", "lon").unwrap(), -0.77);
    }

    #[test]
    fn test_stray_characters_are_removed() {
        assert_eq!(parse_lenient("\u{a0}42m", "distance").unwrap(), 42.0);
    }

    #[test]
    fn test_no_digits_is_an_error() {
        let err = parse_lenient("abc", "distance").unwrap_err();
        match err {
            TripError::MalformedNumber { field, token } => {
                assert_eq!(field, "distance");
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_token_is_an_error() {
        assert!(parse_lenient(" , ", "lat").is_err());
    }

    #[test]
    fn test_overflow_to_infinity_is_an_error() {
        assert!(parse_lenient("1e999", "lat").is_err());
    }

    #[test]
    fn test_coerce_accepts_numbers_and_strings() {
        assert_eq!(coerce_f64(&json!(12.5), "x").unwrap(), 12.5);
        assert_eq!(coerce_f64(&json!("12.5,"), "x").unwrap(), 12.5);
    }

    #[test]
    fn test_coerce_rejects_non_scalars() {
        assert!(coerce_f64(&json!(true), "x").is_err());
        assert!(coerce_f64(&json!([1.0]), "x").is_err());
    }

    #[test]
    fn test_optional_treats_null_as_absent() {
        let object = json!({"a": null, "b": "3"});
        assert_eq!(optional_f64(&object, "a").unwrap(), None);
        assert_eq!(optional_f64(&object, "missing").unwrap(), None);
        assert_eq!(optional_f64(&object, "b").unwrap(), Some(3.0));
    }
}
