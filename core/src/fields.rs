//! Required/optional field accessors over schema-less JSON.
//!
//! Parsers and resources read decoded bodies through these helpers so a
//! missing field always surfaces as `MalformedResponse` naming the field.

use serde_json::Value;

use crate::error::{ApiError, Result};

pub fn required<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    value
        .as_object()
        .ok_or_else(|| ApiError::malformed(format!("expected a JSON object holding `{key}`")))?
        .get(key)
        .ok_or_else(|| ApiError::malformed(format!("missing required field `{key}`")))
}

pub fn required_str<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
    required(value, key)?
        .as_str()
        .ok_or_else(|| ApiError::malformed(format!("field `{key}` is not a string")))
}

pub fn required_u64(value: &Value, key: &str) -> Result<u64> {
    required(value, key)?
        .as_u64()
        .ok_or_else(|| ApiError::malformed(format!("field `{key}` is not a non-negative integer")))
}

/// Present and non-null, otherwise `None`.
pub fn optional<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

pub fn optional_or(value: &Value, key: &str, default: Value) -> Value {
    optional(value, key).cloned().unwrap_or(default)
}

pub fn optional_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    optional(value, key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn required_present() {
        let body = json!({"data": [1, 2]});
        assert_eq!(required(&body, "data").unwrap(), &json!([1, 2]));
    }

    #[test]
    fn required_null_counts_as_present() {
        let body = json!({"data": null});
        assert_eq!(required(&body, "data").unwrap(), &Value::Null);
    }

    #[test]
    fn required_missing_names_the_field() {
        let err = required(&json!({"meta": {}}), "data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        assert!(err.to_string().contains("`data`"));
    }

    #[test]
    fn required_on_non_object() {
        let err = required(&json!([1]), "data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn typed_accessors() {
        let body = json!({"token_type": "Bearer", "expires_in": 3600, "neg": -1});
        assert_eq!(required_str(&body, "token_type").unwrap(), "Bearer");
        assert_eq!(required_u64(&body, "expires_in").unwrap(), 3600);
        assert!(required_u64(&body, "neg").is_err());
        assert!(required_str(&body, "expires_in").is_err());
    }

    #[test]
    fn optional_defaults() {
        let body = json!({"meta": null, "name": "x"});
        assert_eq!(optional_or(&body, "meta", json!({})), json!({}));
        assert_eq!(optional_or(&body, "name", json!("y")), json!("x"));
        assert_eq!(optional_str(&body, "name"), Some("x"));
        assert!(optional(&body, "missing").is_none());
    }
}
