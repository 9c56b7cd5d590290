//! Request body checks for `/login` and `/receive_json`.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::ServiceError;

const FORM_FIELDS: [&str; 2] = ["key1", "key2"];

/// Requires `key1` and `key2` and joins them as `"<key1> | <key2>"`.
///
/// An empty value counts as present.
pub fn validate_form(fields: &HashMap<String, String>) -> Result<String, ServiceError> {
    let [first, second] = FORM_FIELDS.map(|name| fields.get(name));
    match (first, second) {
        (Some(a), Some(b)) => Ok(format!("{a} | {b}")),
        _ => {
            let missing: Vec<_> = FORM_FIELDS
                .into_iter()
                .filter(|name| !fields.contains_key(*name))
                .collect();
            Err(ServiceError::Validation(format!(
                "missing required field: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Accepts a JSON body and hands back the decoded value untouched.
///
/// The media type must be `application/json`; parameters such as
/// `; charset=utf-8` are ignored. `content_length` must be positive.
pub fn validate_json_body(
    content_type: Option<&str>,
    content_length: usize,
    body: &[u8],
) -> Result<Value, ServiceError> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or_default();
    if !essence.eq_ignore_ascii_case("application/json") {
        return Err(ServiceError::Validation(format!(
            "expected content-type application/json, got `{}`",
            content_type.unwrap_or("")
        )));
    }
    if content_length == 0 {
        return Err(ServiceError::Validation("empty body".to_owned()));
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::Validation(format!("malformed json: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn form_joins_both_fields() {
        let out = validate_form(&fields(&[("key1", "a"), ("key2", "b")]));
        assert_eq!(out, Ok("a | b".to_owned()));
    }

    #[test]
    fn form_accepts_empty_values() {
        let out = validate_form(&fields(&[("key1", ""), ("key2", "")]));
        assert_eq!(out, Ok(" | ".to_owned()));
    }

    #[test]
    fn form_ignores_extra_fields() {
        let out = validate_form(&fields(&[("key2", "b"), ("key1", "a"), ("key3", "c")]));
        assert_eq!(out, Ok("a | b".to_owned()));
    }

    #[test]
    fn form_missing_field_names_it() {
        let err = validate_form(&fields(&[("key1", "a")])).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("missing required field: key2".to_owned())
        );
        let err = validate_form(&HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Validation("missing required field: key1, key2".to_owned())
        );
    }

    #[test]
    fn json_passes_through_unchanged() {
        let body = br#"{"x":1}"#;
        let out = validate_json_body(Some("application/json"), 12, body);
        assert_eq!(out, Ok(json!({"x": 1})));
    }

    #[test]
    fn json_allows_charset_parameter() {
        let out = validate_json_body(Some("application/json; charset=utf-8"), 2, b"[]");
        assert_eq!(out, Ok(json!([])));
    }

    #[test]
    fn json_rejects_other_media_types() {
        let out = validate_json_body(Some("text/plain"), 12, br#"{"x":1}"#);
        assert!(matches!(out, Err(ServiceError::Validation(_))));
        let out = validate_json_body(None, 12, br#"{"x":1}"#);
        assert!(matches!(out, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn json_rejects_zero_length() {
        let out = validate_json_body(Some("application/json"), 0, b"");
        assert_eq!(out, Err(ServiceError::Validation("empty body".to_owned())));
    }

    #[test]
    fn json_rejects_garbage() {
        let out = validate_json_body(Some("application/json"), 5, b"{nope");
        assert!(matches!(out, Err(ServiceError::Validation(m)) if m.starts_with("malformed json")));
    }
}
