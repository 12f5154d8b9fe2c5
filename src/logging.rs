//! Log sanitization helpers.
//!
//! Request payloads carry the account's API credentials and response bodies
//! can contain private keys (SSL retrieve), so nothing is logged raw:
//! payloads are redacted and bodies truncated first.

use serde_json::{Map, Value};

use crate::client::{AUTH_KEY_FIELD, AUTH_SECRET_FIELD};

/// Maximum number of bytes of a response body to include in debug logs.
const TRUNCATE_LIMIT: usize = 512;

/// Render a request payload for logging with credential fields masked.
pub(crate) fn redact_payload(payload: &Map<String, Value>) -> String {
    let mut masked = payload.clone();
    for field in [AUTH_KEY_FIELD, AUTH_SECRET_FIELD] {
        if masked.contains_key(field) {
            masked.insert(field.to_string(), Value::String("********".to_string()));
        }
    }
    Value::Object(masked).to_string()
}

/// Truncate a response body for logging, keeping the total length visible.
pub(crate) fn truncate_for_log(body: &str) -> String {
    if body.len() <= TRUNCATE_LIMIT {
        return body.to_string();
    }
    // Back off to a char boundary so multi-byte content cannot split.
    let mut cut = TRUNCATE_LIMIT;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... ({} bytes total)", &body[..cut], body.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_both_credential_fields() {
        let mut payload = Map::new();
        payload.insert("apikey".to_string(), Value::String("pk1_real".to_string()));
        payload.insert(
            "secretapikey".to_string(),
            Value::String("sk1_real".to_string()),
        );
        payload.insert("content".to_string(), Value::String("1.2.3.4".to_string()));

        let rendered = redact_payload(&payload);
        assert!(!rendered.contains("pk1_real"));
        assert!(!rendered.contains("sk1_real"));
        assert!(rendered.contains("********"));
        assert!(rendered.contains("1.2.3.4"));
    }

    #[test]
    fn redaction_leaves_caller_payload_untouched() {
        let mut payload = Map::new();
        payload.insert("apikey".to_string(), Value::String("pk1_real".to_string()));
        let _ = redact_payload(&payload);
        assert_eq!(
            payload.get("apikey").and_then(Value::as_str),
            Some("pk1_real")
        );
    }

    #[test]
    fn short_body_unchanged() {
        assert_eq!(truncate_for_log("{\"status\":\"SUCCESS\"}"), "{\"status\":\"SUCCESS\"}");
    }

    #[test]
    fn long_body_truncated_with_length() {
        let body = "x".repeat(TRUNCATE_LIMIT + 64);
        let result = truncate_for_log(&body);
        assert!(result.len() < body.len());
        assert!(result.contains(&format!("({} bytes total)", TRUNCATE_LIMIT + 64)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "é".repeat(TRUNCATE_LIMIT);
        let result = truncate_for_log(&body);
        assert!(result.contains("bytes total"));
    }
}
