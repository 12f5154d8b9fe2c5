//! Payload repair for known upstream inconsistencies.
//!
//! The upstream API omits or nulls some record fields and drifts between
//! numeric and string types for others. Every record-shaped payload passes
//! through [`normalize_record_fields`] before typed deserialization, and
//! every record name passes through [`normalize_name`] so callers always see
//! zone-relative names.

use serde_json::{Map, Value};

/// Repair a raw record object in place so all expected fields are present:
///
/// - `notes` absent or null becomes `""`
/// - `prio` absent or null becomes `"0"`
/// - numeric `id`/`ttl`/`prio` values become their string representation
pub(crate) fn normalize_record_fields(record: &mut Map<String, Value>) {
    coerce_number_to_string(record, "id");
    coerce_number_to_string(record, "ttl");
    coerce_number_to_string(record, "prio");
    default_missing(record, "prio", "0");
    default_missing(record, "notes", "");
}

fn coerce_number_to_string(record: &mut Map<String, Value>, key: &str) {
    if let Some(Value::Number(n)) = record.get(key) {
        let text = n.to_string();
        record.insert(key.to_string(), Value::String(text));
    }
}

fn default_missing(record: &mut Map<String, Value>, key: &str, default: &str) {
    match record.get(key) {
        None | Some(Value::Null) => {
            record.insert(key.to_string(), Value::String(default.to_string()));
        }
        Some(_) => {}
    }
}

/// Canonicalize a DNS record name relative to its zone.
///
/// Rules, in order: strip one trailing `.` (FQDN form); if the remainder is
/// empty or equals the zone, return `""` (the zone apex); if it ends with
/// `.` + zone, strip that suffix; otherwise return it unchanged — it is
/// already zone-relative, or points at a different zone, which some record
/// types legitimately do.
///
/// Idempotent: normalizing an already-normalized name is a no-op.
#[must_use]
pub fn normalize_name(raw: &str, zone: &str) -> String {
    let name = raw.strip_suffix('.').unwrap_or(raw);
    let zone = zone.trim_end_matches('.');
    if name.is_empty() || name == zone {
        return String::new();
    }
    match name.strip_suffix(&format!(".{zone}")) {
        Some(rest) => rest.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn fills_missing_notes_and_null_prio() {
        let mut record = as_map(json!({"id": 42, "prio": null}));
        normalize_record_fields(&mut record);
        assert_eq!(record.get("id"), Some(&json!("42")));
        assert_eq!(record.get("prio"), Some(&json!("0")));
        assert_eq!(record.get("notes"), Some(&json!("")));
    }

    #[test]
    fn preserves_present_fields() {
        let mut record = as_map(json!({
            "id": "106926652",
            "name": "www.example.com",
            "type": "A",
            "content": "198.51.100.45",
            "ttl": "600",
            "prio": "10",
            "notes": "mail backup"
        }));
        let before = record.clone();
        normalize_record_fields(&mut record);
        assert_eq!(record, before);
    }

    #[test]
    fn coerces_numeric_drift_to_strings() {
        let mut record = as_map(json!({"id": 7, "ttl": 600, "prio": 10}));
        normalize_record_fields(&mut record);
        assert_eq!(record.get("id"), Some(&json!("7")));
        assert_eq!(record.get("ttl"), Some(&json!("600")));
        assert_eq!(record.get("prio"), Some(&json!("10")));
    }

    #[test]
    fn name_strips_fqdn_dot_and_zone_suffix() {
        assert_eq!(normalize_name("www.example.com.", "example.com"), "www");
        assert_eq!(normalize_name("www.example.com", "example.com"), "www");
    }

    #[test]
    fn name_equal_to_zone_is_apex() {
        assert_eq!(normalize_name("example.com", "example.com"), "");
        assert_eq!(normalize_name("example.com.", "example.com"), "");
        assert_eq!(normalize_name("", "example.com"), "");
    }

    #[test]
    fn already_relative_name_unchanged() {
        assert_eq!(normalize_name("www", "example.com"), "www");
    }

    #[test]
    fn foreign_zone_name_passes_through() {
        assert_eq!(
            normalize_name("mail.other.net", "example.com"),
            "mail.other.net"
        );
    }

    #[test]
    fn nested_subdomain_keeps_inner_labels() {
        assert_eq!(
            normalize_name("a.b.example.com.", "example.com"),
            "a.b"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let zone = "example.com";
        for raw in [
            "www.example.com.",
            "www.example.com",
            "example.com",
            "www",
            "",
            "mail.other.net",
            "a.b.example.com",
        ] {
            let once = normalize_name(raw, zone);
            let twice = normalize_name(&once, zone);
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }
}
