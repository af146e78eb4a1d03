//! Tolerant response normalization
//!
//! The backend has historically answered the same logical request with
//! several envelope shapes (a bare array, `{data: [...]}`, or
//! `{success, data, message}`) and several spellings for the same field.
//! This module turns those loosely-shaped payloads into the canonical,
//! fully-defaulted records the UI works with. Shape mismatches are absorbed
//! by defaulting, never raised; pages must stay renderable against a
//! drifting backend.

pub mod account;
pub mod checklist;
pub mod fx;

use serde_json::Value;

/// Extract the logical record list from a decoded response body.
///
/// Accepts a bare array or any envelope carrying a `data` array. An
/// unrecognized shape degrades to an empty list rather than an error.
pub fn unwrap_list(raw: &Value) -> Vec<Value> {
    if let Some(items) = raw.as_array() {
        return items.clone();
    }
    if let Some(items) = raw.get("data").and_then(Value::as_array) {
        return items.clone();
    }
    Vec::new()
}

/// Extract the logical record object from a decoded response body.
///
/// `{data: {...}}` envelopes yield the inner object; anything else is
/// returned as-is.
pub fn unwrap_object(mut raw: Value) -> Value {
    if raw.get("data").is_some_and(Value::is_object) {
        raw["data"].take()
    } else {
        raw
    }
}

/// Return the first present, non-null value among `keys`, in priority order.
///
/// Key ordering matters: the most specific/modern field name goes first.
pub fn resolve<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find(|v| !v.is_null())
}

/// Stringify a loosely-typed value. Null becomes the empty string.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Resolve a string field by alias, with a fallback for absent fields.
pub fn string_or(record: &Value, keys: &[&str], fallback: &str) -> String {
    resolve(record, keys)
        .map(coerce_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Coerce a loosely-typed amount to a finite number.
///
/// Strings are parsed; anything unparseable, missing, or non-finite
/// collapses to zero. Lossy on purpose: the UI only displays or sums these
/// values, and a zeroed amount beats an unrenderable page.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Resolve a numeric field by alias, defaulting to zero.
pub fn number_or_zero(record: &Value, keys: &[&str]) -> f64 {
    resolve(record, keys).map(coerce_number).unwrap_or(0.0)
}

/// Coerce a value to an integer identifier, if it can represent one.
///
/// Unlike [`coerce_number`] this does not default: callers that need a real
/// identifier must be able to tell "absent" from "zero".
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_list_accepts_bare_array() {
        let raw = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(unwrap_list(&raw).len(), 2);
    }

    #[test]
    fn unwrap_list_accepts_data_envelope() {
        let raw = json!({"data": [{"id": 1}]});
        assert_eq!(unwrap_list(&raw).len(), 1);
    }

    #[test]
    fn unwrap_list_accepts_success_envelope() {
        let raw = json!({"success": true, "data": [{"id": 1}], "message": "ok"});
        assert_eq!(unwrap_list(&raw).len(), 1);
    }

    #[test]
    fn unwrap_list_degrades_to_empty() {
        assert!(unwrap_list(&json!({"message": "oops"})).is_empty());
        assert!(unwrap_list(&json!(42)).is_empty());
        assert!(unwrap_list(&Value::Null).is_empty());
    }

    #[test]
    fn unwrap_object_unwraps_data_envelope() {
        let raw = json!({"success": true, "data": {"id": 7}});
        assert_eq!(unwrap_object(raw), json!({"id": 7}));
    }

    #[test]
    fn unwrap_object_passes_bare_object_through() {
        let raw = json!({"id": 7});
        assert_eq!(unwrap_object(raw.clone()), raw);
    }

    #[test]
    fn resolve_honors_priority_and_skips_null() {
        let record = json!({"id": null, "accountId": 42, "uuid": "u-1"});
        let hit = resolve(&record, &["id", "accountId", "uuid"]).unwrap();
        assert_eq!(hit, &json!(42));
    }

    #[test]
    fn resolve_returns_none_when_all_absent() {
        let record = json!({"other": 1});
        assert!(resolve(&record, &["id", "accountId"]).is_none());
    }

    #[test]
    fn coerce_number_handles_strings_and_garbage() {
        assert_eq!(coerce_number(&json!("15000")), 15000.0);
        assert_eq!(coerce_number(&json!(" 42.5 ")), 42.5);
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&Value::Null), 0.0);
        assert_eq!(coerce_number(&json!({"nested": true})), 0.0);
    }

    #[test]
    fn coerce_int_distinguishes_absent_from_zero() {
        assert_eq!(coerce_int(&json!(0)), Some(0));
        assert_eq!(coerce_int(&json!("17")), Some(17));
        assert_eq!(coerce_int(&json!(3.0)), Some(3));
        assert_eq!(coerce_int(&json!("x")), None);
        assert_eq!(coerce_int(&Value::Null), None);
    }

    #[test]
    fn coerce_string_maps_null_to_empty() {
        assert_eq!(coerce_string(&Value::Null), "");
        assert_eq!(coerce_string(&json!(12)), "12");
        assert_eq!(coerce_string(&json!("abc")), "abc");
    }
}
