//! Manual-change detection between live form values and a server baseline.
//!
//! Used to decide whether a commit action (e.g. "Generate Document") should
//! be enabled. Comparison is type-aware:
//!
//! - `null`, a missing key and `""` are the same empty value;
//! - an object with a `code` field equals a scalar with the same value, so a
//!   resolved option compares equal to the raw code the server returned;
//! - other objects and arrays compare structurally with the same rules.
//!
//! The check is linear in the number of fields and allocation-free, so it is
//! fine to run on every keystroke.

use serde_json::{Map, Value};

use crate::models::FormValues;

const CODE_KEY: &str = "code";

/// Returns `true` when `current` differs from `baseline` in any field.
pub fn has_manual_changes(current: &FormValues, baseline: &FormValues) -> bool {
    !maps_equivalent(current, baseline)
}

/// Normalized equality of two JSON values.
pub fn values_equivalent(left: &Value, right: &Value) -> bool {
    match (normalize(left), normalize(right)) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(left), Some(right)) => present_equivalent(left, right),
    }
}

fn maps_equivalent(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    let covered = left.iter().all(|(key, value)| match right.get(key) {
        Some(other) => values_equivalent(value, other),
        None => normalize(value).is_none(),
    });

    covered
        && right
            .iter()
            .filter(|(key, _)| !left.contains_key(key.as_str()))
            .all(|(_, value)| normalize(value).is_none())
}

/// Collapse empty representations to `None`.
fn normalize(value: &Value) -> Option<&Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

fn code_of(value: &Value) -> Option<&Value> {
    match value {
        Value::Object(map) => map.get(CODE_KEY),
        _ => None,
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn present_equivalent(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Object(_), scalar) if is_scalar(scalar) => {
            code_of(left).is_some_and(|code| values_equivalent(code, scalar))
        }
        (scalar, Value::Object(_)) if is_scalar(scalar) => {
            code_of(right).is_some_and(|code| values_equivalent(scalar, code))
        }
        (Value::Object(left_map), Value::Object(right_map)) => {
            match (code_of(left), code_of(right)) {
                (Some(left_code), Some(right_code)) => values_equivalent(left_code, right_code),
                _ => maps_equivalent(left_map, right_map),
            }
        }
        (Value::Array(left_items), Value::Array(right_items)) => {
            left_items.len() == right_items.len()
                && left_items
                    .iter()
                    .zip(right_items)
                    .all(|(l, r)| values_equivalent(l, r))
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(value: Value) -> FormValues {
        FormValues::from_value(&value)
    }

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let snapshot = form(json!({
            "city": "Queens",
            "state": { "code": "NY", "name": "New York" },
            "tags": ["a", "b"],
            "active": true,
        }));
        assert!(!has_manual_changes(&snapshot, &snapshot));
    }

    #[test]
    fn test_empty_values_are_normalized() {
        let baseline = form(json!({ "city": "", "state": null }));
        let current = form(json!({ "city": "", "state": "" }));
        assert!(!has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_missing_key_equals_empty_value() {
        let baseline = form(json!({ "city": "Queens" }));
        let current = form(json!({ "city": "Queens", "unit": "" }));
        assert!(!has_manual_changes(&current, &baseline));
        assert!(!has_manual_changes(&baseline, &current));
    }

    #[test]
    fn test_coded_option_equals_raw_code() {
        let baseline = form(json!({ "state": "NY" }));
        let current = form(json!({ "state": { "code": "NY", "name": "New York" } }));
        assert!(!has_manual_changes(&current, &baseline));
        assert!(!has_manual_changes(&baseline, &current));
    }

    #[test]
    fn test_coded_option_differs_from_other_code() {
        let baseline = form(json!({ "state": "NJ" }));
        let current = form(json!({ "state": { "code": "NY" } }));
        assert!(has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_coded_objects_compare_by_code() {
        let baseline = form(json!({ "state": { "code": "NY", "name": "NEW YORK" } }));
        let current = form(json!({ "state": { "code": "NY", "name": "New York" } }));
        assert!(!has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_object_without_code_against_scalar_is_a_change() {
        let baseline = form(json!({ "owner": "Acme" }));
        let current = form(json!({ "owner": { "name": "Acme" } }));
        assert!(has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_edited_field_is_detected() {
        let baseline = form(json!({ "city": "Queens", "zip": "11101" }));
        let current = form(json!({ "city": "Queens", "zip": "11102" }));
        assert!(has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_clearing_a_value_is_detected() {
        let baseline = form(json!({ "city": "Queens" }));
        let current = form(json!({ "city": "" }));
        assert!(has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_nested_structures_normalize_recursively() {
        let baseline = form(json!({ "contacts": [{ "phone": null, "type": "NY" }] }));
        let current = form(json!({ "contacts": [{ "phone": "", "type": { "code": "NY" } }] }));
        assert!(!has_manual_changes(&current, &baseline));
    }

    #[test]
    fn test_type_mismatch_is_a_change() {
        assert!(!values_equivalent(&json!(1), &json!("1")));
        assert!(!values_equivalent(&json!([1]), &json!([1, 2])));
    }
}
