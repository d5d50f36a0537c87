//! Normalizes caller-supplied argument shapes before dispatch (spec §4.C).
//!
//! Runs before a tool handler is invoked. Applies a declarative,
//! per-tool rename table, nested-self flattening, collection coercion,
//! and tool-specific structural checks, logging every auto-correction it
//! makes so callers can see what was tolerated.

mod rename_table;
mod structural;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("tool '{tool}': {message}")]
    BadRequest { tool: String, message: String },
    #[error("tool '{tool}': item {index}: {message}")]
    BadRequestAtIndex {
        tool: String,
        index: usize,
        message: String,
    },
}

/// Parameter names known to hold a list of items, which receive a
/// single-item wrap when the caller passed a lone mapping instead of a
/// one-element array (spec §4.C "Collection coercion").
const LIST_PARAMETERS: &[&str] = &["objects", "operations", "updates", "connections"];

/// Runs the full normalization pipeline for one tool call. `args` is
/// mutated in place. Idempotent: calling this twice in a row on the same
/// value produces the same result as calling it once (spec §8).
pub fn validate_arguments(tool: &str, args: &mut Value) -> Result<(), ValidationError> {
    let Value::Object(map) = args else {
        return Err(ValidationError::BadRequest {
            tool: tool.to_string(),
            message: "arguments must be a JSON object".into(),
        });
    };

    rename_table::apply_renames(tool, map);

    for key in LIST_PARAMETERS {
        flatten_nested_self(map, key);
        coerce_to_list(map, key);
    }

    structural::apply_structural_checks(tool, map)?;

    Ok(())
}

/// If `args[key]` is itself a single-key object whose only key equals
/// `key`, replace it with its inner value (spec §4.C "Nested-self
/// flattening" — tolerates `{"objects": {"objects": [...]}}`).
fn flatten_nested_self(map: &mut serde_json::Map<String, Value>, key: &str) {
    let Some(value) = map.get(key) else { return };
    if let Value::Object(inner) = value {
        if inner.len() == 1 && inner.contains_key(key) {
            let unwrapped = inner.get(key).cloned().unwrap();
            map.insert(key.to_string(), unwrapped);
        }
    }
}

/// If `args[key]` is present and is a single object (not an array), wrap
/// it in a one-element array (spec §4.C "Collection coercion").
fn coerce_to_list(map: &mut serde_json::Map<String, Value>, key: &str) {
    let Some(value) = map.get(key) else { return };
    if matches!(value, Value::Object(_)) {
        let item = map.remove(key).unwrap();
        map.insert(key.to_string(), Value::Array(vec![item]));
        log::debug!(target: "mw::validator", "coerced lone mapping for '{key}' into a single-item list");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renames_known_alias_for_bulk_delete() {
        let mut args = json!({ "deletion_requests": [{"object_type": "processor", "object_id": "p1"}] });
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        assert!(args.get("objects").is_some());
        assert!(args.get("deletion_requests").is_none());
    }

    #[test]
    fn does_not_override_canonical_name_if_present() {
        let mut args = json!({
            "objects": [{"object_type": "processor", "object_id": "p1"}],
            "delete_requests": [{"object_type": "processor", "object_id": "p2"}],
        });
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        let objects = args["objects"].as_array().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["object_id"], "p1");
    }

    #[test]
    fn flattens_nested_self_wrapping() {
        let mut args = json!({ "objects": { "objects": [{"object_type": "processor", "object_id": "p1"}] } });
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        assert!(args["objects"].is_array());
    }

    #[test]
    fn coerces_lone_mapping_into_single_item_list() {
        let mut args = json!({ "objects": {"object_type": "processor", "object_id": "p1"} });
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        assert_eq!(args["objects"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn is_idempotent() {
        let mut args = json!({ "deletion_requests": {"object_type": "processor", "object_id": "p1"} });
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        let once = args.clone();
        validate_arguments("delete_nifi_objects", &mut args).unwrap();
        assert_eq!(once, args);
    }
}
