//! Tool-specific structural checks (spec §4.C "Tool-specific structural
//! checks").

use serde_json::{Map, Value};

use crate::ValidationError;

pub(crate) fn apply_structural_checks(
    tool: &str,
    map: &Map<String, Value>,
) -> Result<(), ValidationError> {
    match tool {
        "create_nifi_connections" => check_items(tool, map, "connections", check_connection_item),
        "operate_nifi_objects" => check_items(tool, map, "operations", check_operation_item),
        "delete_nifi_objects" => check_items(tool, map, "objects", check_delete_item),
        _ => Ok(()),
    }
}

fn check_items(
    tool: &str,
    map: &Map<String, Value>,
    field: &str,
    check_one: impl Fn(&Value) -> Result<(), &'static str>,
) -> Result<(), ValidationError> {
    let Some(items) = map.get(field).and_then(Value::as_array) else {
        return Ok(());
    };
    for (index, item) in items.iter().enumerate() {
        check_one(item).map_err(|message| ValidationError::BadRequestAtIndex {
            tool: tool.to_string(),
            index,
            message: message.to_string(),
        })?;
    }
    Ok(())
}

fn require_str_field<'a>(item: &'a Value, field: &'static str) -> Result<&'a str, &'static str> {
    item.get(field).and_then(Value::as_str).ok_or(field)
}

fn check_connection_item(item: &Value) -> Result<(), &'static str> {
    require_str_field(item, "source_name")?;
    require_str_field(item, "target_name")?;
    let relationships = item
        .get("relationships")
        .and_then(Value::as_array)
        .ok_or("relationships")?;
    if relationships.is_empty() {
        return Err("relationships");
    }
    Ok(())
}

fn check_delete_item(item: &Value) -> Result<(), &'static str> {
    require_str_field(item, "object_type")?;
    require_str_field(item, "object_id")?;
    Ok(())
}

const CONTROLLER_SERVICE_ONLY_OPS: &[&str] = &["enable", "disable"];
const NON_CONTROLLER_SERVICE_OPS: &[&str] = &["start", "stop"];

fn check_operation_item(item: &Value) -> Result<(), &'static str> {
    let object_type = require_str_field(item, "object_type")?;
    require_str_field(item, "object_id")?;
    let operation_type = require_str_field(item, "operation_type")?;

    let is_controller_service = object_type == "controller_service";
    if CONTROLLER_SERVICE_ONLY_OPS.contains(&operation_type) && !is_controller_service {
        return Err("operation_type");
    }
    if NON_CONTROLLER_SERVICE_OPS.contains(&operation_type) && is_controller_service {
        return Err("operation_type");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_connection_items() {
        let map: Map<String, Value> = json!({
            "connections": [{"source_name": "A", "target_name": "B", "relationships": ["success"]}]
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(apply_structural_checks("create_nifi_connections", &map).is_ok());
    }

    #[test]
    fn rejects_connection_item_missing_target_name() {
        let map: Map<String, Value> = json!({
            "connections": [{"source_name": "A", "relationships": ["success"]}]
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(apply_structural_checks("create_nifi_connections", &map).is_err());
    }

    #[test]
    fn rejects_enable_on_non_controller_service() {
        let map: Map<String, Value> = json!({
            "operations": [{"object_type": "processor", "object_id": "p1", "operation_type": "enable"}]
        })
        .as_object()
        .unwrap()
        .clone();
        let err = apply_structural_checks("operate_nifi_objects", &map).unwrap_err();
        match err {
            ValidationError::BadRequestAtIndex { index, .. } => assert_eq!(index, 0),
            _ => panic!("expected BadRequestAtIndex"),
        }
    }

    #[test]
    fn rejects_start_on_controller_service() {
        let map: Map<String, Value> = json!({
            "operations": [{"object_type": "controller_service", "object_id": "cs1", "operation_type": "start"}]
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(apply_structural_checks("operate_nifi_objects", &map).is_err());
    }

    #[test]
    fn accepts_start_on_processor() {
        let map: Map<String, Value> = json!({
            "operations": [{"object_type": "processor", "object_id": "p1", "operation_type": "start"}]
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(apply_structural_checks("operate_nifi_objects", &map).is_ok());
    }
}
