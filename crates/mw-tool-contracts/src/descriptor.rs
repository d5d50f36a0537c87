//! Tool descriptors: the immutable, registration-time metadata every tool
//! handler publishes (spec §3 "Tool Descriptor", §4.D).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Operational phase a tool belongs to. Used to filter `/tools?phase=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseTag {
    Review,
    Build,
    Modify,
    Operate,
    Debug,
    Query,
    Verify,
}

#[derive(Debug, Error)]
pub enum ToolDescriptorError {
    #[error("tool name '{0}' does not match ^[a-z][a-z0-9_]*$")]
    InvalidName(String),
    #[error("tool '{name}': required field '{field}' is not present in properties")]
    RequiredNotInProperties { name: String, field: String },
    #[error("tool '{name}': enum value at '{path}' is not a string")]
    NonStringEnumValue { name: String, path: String },
}

/// Immutable, registration-time description of one tool (spec §3).
///
/// Invariants enforced by [`ToolDescriptor::validate`]: `name` matches
/// `^[a-z][a-z0-9_]*$`, `required` is a subset of `properties`' keys, and
/// every `enum` array in the schema contains only strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    pub example: Option<String>,
    /// JSON-Schema-shaped parameter description: `{"type": "object",
    /// "properties": {...}, "required": [...]}`.
    pub parameters: Value,
    pub phases: Vec<PhaseTag>,
}

impl ToolDescriptor {
    pub fn validate(&self) -> Result<(), ToolDescriptorError> {
        if !is_valid_tool_name(&self.name) {
            return Err(ToolDescriptorError::InvalidName(self.name.clone()));
        }

        let properties = self
            .parameters
            .get("properties")
            .and_then(Value::as_object);
        let required = self.parameters.get("required").and_then(Value::as_array);

        if let Some(required) = required {
            for field in required {
                let Some(field) = field.as_str() else {
                    continue;
                };
                let present = properties.is_some_and(|p| p.contains_key(field));
                if !present {
                    return Err(ToolDescriptorError::RequiredNotInProperties {
                        name: self.name.clone(),
                        field: field.to_string(),
                    });
                }
            }
        }

        check_enum_values_are_strings(&self.name, "parameters", &self.parameters)?;
        Ok(())
    }
}

fn is_valid_tool_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn check_enum_values_are_strings(
    tool_name: &str,
    path: &str,
    value: &Value,
) -> Result<(), ToolDescriptorError> {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(values)) = map.get("enum") {
                for (i, v) in values.iter().enumerate() {
                    if !v.is_string() {
                        return Err(ToolDescriptorError::NonStringEnumValue {
                            name: tool_name.to_string(),
                            path: format!("{path}.enum[{i}]"),
                        });
                    }
                }
            }
            for (key, v) in map {
                check_enum_values_are_strings(tool_name, &format!("{path}.{key}"), v)?;
            }
            Ok(())
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                check_enum_values_are_strings(tool_name, &format!("{path}[{i}]"), v)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str, parameters: Value) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            short_description: "short".into(),
            long_description: "long".into(),
            example: None,
            parameters,
            phases: vec![PhaseTag::Query],
        }
    }

    #[test]
    fn accepts_well_formed_descriptor() {
        let d = descriptor(
            "list_nifi_processors",
            json!({
                "type": "object",
                "properties": { "process_group_id": { "type": "string" } },
                "required": ["process_group_id"],
            }),
        );
        assert!(d.validate().is_ok());
    }

    #[test]
    fn rejects_bad_name() {
        let d = descriptor("ListProcessors", json!({"type": "object"}));
        assert!(matches!(
            d.validate(),
            Err(ToolDescriptorError::InvalidName(_))
        ));
    }

    #[test]
    fn rejects_required_not_in_properties() {
        let d = descriptor(
            "create_nifi_processors",
            json!({
                "type": "object",
                "properties": { "objects": { "type": "array" } },
                "required": ["objects", "ghost_field"],
            }),
        );
        assert!(matches!(
            d.validate(),
            Err(ToolDescriptorError::RequiredNotInProperties { .. })
        ));
    }

    #[test]
    fn rejects_non_string_enum_value() {
        let d = descriptor(
            "operate_nifi_objects",
            json!({
                "type": "object",
                "properties": {
                    "operation_type": { "type": "string", "enum": ["start", "stop", 3] }
                },
            }),
        );
        assert!(matches!(
            d.validate(),
            Err(ToolDescriptorError::NonStringEnumValue { .. })
        ));
    }
}
