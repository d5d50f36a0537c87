//! Process-group lifecycle (spec §3 catalog). Process groups are not one
//! of the four batch-create kinds (spec §4.F lists processors, ports,
//! controller services and connections only), so creation and renaming
//! get their own single-item tools; deletion goes through the generic
//! `delete_nifi_objects` batch tool alongside every other kind.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_response_shaper::shape_process_group;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

fn parse_position(item: &Value) -> (f64, f64) {
    let position = item.get("position");
    let x = position.and_then(|p| p.get("x")).and_then(Value::as_f64).unwrap_or(0.0);
    let y = position.and_then(|p| p.get("y")).and_then(Value::as_f64).unwrap_or(0.0);
    (x, y)
}

pub struct CreateNiFiProcessGroup;

#[async_trait]
impl ToolHandler for CreateNiFiProcessGroup {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let parent_id = args
            .get("parent_process_group_id")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'parent_process_group_id'".into()))?;
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'name'".into()))?;
        let entity = ctx
            .nifi
            .create_process_group(parent_id, name, parse_position(&args))
            .await
            .map_err(DispatchError::from)?;
        Ok(json!({ "result": shape_process_group(&entity) }))
    }
}

pub fn create_nifi_process_group_descriptor() -> ToolDescriptor {
    describe(
        "create_nifi_process_group",
        "Creates a new process group",
        "Creates a process group as a direct child of 'parent_process_group_id' with the given 'name'.",
        json!({
            "type": "object",
            "properties": {
                "parent_process_group_id": { "type": "string" },
                "name": { "type": "string" },
                "position": { "type": "object", "properties": { "x": {"type": "number"}, "y": {"type": "number"} } },
            },
            "required": ["parent_process_group_id", "name"],
        }),
        &[PhaseTag::Build],
    )
}

pub struct UpdateNiFiProcessGroup;

#[async_trait]
impl ToolHandler for UpdateNiFiProcessGroup {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let id = args
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'id'".into()))?;
        let patch = args
            .get("patch")
            .cloned()
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'patch'".into()))?;

        let current = ctx.nifi.get_process_group(id).await.map_err(DispatchError::from)?;
        let updated = ctx
            .nifi
            .update_process_group(id, current.revision, patch)
            .await
            .map_err(DispatchError::from)?;
        Ok(json!({ "result": shape_process_group(&updated) }))
    }
}

pub fn update_nifi_process_group_descriptor() -> ToolDescriptor {
    describe(
        "update_nifi_process_group",
        "Updates a process group's component fields (name, flowfile concurrency, etc.)",
        "Fetches the current revision and applies 'patch' as the component body, e.g. renaming \
         the group or changing its flowfile concurrency/outbound policy.",
        json!({
            "type": "object",
            "properties": { "id": { "type": "string" }, "patch": { "type": "object" } },
            "required": ["id", "patch"],
        }),
        &[PhaseTag::Modify],
    )
}
