//! `document_nifi_flow` (spec §4.J): fetches one process group's
//! processors, ports and connections, then runs the pure flow-documenter
//! traversal over them.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

pub struct DocumentNiFiFlow;

#[async_trait]
impl ToolHandler for DocumentNiFiFlow {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = args
            .get("process_group_id")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'process_group_id'".into()))?;
        let include_properties = args.get("include_properties").and_then(Value::as_bool).unwrap_or(true);
        let include_descriptions = args.get("include_descriptions").and_then(Value::as_bool).unwrap_or(true);

        let processors = ctx.nifi.list_processors(group_id).await.map_err(DispatchError::from)?;
        let connections = ctx.nifi.list_connections(group_id).await.map_err(DispatchError::from)?;
        let ports = ctx.nifi.list_ports(group_id).await.map_err(DispatchError::from)?;

        let document = mw_flow_documenter::document_flow(&processors, &connections, &ports, include_properties, include_descriptions);
        Ok(json!({
            "result": serde_json::to_value(document).map_err(|e| DispatchError::Internal(e.to_string()))?
        }))
    }
}

pub fn document_nifi_flow_descriptor() -> ToolDescriptor {
    describe(
        "document_nifi_flow",
        "Summarizes a process group's flow: components, decision points, and source-to-sink paths",
        "Builds incoming/outgoing adjacency over the group's processors, ports and connections, \
         flags decision points (components with outgoing connections spanning more than one \
         relationship), traces source-to-sink flow paths, and lists unconnected components. \
         'include_properties' and 'include_descriptions' default to true.",
        json!({
            "type": "object",
            "properties": {
                "process_group_id": { "type": "string" },
                "include_properties": { "type": "boolean" },
                "include_descriptions": { "type": "boolean" },
            },
            "required": ["process_group_id"],
        }),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}
