//! Single-item list/get tools (spec §3 catalog; grounded on
//! `mcp_wrapper.py`'s `list_processors`/`list_connections`/etc., collapsed
//! behind one handler per entity kind since the underlying client call
//! already returns the full list).

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_response_shaper::{shape_connection, shape_controller_service, shape_port, shape_process_group, shape_processor};
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

fn group_id_of(args: &Value) -> Result<String, DispatchError> {
    args.get("process_group_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DispatchError::BadRequest("missing required field 'process_group_id'".into()))
}

fn id_of(args: &Value, field: &str) -> Result<String, DispatchError> {
    args.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DispatchError::BadRequest(format!("missing required field '{field}'")))
}

fn group_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "process_group_id": { "type": "string" } },
        "required": ["process_group_id"],
    })
}

pub struct ListNiFiProcessors;

#[async_trait]
impl ToolHandler for ListNiFiProcessors {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = group_id_of(&args)?;
        let entities = ctx.nifi.list_processors(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": entities.iter().map(shape_processor).collect::<Vec<_>>() }))
    }
}

pub fn list_nifi_processors_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_processors",
        "Lists the processors directly inside a process group",
        "Returns a compact summary of every processor directly inside the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct ListNiFiConnections;

#[async_trait]
impl ToolHandler for ListNiFiConnections {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = group_id_of(&args)?;
        let entities = ctx.nifi.list_connections(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": entities.iter().map(shape_connection).collect::<Vec<_>>() }))
    }
}

pub fn list_nifi_connections_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_connections",
        "Lists the connections directly inside a process group",
        "Returns a compact summary of every connection directly inside the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct ListNiFiPorts;

#[async_trait]
impl ToolHandler for ListNiFiPorts {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = group_id_of(&args)?;
        let entities = ctx.nifi.list_ports(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": entities.iter().map(shape_port).collect::<Vec<_>>() }))
    }
}

pub fn list_nifi_ports_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_ports",
        "Lists the input and output ports directly inside a process group",
        "Returns a compact summary of every input and output port directly inside the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct ListNiFiProcessGroups;

#[async_trait]
impl ToolHandler for ListNiFiProcessGroups {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = group_id_of(&args)?;
        let entities = ctx.nifi.list_process_groups(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": entities.iter().map(shape_process_group).collect::<Vec<_>>() }))
    }
}

pub fn list_nifi_process_groups_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_process_groups",
        "Lists the child process groups directly inside a process group",
        "Returns a compact summary of every child process group directly inside the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct ListControllerServices;

#[async_trait]
impl ToolHandler for ListControllerServices {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = group_id_of(&args)?;
        let entities = ctx.nifi.list_controller_services(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": entities.iter().map(shape_controller_service).collect::<Vec<_>>() }))
    }
}

pub fn list_controller_services_descriptor() -> ToolDescriptor {
    describe(
        "list_controller_services",
        "Lists the controller services available to a process group",
        "Returns a compact summary of every controller service visible to the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct GetNiFiProcessGroupStatus;

#[async_trait]
impl ToolHandler for GetNiFiProcessGroupStatus {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = id_of(&args, "process_group_id")?;
        let status = ctx.nifi.group_status(&group_id).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": status }))
    }
}

pub fn get_nifi_process_group_status_descriptor() -> ToolDescriptor {
    describe(
        "get_nifi_process_group_status",
        "Fetches aggregate queue/throughput status for a process group",
        "Returns NiFi's aggregate status snapshot (queue sizes, throughput counters) for the given process group.",
        group_schema(),
        &[PhaseTag::Review, PhaseTag::Query, PhaseTag::Debug],
    )
}
