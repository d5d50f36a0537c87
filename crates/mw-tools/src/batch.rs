//! The eight batch tools (spec §4.D list, §4.F): thin handlers that pull
//! their arrays out of the already-validated arguments and delegate to
//! `mw-batch-orchestrator`, wrapping the per-item results under a
//! `result` key so the registry's normalizer passes the array through
//! untouched regardless of how many items it holds.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

fn items_of(args: &Value, field: &str) -> Vec<Value> {
    args.get(field).and_then(Value::as_array).cloned().unwrap_or_default()
}

fn group_id_of(args: &Value) -> Result<String, DispatchError> {
    args.get("process_group_id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DispatchError::BadRequest("missing required field 'process_group_id'".into()))
}

fn object_schema(extra_properties: Value, extra_required: &[&str]) -> Value {
    let mut required = vec!["process_group_id".to_string(), "objects".to_string()];
    required.extend(extra_required.iter().map(|s| s.to_string()));
    json!({
        "type": "object",
        "properties": {
            "process_group_id": { "type": "string" },
            "objects": { "type": "array", "items": extra_properties },
        },
        "required": required,
    })
}

fn to_result_value<T: serde::Serialize>(results: Result<Vec<T>, mw_batch_orchestrator::OrchestratorError>) -> Result<Value, DispatchError> {
    let results = results.map_err(|e| match e {
        mw_batch_orchestrator::OrchestratorError::EmptyBatch => DispatchError::BadRequest(e.to_string()),
        mw_batch_orchestrator::OrchestratorError::Client(source) => DispatchError::from(source),
    })?;
    Ok(json!({ "result": serde_json::to_value(results).map_err(|e| DispatchError::Internal(e.to_string()))? }))
}

/// Batch tools scoped to a process group (the four create tools).
macro_rules! grouped_batch_handler {
    ($struct_name:ident, $field:literal, $orchestrator_fn:path) => {
        pub struct $struct_name;

        #[async_trait]
        impl ToolHandler for $struct_name {
            async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
                let group_id = group_id_of(&args)?;
                let items = items_of(&args, $field);
                to_result_value($orchestrator_fn(&ctx.nifi, &group_id, &items).await)
            }
        }
    };
}

/// Batch tools that act on objects already identified by id (update,
/// delete, operate) and need no process-group scope.
macro_rules! flat_batch_handler {
    ($struct_name:ident, $field:literal, $orchestrator_fn:path) => {
        pub struct $struct_name;

        #[async_trait]
        impl ToolHandler for $struct_name {
            async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
                let items = items_of(&args, $field);
                to_result_value($orchestrator_fn(&ctx.nifi, &items).await)
            }
        }
    };
}

grouped_batch_handler!(CreateNiFiProcessors, "objects", mw_batch_orchestrator::create_nifi_processors);
grouped_batch_handler!(CreateNiFiPorts, "objects", mw_batch_orchestrator::create_nifi_ports);
grouped_batch_handler!(CreateControllerServices, "objects", mw_batch_orchestrator::create_controller_services);
grouped_batch_handler!(CreateNiFiConnections, "connections", mw_batch_orchestrator::create_nifi_connections);
flat_batch_handler!(UpdateNiFiProcessorsProperties, "updates", mw_batch_orchestrator::update_nifi_processors_properties);
flat_batch_handler!(UpdateNiFiConnection, "updates", mw_batch_orchestrator::update_nifi_connection);
flat_batch_handler!(DeleteNiFiObjects, "objects", mw_batch_orchestrator::delete_nifi_objects);
flat_batch_handler!(OperateNiFiObjects, "operations", mw_batch_orchestrator::operate_nifi_objects);

pub fn create_nifi_processors_descriptor() -> ToolDescriptor {
    describe(
        "create_nifi_processors",
        "Creates one or more processors in a process group",
        "Creates a batch of processors. Each item needs 'type' and optionally 'name' and 'position'. \
         One failing item never aborts the rest of the batch; the result array has one entry per input item.",
        object_schema(json!({ "type": "object", "properties": { "type": {"type": "string"}, "name": {"type": "string"} } }), &[]),
        &[PhaseTag::Build],
    )
}

pub fn create_nifi_ports_descriptor() -> ToolDescriptor {
    describe(
        "create_nifi_ports",
        "Creates one or more input/output ports in a process group",
        "Creates a batch of ports. Each item needs 'name' and 'port_type' (INPUT_PORT or OUTPUT_PORT).",
        object_schema(
            json!({ "type": "object", "properties": { "name": {"type": "string"}, "port_type": {"type": "string", "enum": ["INPUT_PORT", "OUTPUT_PORT"]} } }),
            &[],
        ),
        &[PhaseTag::Build],
    )
}

pub fn create_controller_services_descriptor() -> ToolDescriptor {
    describe(
        "create_controller_services",
        "Creates one or more controller services in a process group",
        "Creates a batch of controller services. Each item needs 'type' and optionally 'name'.",
        object_schema(json!({ "type": "object", "properties": { "type": {"type": "string"}, "name": {"type": "string"} } }), &[]),
        &[PhaseTag::Build],
    )
}

pub fn create_nifi_connections_descriptor() -> ToolDescriptor {
    describe(
        "create_nifi_connections",
        "Creates one or more connections between named components",
        "Creates a batch of connections. Each item needs 'source_name', 'target_name' and a non-empty \
         'relationships' list; names are resolved by scanning the group's processors and ports, \
         failing with a distinct message if a name is missing or ambiguous.",
        json!({
            "type": "object",
            "properties": {
                "process_group_id": { "type": "string" },
                "connections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "source_name": { "type": "string" },
                            "target_name": { "type": "string" },
                            "relationships": { "type": "array", "items": { "type": "string" } },
                            "name": { "type": "string" },
                        },
                        "required": ["source_name", "target_name", "relationships"],
                    },
                },
            },
            "required": ["process_group_id", "connections"],
        }),
        &[PhaseTag::Build],
    )
}

pub fn update_nifi_processors_properties_descriptor() -> ToolDescriptor {
    describe(
        "update_nifi_processors_properties",
        "Updates properties on one or more processors",
        "Each item needs 'id' and 'properties'; the current revision is fetched before the update, \
         so callers never supply one themselves.",
        json!({
            "type": "object",
            "properties": {
                "updates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "id": {"type": "string"}, "properties": {"type": "object"} },
                        "required": ["id", "properties"],
                    },
                },
            },
            "required": ["updates"],
        }),
        &[PhaseTag::Modify],
    )
}

pub fn update_nifi_connection_descriptor() -> ToolDescriptor {
    describe(
        "update_nifi_connection",
        "Updates the relationship set on one or more connections",
        "Each item needs 'id' and a 'relationships' list. Updating a connection with an empty \
         'relationships' list is rejected; use delete_nifi_objects to remove a connection instead.",
        json!({
            "type": "object",
            "properties": {
                "updates": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "id": {"type": "string"}, "relationships": {"type": "array", "items": {"type": "string"}} },
                        "required": ["id"],
                    },
                },
            },
            "required": ["updates"],
        }),
        &[PhaseTag::Modify],
    )
}

pub fn delete_nifi_objects_descriptor() -> ToolDescriptor {
    describe(
        "delete_nifi_objects",
        "Deletes one or more NiFi objects, regardless of kind",
        "Each item needs 'object_type' (processor, connection, port, controller_service, \
         process_group) and 'object_id'. Deletes are reordered internally — connections, then \
         components, then groups — but the response preserves the caller's original order. \
         Deleting an already-missing object is treated as success.",
        json!({
            "type": "object",
            "properties": {
                "objects": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "object_type": { "type": "string", "enum": ["processor", "connection", "port", "controller_service", "process_group"] },
                            "object_id": { "type": "string" },
                        },
                        "required": ["object_type", "object_id"],
                    },
                },
            },
            "required": ["objects"],
        }),
        &[PhaseTag::Modify, PhaseTag::Operate],
    )
}

pub fn operate_nifi_objects_descriptor() -> ToolDescriptor {
    describe(
        "operate_nifi_objects",
        "Starts, stops, enables or disables one or more NiFi objects",
        "Each item needs 'object_type', 'object_id' and 'operation_type'. start/stop apply to \
         processors and ports; enable/disable apply only to controller services. An invalid \
         component is refused with a distinct message rather than forwarded to NiFi.",
        json!({
            "type": "object",
            "properties": {
                "operations": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "object_type": { "type": "string", "enum": ["processor", "port", "controller_service"] },
                            "object_id": { "type": "string" },
                            "operation_type": { "type": "string", "enum": ["start", "stop", "enable", "disable"] },
                        },
                        "required": ["object_type", "object_id", "operation_type"],
                    },
                },
            },
            "required": ["operations"],
        }),
        &[PhaseTag::Operate],
    )
}
