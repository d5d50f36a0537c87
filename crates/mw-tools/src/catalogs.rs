//! Global catalog tools that don't belong to one process group (spec §4.A
//! "Unique operations", §5 "Open question: single-processor lookup tool
//! removed or retained" — decided in favor of the batch-only form, see
//! DESIGN.md).

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

pub struct ListNiFiProcessorTypes;

#[async_trait]
impl ToolHandler for ListNiFiProcessorTypes {
    async fn call(&self, ctx: &RequestContext, _args: Value) -> Result<Value, DispatchError> {
        let types = ctx.nifi.processor_types().await.map_err(DispatchError::from)?;
        Ok(json!({ "result": types }))
    }
}

pub fn list_nifi_processor_types_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_processor_types",
        "Lists every processor type this NiFi instance has installed",
        "Returns NiFi's full processor-type catalog. The single-type lookup tool from the \
         original implementation is not carried over; this batch form subsumes it.",
        json!({ "type": "object", "properties": {} }),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct ListControllerServiceTypes;

#[async_trait]
impl ToolHandler for ListControllerServiceTypes {
    async fn call(&self, ctx: &RequestContext, _args: Value) -> Result<Value, DispatchError> {
        let types = ctx.nifi.controller_service_types().await.map_err(DispatchError::from)?;
        Ok(json!({ "result": types }))
    }
}

pub fn list_controller_service_types_descriptor() -> ToolDescriptor {
    describe(
        "list_controller_service_types",
        "Lists every controller service type this NiFi instance has installed",
        "Returns NiFi's full controller-service-type catalog.",
        json!({ "type": "object", "properties": {} }),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct SearchNiFiFlow;

#[async_trait]
impl ToolHandler for SearchNiFiFlow {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'query'".into()))?;
        let results = ctx.nifi.search_flow(query).await.map_err(DispatchError::from)?;
        Ok(json!({ "result": results }))
    }
}

pub fn search_nifi_flow_descriptor() -> ToolDescriptor {
    describe(
        "search_nifi_flow",
        "Searches the whole flow by name/id/type substring",
        "Forwards 'query' to NiFi's flow search endpoint, returning matching processors, \
         connections, process groups and controller services across the whole instance.",
        json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"],
        }),
        &[PhaseTag::Review, PhaseTag::Query],
    )
}

pub struct GetNiFiBulletinBoard;

#[async_trait]
impl ToolHandler for GetNiFiBulletinBoard {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let group_id = args.get("process_group_id").and_then(Value::as_str);
        let source_id = args.get("source_id").and_then(Value::as_str);
        let limit = args.get("limit").and_then(Value::as_u64).map(|v| v as u32);
        let bulletins = ctx
            .nifi
            .get_bulletin_board(group_id, source_id, limit)
            .await
            .map_err(DispatchError::from)?;
        Ok(json!({ "result": bulletins }))
    }
}

pub fn get_nifi_bulletin_board_descriptor() -> ToolDescriptor {
    describe(
        "get_nifi_bulletin_board",
        "Fetches recent bulletins, optionally scoped by group/source/limit",
        "Returns the bulletin board, optionally filtered to a process group and/or source \
         component, capped at 'limit' entries.",
        json!({
            "type": "object",
            "properties": {
                "process_group_id": { "type": "string" },
                "source_id": { "type": "string" },
                "limit": { "type": "integer" },
            },
        }),
        &[PhaseTag::Debug, PhaseTag::Review],
    )
}
