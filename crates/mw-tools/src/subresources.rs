//! Async sub-resource tools (spec §4.A "Async sub-resource polling"):
//! purge a connection's queue, list its contents, and run a provenance
//! query. Each delegates to `nifi-client::poll`, which always deletes its
//! NiFi-side request object regardless of how polling ended.

use std::time::Duration;

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_response_shaper::shape_drop_request_summary;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use nifi_client::{NiFiClientError, DEFAULT_SUBRESOURCE_TIMEOUT};
use serde_json::{json, Value};

use crate::descriptor::describe;

fn timeout_of(args: &Value) -> Duration {
    args.get("timeout_seconds")
        .and_then(Value::as_u64)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SUBRESOURCE_TIMEOUT)
}

fn connection_id_of(args: &Value) -> Result<&str, DispatchError> {
    args.get("connection_id")
        .and_then(Value::as_str)
        .ok_or_else(|| DispatchError::BadRequest("missing required field 'connection_id'".into()))
}

pub struct PurgeNiFiConnectionQueue;

#[async_trait]
impl ToolHandler for PurgeNiFiConnectionQueue {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let connection_id = connection_id_of(&args)?;
        // A timeout here means the drop request was already deleted by
        // `purge_connection` before returning (spec §8 invariant 5) — it
        // is embedded as a failed-but-shaped result (spec §7), not a hard
        // dispatch error.
        match ctx.nifi.purge_connection(connection_id, timeout_of(&args)).await {
            Ok(outcome) => Ok(json!({
                "result": shape_drop_request_summary(
                    outcome.success,
                    outcome.message.as_deref(),
                    outcome.original_queue_size.as_deref(),
                    outcome.current_queue_size.as_deref(),
                    None,
                )
            })),
            Err(NiFiClientError::Timeout { sub_resource_id }) => Ok(json!({
                "result": shape_drop_request_summary(
                    false,
                    Some(&format!("timed out waiting for drop request {sub_resource_id} to finish")),
                    None,
                    None,
                    None,
                )
            })),
            Err(e) => Err(DispatchError::from(e)),
        }
    }
}

pub fn purge_nifi_connection_queue_descriptor() -> ToolDescriptor {
    describe(
        "purge_nifi_connection_queue",
        "Drops all flowfiles currently queued on a connection",
        "Creates a drop request against the connection's queue, polls it to completion (or \
         'timeout_seconds', default 30s), and always deletes the request afterward.",
        json!({
            "type": "object",
            "properties": { "connection_id": { "type": "string" }, "timeout_seconds": { "type": "integer" } },
            "required": ["connection_id"],
        }),
        &[PhaseTag::Operate, PhaseTag::Debug],
    )
}

pub struct ListNiFiConnectionQueue;

#[async_trait]
impl ToolHandler for ListNiFiConnectionQueue {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let connection_id = connection_id_of(&args)?;
        let listing = ctx
            .nifi
            .list_connection_queue(connection_id, timeout_of(&args))
            .await
            .map_err(DispatchError::from)?;
        Ok(json!({ "result": listing }))
    }
}

pub fn list_nifi_connection_queue_descriptor() -> ToolDescriptor {
    describe(
        "list_nifi_connection_queue",
        "Lists flowfile summaries currently queued on a connection",
        "Creates a listing request against the connection's queue, polls it to completion, and \
         always deletes the request afterward.",
        json!({
            "type": "object",
            "properties": { "connection_id": { "type": "string" }, "timeout_seconds": { "type": "integer" } },
            "required": ["connection_id"],
        }),
        &[PhaseTag::Debug, PhaseTag::Review],
    )
}

pub struct QueryNiFiProvenance;

#[async_trait]
impl ToolHandler for QueryNiFiProvenance {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let query = args
            .get("query")
            .cloned()
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'query'".into()))?;
        let results = ctx
            .nifi
            .query_provenance(query, timeout_of(&args))
            .await
            .map_err(DispatchError::from)?;
        Ok(json!({ "result": results }))
    }
}

pub fn query_nifi_provenance_descriptor() -> ToolDescriptor {
    describe(
        "query_nifi_provenance",
        "Runs a provenance search query against NiFi's provenance repository",
        "Submits 'query' as NiFi's provenance search request body, polls it to completion (or \
         'timeout_seconds', default 30s), and always deletes the query afterward.",
        json!({
            "type": "object",
            "properties": { "query": { "type": "object" }, "timeout_seconds": { "type": "integer" } },
            "required": ["query"],
        }),
        &[PhaseTag::Debug, PhaseTag::Verify],
    )
}
