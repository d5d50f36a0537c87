//! Axum route handlers (spec §4.H "HTTP/SSE Front-End").
//!
//! Header conventions used on every `/tools/*` and `/workflows/execute`
//! call: `X-Nifi-Server-Id` (required, 400 if missing or unknown),
//! `X-Request-ID` and `X-Action-ID` (both optional, default to `-`).

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use mw_tool_contracts::PhaseTag;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::ApiError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/config/nifi-servers", get(list_nifi_servers))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(call_tool))
        .route("/workflows", get(list_workflows))
        .route("/workflows/:name", get(get_workflow))
        .route("/workflows/validate/:name", get(validate_workflow))
        .route("/workflows/execute", post(execute_workflow))
        .route("/sse/tools/:name", get(stream_tool))
        .with_state(Arc::new(state))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

fn require_nifi_server_id(headers: &HeaderMap) -> Result<String, ApiError> {
    header_str(headers, "X-Nifi-Server-Id").ok_or_else(|| ApiError::bad_request("missing required header X-Nifi-Server-Id"))
}

#[derive(Debug, Serialize)]
struct NiFiServerSummary {
    id: String,
    name: String,
}

async fn list_nifi_servers(State(state): State<Arc<AppState>>) -> Json<Vec<NiFiServerSummary>> {
    let servers = state
        .config
        .nifi_servers
        .iter()
        .map(|s| NiFiServerSummary { id: s.id.clone(), name: s.display_name.clone() })
        .collect();
    Json(servers)
}

#[derive(Debug, Deserialize)]
struct ListToolsQuery {
    phase: Option<PhaseTag>,
}

async fn list_tools(State(state): State<Arc<AppState>>, Query(query): Query<ListToolsQuery>) -> impl IntoResponse {
    let descriptors: Vec<_> = state.registry.list(query.phase).into_iter().cloned().collect();
    Json(descriptors)
}

#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    #[serde(default)]
    arguments: Value,
}

async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<ToolCallRequest>,
) -> Result<Json<Value>, ApiError> {
    if state.registry.descriptor(&name).is_none() {
        return Err(ApiError::not_found(format!("unknown tool '{name}'")));
    }
    let server_id = require_nifi_server_id(&headers)?;
    let ctx = state.context_for(&server_id, header_str(&headers, "X-Request-ID"), header_str(&headers, "X-Action-ID"))?;
    let result = state.registry.dispatch(&ctx, &name, body.arguments).await?;
    Ok(Json(result))
}

async fn list_workflows(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "workflows": state.workflows.list() }))
}

async fn get_workflow(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Result<Json<Value>, ApiError> {
    let definition = state.workflows.get(&name).ok_or_else(|| ApiError::not_found(format!("unknown workflow '{name}'")))?;
    let steps: Vec<Value> = definition
        .nodes
        .iter()
        .map(|n| json!({ "name": n.name(), "description": n.description(), "max_actions": n.max_actions(), "max_retries": n.max_retries() }))
        .collect();
    Ok(Json(json!({ "name": definition.name, "description": definition.description, "steps": steps })))
}

async fn validate_workflow(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Result<Json<Value>, ApiError> {
    let problems = state.workflows.validate(&name).ok_or_else(|| ApiError::not_found(format!("unknown workflow '{name}'")))?;
    Ok(Json(json!({ "valid": problems.is_empty(), "problems": problems })))
}

#[derive(Debug, Deserialize)]
struct ExecuteWorkflowRequest {
    name: String,
}

async fn execute_workflow(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ExecuteWorkflowRequest>,
) -> Result<Json<Value>, ApiError> {
    let executor = state.workflows.executor(&body.name).ok_or_else(|| ApiError::not_found(format!("unknown workflow '{}'", body.name)))?;
    let server_id = require_nifi_server_id(&headers)?;
    let ctx = state.context_for(&server_id, header_str(&headers, "X-Request-ID"), header_str(&headers, "X-Action-ID"))?;
    let outcome = executor.run(&ctx, &state.registry).await;
    Ok(Json(json!({
        "status": outcome.status,
        "error_message": outcome.error_message,
        "error_type": outcome.error_type,
        "summary": outcome.summary,
        "step_details": outcome.step_details,
    })))
}

#[derive(Debug, Deserialize)]
struct StreamToolQuery {
    #[serde(default)]
    arguments: Option<String>,
}

/// Emits `start`, zero or more `progress`, then exactly one terminal
/// `complete`/`error` (spec §4.H). A plain tool call has no intermediate
/// progress of its own — that granularity belongs to sub-resource polling
/// inside the NiFi client and to workflow execution — so this stream is
/// always `start` followed immediately by the terminal event.
async fn stream_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Query(query): Query<StreamToolQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    if state.registry.descriptor(&name).is_none() {
        return Err(ApiError::not_found(format!("unknown tool '{name}'")));
    }
    let server_id = require_nifi_server_id(&headers)?;
    let ctx = state.context_for(&server_id, header_str(&headers, "X-Request-ID"), header_str(&headers, "X-Action-ID"))?;

    let arguments: Value = match query.arguments {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| ApiError::bad_request(format!("invalid arguments JSON: {e}")))?,
        None => json!({}),
    };

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
    let registry = state.registry.clone();

    tokio::spawn(async move {
        send_event(&tx, Event::default().event("start").json_data(json!({ "tool": name.as_str() })));
        match registry.dispatch(&ctx, &name, arguments).await {
            Ok(result) => send_event(&tx, Event::default().event("complete").json_data(result)),
            Err(e) => send_event(&tx, Event::default().event("error").json_data(json!({ "message": e.to_string() }))),
        }
    });

    let stream = UnboundedReceiverStream::new(rx).map(Ok);
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

fn send_event(tx: &tokio::sync::mpsc::UnboundedSender<Event>, built: Result<Event, axum::Error>) {
    match built {
        Ok(event) => {
            let _ = tx.send(event);
        }
        Err(e) => {
            let _ = tx.send(Event::default().event("error").data(format!("failed to encode SSE payload: {e}")));
        }
    }
}
