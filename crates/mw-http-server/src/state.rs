//! Process-wide shared state (spec §5 "Shared resources"): the tool
//! registry and workflow catalog are read-only after startup; the NiFi
//! client is built fresh per request (see `context_for`).

use std::sync::Arc;
use std::time::Duration;

use mw_expert_help::ExpertHelpLimiter;
use mw_request_context::RequestContext;
use mw_tool_registry::ToolRegistry;
use nifi_client::NiFiClient;

use crate::config::MiddlewareConfig;
use crate::error::ApiError;
use crate::workflow_catalog::WorkflowCatalog;

/// Per-request budget for the deadline computed at entry (spec §5); not
/// itself part of the persisted configuration document.
const REQUEST_DEADLINE: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MiddlewareConfig>,
    pub registry: Arc<ToolRegistry>,
    pub workflows: Arc<WorkflowCatalog>,
}

impl AppState {
    pub fn new(config: MiddlewareConfig) -> Self {
        let mut registry = ToolRegistry::new();
        mw_tools::init(&mut registry, Arc::new(ExpertHelpLimiter::new()));
        let workflows = WorkflowCatalog::new(config.workflow.action_ceiling, config.workflow.retry_count);
        Self { config: Arc::new(config), registry: Arc::new(registry), workflows: Arc::new(workflows) }
    }

    /// Builds a request-scoped `RequestContext` bound to the NiFi server
    /// named by `nifi_server_id` (spec §4.B, §5 "the NiFi REST client is
    /// request-scoped"). `None`/unknown `nifi_server_id` is the caller's
    /// responsibility to have already rejected (spec §4.H "missing
    /// X-Nifi-Server-Id -> 400, unknown server id -> 400").
    pub fn context_for(
        &self,
        nifi_server_id: &str,
        user_request_id: Option<String>,
        action_id: Option<String>,
    ) -> Result<RequestContext, ApiError> {
        let server = self
            .config
            .server(nifi_server_id)
            .ok_or_else(|| ApiError::bad_request(format!("unknown NiFi server id '{nifi_server_id}'")))?;
        let client = NiFiClient::new(server).map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(RequestContext::new(Arc::new(client), nifi_server_id, user_request_id, action_id, REQUEST_DEADLINE))
    }
}
