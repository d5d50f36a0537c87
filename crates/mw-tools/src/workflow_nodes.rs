//! Generic tool-dispatch workflow node (spec §4.G: "nodes... may call
//! tools"), grounded in `NiFiWorkflowNode.call_mcp_tool`
//! (`original_source/nifi_mcp_server/workflows/nodes/nifi_node.py`): check
//! the action budget, then dispatch one named tool through the registry.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_tool_registry::ToolRegistry;
use mw_workflow_engine::{ActionBudget, NodeResult, PreparedContext, WorkflowNode};
use serde_json::{json, Value};

pub struct ToolCallNode {
    name: String,
    description: String,
    tool_name: String,
    max_actions: usize,
    max_retries: u32,
    arguments: Value,
}

impl ToolCallNode {
    pub fn new(name: impl Into<String>, description: impl Into<String>, tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tool_name: tool_name.into(),
            max_actions: 10,
            max_retries: 0,
            arguments,
        }
    }

    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl WorkflowNode for ToolCallNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn max_actions(&self) -> usize {
        self.max_actions
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    async fn exec(&self, ctx: &RequestContext, _prepared: &PreparedContext, registry: &ToolRegistry, budget: &ActionBudget) -> NodeResult {
        if let Err(limit) = budget.record_call() {
            return json!({
                "status": "error",
                "error_type": "action_limit_exceeded",
                "message": limit.to_string(),
                "actions_taken": budget.count(),
            });
        }

        match registry.dispatch(ctx, &self.tool_name, self.arguments.clone()).await {
            Ok(mut result) => {
                if let Value::Object(ref mut map) = result {
                    map.entry("status").or_insert_with(|| json!("success"));
                }
                result
            }
            Err(e) => json!({ "status": "error", "message": e.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_expert_help::ExpertHelpLimiter;
    use nifi_client::{NiFiClient, NiFiServerConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn noop_context() -> RequestContext {
        let client = Arc::new(
            NiFiClient::new(&NiFiServerConfig {
                id: "test".into(),
                display_name: "test".into(),
                base_url: "http://localhost:8080".into(),
                username: None,
                password: None,
                verify_tls: true,
                timeout_seconds: 5,
            })
            .unwrap(),
        );
        RequestContext::new(client, "test", None, None, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn a_tool_call_node_refuses_to_dispatch_once_its_budget_is_spent() {
        let mut registry = ToolRegistry::new();
        crate::init(&mut registry, Arc::new(ExpertHelpLimiter::new()));
        let node = ToolCallNode::new("ask", "", "ask_nifi_expert", json!({ "question": "why?" })).with_max_actions(0);
        let budget = ActionBudget::new("ask", 0);
        let ctx = noop_context();
        let prepared = PreparedContext { shared: json!({}), recent_results: vec![], milestones: vec![] };
        let result = node.exec(&ctx, &prepared, &registry, &budget).await;
        assert_eq!(result["status"], "error");
        assert_eq!(result["error_type"], "action_limit_exceeded");
    }
}
