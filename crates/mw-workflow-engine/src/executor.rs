//! Linear chain executor (spec §4.G): single-threaded and synchronous
//! within one workflow run, enforcing the per-node action ceiling and the
//! request deadline before each `exec`.

use std::sync::Arc;

use chrono::Utc;
use mw_request_context::RequestContext;
use mw_tool_registry::ToolRegistry;
use serde_json::json;

use crate::action_budget::ActionBudget;
use crate::navigation::{navigation_of, Navigation};
use crate::node::WorkflowNode;
use crate::progress::{ProgressSummary, StepDetail, StepStatus, WorkflowStatus};
use crate::state::SharedState;

pub struct WorkflowExecutor {
    name: String,
    nodes: Vec<Arc<dyn WorkflowNode>>,
}

/// What a finished (or halted) workflow run reports back to the caller.
pub struct WorkflowRunOutcome {
    pub status: WorkflowStatus,
    pub error_message: Option<String>,
    /// The failing node's `error_type` (e.g. `action_limit_exceeded`), if
    /// its result carried one. Only ever set when `status` is `Failed`.
    pub error_type: Option<String>,
    pub summary: ProgressSummary,
    pub step_details: Vec<StepDetail>,
}

impl WorkflowExecutor {
    pub fn new(name: impl Into<String>, nodes: Vec<Arc<dyn WorkflowNode>>) -> Self {
        Self { name: name.into(), nodes }
    }

    pub async fn run(&self, ctx: &RequestContext, registry: &ToolRegistry) -> WorkflowRunOutcome {
        let mut state = SharedState::new(self.name.clone());
        let now = Utc::now();
        state.progress.start_workflow(now);

        for node in &self.nodes {
            let step_name = node.name().to_string();

            if ctx.is_past_deadline() {
                let now = Utc::now();
                let message = format!("workflow deadline exceeded before step '{step_name}' could start");
                state.progress.complete_workflow(now, false, Some(message.clone()));
                return finish(state, WorkflowStatus::Failed, Some(message), None);
            }

            let now = Utc::now();
            state.progress.start_step(&step_name, node.description(), now);
            state.progress.update_step_status(&step_name, StepStatus::Preparing, None, now);

            let prepared = node.prep(&state).await;
            state
                .progress
                .update_step_status(&step_name, StepStatus::Running, None, Utc::now());

            let budget = ActionBudget::new(step_name.clone(), node.max_actions());

            let mut attempt = 0u32;
            let mut retries_exhausted = false;
            let result = loop {
                attempt += 1;
                let result = node.exec(ctx, &prepared, registry, &budget).await;
                if navigation_of(&result) == Navigation::Retry {
                    if attempt <= node.max_retries() {
                        log::warn!(
                            target: "mw_workflow_engine::executor",
                            "{}: step '{step_name}' retrying (attempt {attempt})",
                            ctx.log_prefix()
                        );
                        continue;
                    }
                    retries_exhausted = true;
                }
                break result;
            };

            state.progress.set_step_action_count(&step_name, budget.count());

            let navigation = node.post(&mut state, result.clone());
            // A node that still asks to retry once its budget is spent has
            // exhausted its chances (SPEC_FULL §5 item 4): fall through to
            // error rather than letting the step read as completed.
            let navigation = if retries_exhausted && navigation == Navigation::Retry {
                Navigation::Error
            } else {
                navigation
            };

            match navigation {
                Navigation::Error => {
                    let message = error_message_of(&result);
                    let error_type = error_type_of(&result);
                    state
                        .progress
                        .update_step_status(&step_name, StepStatus::Failed, Some(message.clone()), Utc::now());
                    let now = Utc::now();
                    state.progress.complete_workflow(now, false, Some(message.clone()));
                    return finish(state, WorkflowStatus::Failed, Some(message), error_type);
                }
                Navigation::Paused => {
                    state
                        .progress
                        .update_step_status(&step_name, StepStatus::Skipped, None, Utc::now());
                    state.progress.pause_workflow();
                    return finish(state, WorkflowStatus::Paused, None, None);
                }
                Navigation::Default | Navigation::Retry => {
                    state
                        .progress
                        .update_step_status(&step_name, StepStatus::Completed, None, Utc::now());
                }
            }
        }

        let now = Utc::now();
        state.progress.complete_workflow(now, true, None);
        finish(state, WorkflowStatus::Completed, None, None)
    }
}

fn error_message_of(result: &serde_json::Value) -> String {
    result
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| json!(result).to_string())
}

fn error_type_of(result: &serde_json::Value) -> Option<String> {
    result.get("error_type").and_then(serde_json::Value::as_str).map(str::to_string)
}

fn finish(
    state: SharedState,
    status: WorkflowStatus,
    error_message: Option<String>,
    error_type: Option<String>,
) -> WorkflowRunOutcome {
    let now = Utc::now();
    WorkflowRunOutcome {
        status,
        error_message,
        error_type,
        summary: state.progress.get_progress_summary(now),
        step_details: state.progress.get_step_details(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mw_tool_registry::ToolRegistry;
    use nifi_client::{NiFiClient, NiFiServerConfig};
    use serde_json::json;
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

    struct AlwaysSucceeds(&'static str);

    #[async_trait]
    impl WorkflowNode for AlwaysSucceeds {
        fn name(&self) -> &str {
            self.0
        }

        async fn exec(
            &self,
            _ctx: &RequestContext,
            _prepared: &crate::state::PreparedContext,
            _registry: &ToolRegistry,
            _budget: &ActionBudget,
        ) -> crate::node::NodeResult {
            json!({ "status": "success", "step": self.0 })
        }
    }

    struct AlwaysErrors;

    #[async_trait]
    impl WorkflowNode for AlwaysErrors {
        fn name(&self) -> &str {
            "boom"
        }

        async fn exec(
            &self,
            _ctx: &RequestContext,
            _prepared: &crate::state::PreparedContext,
            _registry: &ToolRegistry,
            _budget: &ActionBudget,
        ) -> crate::node::NodeResult {
            json!({ "status": "error", "message": "it broke", "error_type": "action_limit_exceeded" })
        }
    }

    struct AlwaysRetries(u32);

    #[async_trait]
    impl WorkflowNode for AlwaysRetries {
        fn name(&self) -> &str {
            "flaky"
        }

        fn max_retries(&self) -> u32 {
            self.0
        }

        async fn exec(
            &self,
            _ctx: &RequestContext,
            _prepared: &crate::state::PreparedContext,
            _registry: &ToolRegistry,
            budget: &ActionBudget,
        ) -> crate::node::NodeResult {
            let _ = budget.record_call();
            json!({ "status": "retry", "message": "still not ready" })
        }
    }

    #[tokio::test]
    async fn chains_nodes_and_completes_on_all_success() {
        let executor = WorkflowExecutor::new(
            "demo",
            vec![Arc::new(AlwaysSucceeds("a")), Arc::new(AlwaysSucceeds("b"))],
        );
        let registry = ToolRegistry::new();
        let outcome = executor.run(&noop_context(), &registry).await;
        assert_eq!(outcome.status, WorkflowStatus::Completed);
        assert_eq!(outcome.step_details.len(), 2);
    }

    #[tokio::test]
    async fn stops_and_reports_failed_on_first_error_node() {
        let executor = WorkflowExecutor::new(
            "demo",
            vec![Arc::new(AlwaysSucceeds("a")), Arc::new(AlwaysErrors), Arc::new(AlwaysSucceeds("never runs"))],
        );
        let registry = ToolRegistry::new();
        let outcome = executor.run(&noop_context(), &registry).await;
        assert_eq!(outcome.status, WorkflowStatus::Failed);
        assert_eq!(outcome.error_message.as_deref(), Some("it broke"));
        assert_eq!(outcome.error_type.as_deref(), Some("action_limit_exceeded"));
        // the third node never ran
        assert_eq!(outcome.step_details.len(), 2);
    }

    #[tokio::test]
    async fn syncs_the_action_budget_tally_onto_the_step_details() {
        let executor = WorkflowExecutor::new("demo", vec![Arc::new(AlwaysRetries(2))]);
        let registry = ToolRegistry::new();
        let outcome = executor.run(&noop_context(), &registry).await;
        // one initial attempt plus two retries, each recording one action
        assert_eq!(outcome.step_details[0].action_count, 3);
    }

    #[tokio::test]
    async fn a_node_still_asking_to_retry_once_its_retries_are_spent_fails_the_workflow() {
        let executor = WorkflowExecutor::new("demo", vec![Arc::new(AlwaysRetries(1))]);
        let registry = ToolRegistry::new();
        let outcome = executor.run(&noop_context(), &registry).await;
        assert_eq!(outcome.status, WorkflowStatus::Failed);
        assert_eq!(outcome.step_details[0].status, StepStatus::Failed);
        assert_eq!(outcome.error_message.as_deref(), Some("still not ready"));
    }

    #[tokio::test]
    async fn zero_budget_deadline_fails_before_the_first_node_runs() {
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
        let ctx = RequestContext::new(client, "test", None, None, Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(5));

        let executor = WorkflowExecutor::new("demo", vec![Arc::new(AlwaysSucceeds("a"))]);
        let registry = ToolRegistry::new();
        let outcome = executor.run(&ctx, &registry).await;
        assert_eq!(outcome.status, WorkflowStatus::Failed);
        assert_eq!(outcome.step_details.len(), 0);
    }
}
