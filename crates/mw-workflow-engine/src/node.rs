//! The `WorkflowNode` trait (spec §4.G), split into the three hooks the
//! original Python base class (`base_node.py`) implements: `prep`/`post`
//! carry sensible defaults, `exec` is the one hook every concrete node
//! must supply.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use mw_tool_registry::ToolRegistry;
use serde_json::Value;

use crate::action_budget::ActionBudget;
use crate::navigation::{navigation_of, Navigation};
use crate::state::{PreparedContext, SharedState};

/// What a node's `exec` produces. A bare JSON value — mirrors the
/// original's untyped `exec_res`, since workflow steps wrap results from
/// many different tools.
pub type NodeResult = Value;

#[async_trait]
pub trait WorkflowNode: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Per-node action ceiling passed to the `ActionBudget` the executor
    /// creates for this step (spec §3 "actions_taken per node").
    fn max_actions(&self) -> usize {
        10
    }

    /// How many times a `retry` navigation re-invokes this node's `exec`
    /// before the executor gives up and treats it as `error`
    /// (SPEC_FULL §5 item 4).
    fn max_retries(&self) -> u32 {
        0
    }

    /// Curates a context view for `exec`: shared state, recent step
    /// results, and key milestones (spec §4.G). The default mirrors
    /// `WorkflowNode.prep` in `base_node.py`.
    async fn prep(&self, shared: &SharedState) -> PreparedContext {
        shared.curate_context()
    }

    /// The node's body. May dispatch tools through `registry`, recording
    /// each dispatch against `budget` first.
    async fn exec(
        &self,
        ctx: &RequestContext,
        prepared: &PreparedContext,
        registry: &ToolRegistry,
        budget: &ActionBudget,
    ) -> NodeResult;

    /// Writes `result` into shared state and resolves the navigation
    /// label. The default mirrors `WorkflowNode.post`/
    /// `_determine_navigation_key` in `base_node.py`.
    fn post(&self, shared: &mut SharedState, result: NodeResult) -> Navigation {
        let navigation = navigation_of(&result);
        shared.record_result(self.name(), result);
        navigation
    }
}
