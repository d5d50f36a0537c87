//! Named workflow registry (spec §4.H's `/workflows*` routes). Spec.md
//! §4.D's "compile-time-known table, built in an explicit init step"
//! applies here too: workflow definitions are registered once at startup,
//! not discovered dynamically.
//!
//! `ToolCallNode` (in `mw-tools`) carries a fixed argument `Value` fixed at
//! registration time; it has no way to reference an earlier step's result.
//! That is an intentional scope line for this catalog's shipped workflow:
//! spec.md never specifies an inter-node templating syntax, and
//! `original_source`'s nodes read/write a free-form Python `shared` dict
//! from arbitrary code rather than through a template string. A workflow
//! whose steps need each other's output implements `WorkflowNode` directly
//! (as `ToolCallNode` itself does) instead of going through this helper.

use std::collections::HashMap;
use std::sync::Arc;

use mw_tools::ToolCallNode;
use mw_workflow_engine::{WorkflowExecutor, WorkflowNode};
use serde::Serialize;
use serde_json::json;

pub struct WorkflowDefinition {
    pub name: String,
    pub description: String,
    pub nodes: Vec<Arc<dyn WorkflowNode>>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub description: String,
    pub step_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidationProblem {
    pub node_name: String,
    pub problem: String,
}

pub struct WorkflowCatalog {
    definitions: HashMap<String, WorkflowDefinition>,
}

impl WorkflowCatalog {
    /// `action_ceiling`/`retry_count` come from `MiddlewareConfig::workflow`
    /// (spec §6 "a workflow action ceiling and retry count") and are
    /// applied uniformly to every shipped node.
    pub fn new(action_ceiling: usize, retry_count: u32) -> Self {
        let mut definitions = HashMap::new();
        register(&mut definitions, flow_inventory_workflow(action_ceiling, retry_count));
        Self { definitions }
    }

    pub fn get(&self, name: &str) -> Option<&WorkflowDefinition> {
        self.definitions.get(name)
    }

    pub fn list(&self) -> Vec<WorkflowSummary> {
        let mut summaries: Vec<WorkflowSummary> = self
            .definitions
            .values()
            .map(|d| WorkflowSummary { name: d.name.clone(), description: d.description.clone(), step_count: d.nodes.len() })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Static checks per SPEC_FULL.md §5 item 2: node names are unique
    /// within the chain and every per-node action ceiling is positive.
    /// The executor's chain is strictly linear (spec §5 "nodes execute
    /// strictly in chain order"), so there is no named-successor wiring to
    /// check the way a branching flow graph would need.
    pub fn validate(&self, name: &str) -> Option<Vec<ValidationProblem>> {
        let definition = self.get(name)?;
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for node in &definition.nodes {
            if !seen.insert(node.name().to_string()) {
                problems.push(ValidationProblem {
                    node_name: node.name().to_string(),
                    problem: "duplicate node name in chain".to_string(),
                });
            }
            if node.max_actions() == 0 {
                problems.push(ValidationProblem {
                    node_name: node.name().to_string(),
                    problem: "max_actions must be a positive integer".to_string(),
                });
            }
        }
        Some(problems)
    }

    pub fn executor(&self, name: &str) -> Option<WorkflowExecutor> {
        let definition = self.get(name)?;
        Some(WorkflowExecutor::new(definition.name.clone(), definition.nodes.clone()))
    }
}

fn register(definitions: &mut HashMap<String, WorkflowDefinition>, definition: WorkflowDefinition) {
    definitions.insert(definition.name.clone(), definition);
}

/// A read-only audit workflow: catalogs, then the bulletin board. No
/// mutation, so it doubles as a smoke test for the chain/dispatch wiring.
fn flow_inventory_workflow(action_ceiling: usize, retry_count: u32) -> WorkflowDefinition {
    let node = |name: &'static str, description: &'static str, tool_name: &'static str| {
        Arc::new(
            ToolCallNode::new(name, description, tool_name, json!({}))
                .with_max_actions(action_ceiling)
                .with_max_retries(retry_count),
        ) as Arc<dyn WorkflowNode>
    };

    WorkflowDefinition {
        name: "flow_inventory".to_string(),
        description: "Reviews installed processor/controller-service types and the current bulletin board".to_string(),
        nodes: vec![
            node("list_processor_types", "Lists installed processor types", "list_nifi_processor_types"),
            node(
                "list_controller_service_types",
                "Lists installed controller service types",
                "list_controller_service_types",
            ),
            node("check_bulletins", "Fetches the current bulletin board", "get_nifi_bulletin_board"),
        ],
    }
}
