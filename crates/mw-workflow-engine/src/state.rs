//! Workflow State (spec §3): ordered node results, a shared key-value map,
//! key milestones, and the progress tracker, all held for one workflow run.

use serde_json::{Map, Value};

use crate::progress::ProgressTracker;

const MAX_MILESTONES: usize = 5;
const MAX_RECENT_RESULTS: usize = 5;

/// The curated view `WorkflowNode::prep` hands to `exec`: shared state
/// plus the most recent step results and key milestones (spec §4.G).
#[derive(Debug, Clone)]
pub struct PreparedContext {
    pub shared: Value,
    pub recent_results: Vec<Value>,
    pub milestones: Vec<Value>,
}

pub struct SharedState {
    shared: Map<String, Value>,
    node_results: Vec<(String, Value)>,
    milestones: Vec<Value>,
    pub progress: ProgressTracker,
}

impl SharedState {
    pub fn new(workflow_name: impl Into<String>) -> Self {
        Self {
            shared: Map::new(),
            node_results: Vec::new(),
            milestones: Vec::new(),
            progress: ProgressTracker::new(workflow_name),
        }
    }

    pub fn curate_context(&self) -> PreparedContext {
        let recent_results = self
            .node_results
            .iter()
            .rev()
            .take(MAX_RECENT_RESULTS)
            .map(|(_, v)| v.clone())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        PreparedContext {
            shared: Value::Object(self.shared.clone()),
            recent_results,
            milestones: self.milestones.clone(),
        }
    }

    /// Writes `{name}_result` into the shared map, appends to the ordered
    /// result history, and records a key milestone when `result` qualifies
    /// (spec §4.G "a node result is deemed a milestone if it is a mapping
    /// whose status is success/completed, or a non-null scalar").
    pub fn record_result(&mut self, name: &str, result: Value) {
        self.shared.insert(format!("{name}_result"), result.clone());
        if is_milestone(&result) {
            self.milestones.push(result.clone());
            if self.milestones.len() > MAX_MILESTONES {
                self.milestones.remove(0);
            }
        }
        self.node_results.push((name.to_string(), result));
    }

    pub fn node_results(&self) -> &[(String, Value)] {
        &self.node_results
    }

    pub fn shared_value(&self, key: &str) -> Option<&Value> {
        self.shared.get(key)
    }
}

fn is_milestone(result: &Value) -> bool {
    match result {
        Value::Object(map) => matches!(
            map.get("status").and_then(Value::as_str),
            Some("success") | Some("completed")
        ),
        Value::Null => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn milestones_are_truncated_to_the_five_most_recent() {
        let mut state = SharedState::new("demo");
        for i in 0..8 {
            state.record_result(&format!("step{i}"), json!({ "status": "success", "i": i }));
        }
        let prepared = state.curate_context();
        assert_eq!(prepared.milestones.len(), 5);
        assert_eq!(prepared.milestones[4]["i"], 7);
    }

    #[test]
    fn non_mapping_non_null_scalars_are_milestones() {
        let mut state = SharedState::new("demo");
        state.record_result("step0", json!("a plain string"));
        assert_eq!(state.curate_context().milestones.len(), 1);
    }

    #[test]
    fn error_mappings_are_not_milestones() {
        let mut state = SharedState::new("demo");
        state.record_result("step0", json!({ "status": "error", "message": "nope" }));
        assert_eq!(state.curate_context().milestones.len(), 0);
    }
}
