//! Per-node action ceiling (spec §3 "actions_taken per node <= configured
//! ceiling"; `_check_action_limit`/`_increment_action_count` in the
//! original `base_node.py`). Checked-then-incremented atomically so two
//! concurrent tool dispatches inside the same `exec` can't both observe
//! room for the last slot.

use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("action limit ({max_actions}) reached for node '{node_name}'")]
pub struct ActionLimitExceeded {
    pub node_name: String,
    pub max_actions: usize,
}

pub struct ActionBudget {
    node_name: String,
    max_actions: usize,
    count: AtomicUsize,
}

impl ActionBudget {
    pub fn new(node_name: impl Into<String>, max_actions: usize) -> Self {
        Self {
            node_name: node_name.into(),
            max_actions,
            count: AtomicUsize::new(0),
        }
    }

    /// Records one action, failing if the ceiling has already been
    /// reached. Uses `fetch_update` so the check-then-increment has no
    /// TOCTOU window under concurrent callers.
    pub fn record_call(&self) -> Result<usize, ActionLimitExceeded> {
        self.count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                if current >= self.max_actions {
                    None
                } else {
                    Some(current + 1)
                }
            })
            .map(|previous| previous + 1)
            .map_err(|_| ActionLimitExceeded {
                node_name: self.node_name.clone(),
                max_actions: self.max_actions,
            })
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_call_fails_once_ceiling_is_reached() {
        let budget = ActionBudget::new("node", 2);
        assert!(budget.record_call().is_ok());
        assert!(budget.record_call().is_ok());
        assert!(budget.record_call().is_err());
        assert_eq!(budget.count(), 2);
    }

    #[test]
    fn zero_ceiling_rejects_the_first_call() {
        let budget = ActionBudget::new("node", 0);
        assert!(budget.record_call().is_err());
    }
}
