//! Uniform tool/batch-item result shape (spec §4.D step 4, §4.F step 3,
//! §7 "User-visible failure behavior").

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Success,
    Warning,
    Error,
}

/// What a tool handler (or one batch item) returns. `hint` is only set for
/// 409-class conflicts, per spec §7.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub status: ToolOutcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ToolResult {
    pub fn success(message: impl Into<String>, entity: Option<Value>) -> Self {
        Self {
            status: ToolOutcome::Success,
            message: message.into(),
            entity,
            hint: None,
        }
    }

    pub fn warning(message: impl Into<String>, entity: Option<Value>) -> Self {
        Self {
            status: ToolOutcome::Warning,
            message: message.into(),
            entity,
            hint: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ToolOutcome::Error,
            message: message.into(),
            entity: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
