//! Per-item result capture (spec §4.F step 3): one failing item never
//! aborts the remaining items in a batch.

use mw_tool_contracts::ToolOutcome;
use nifi_client::NiFiClientError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub request_index: usize,
    pub status: ToolOutcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// The caller-supplied item, echoed back so a batch response can be
    /// matched to its request without relying on ordering alone.
    pub request: Value,
}

impl BatchItemResult {
    pub fn success(index: usize, request: Value, message: impl Into<String>, entity: Option<Value>) -> Self {
        Self {
            request_index: index,
            status: ToolOutcome::Success,
            message: message.into(),
            entity,
            hint: None,
            request,
        }
    }

    pub fn warning(index: usize, request: Value, message: impl Into<String>, entity: Option<Value>) -> Self {
        Self {
            request_index: index,
            status: ToolOutcome::Warning,
            message: message.into(),
            entity,
            hint: None,
            request,
        }
    }

    pub fn error(index: usize, request: Value, message: impl Into<String>) -> Self {
        Self {
            request_index: index,
            status: ToolOutcome::Error,
            message: message.into(),
            entity: None,
            hint: None,
            request,
        }
    }

    /// Surfaces a client error as a per-item failure, attaching the
    /// current-revision hint NiFi provides on a stale-version conflict
    /// (spec §7 "User-visible failure behavior").
    pub fn from_client_error(index: usize, request: Value, err: &NiFiClientError) -> Self {
        let mut result = Self::error(index, request, err.to_string());
        if let NiFiClientError::ConflictError { stale_version: Some(v), .. } = err {
            result.hint = Some(format!("current version is {v}; re-fetch and retry"));
        }
        result
    }
}

pub fn log_batch_summary(tool: &str, results: &[BatchItemResult]) {
    let successful = results.iter().filter(|r| r.status == mw_tool_contracts::ToolOutcome::Success).count();
    let warnings = results.iter().filter(|r| r.status == mw_tool_contracts::ToolOutcome::Warning).count();
    let failed = results.iter().filter(|r| r.status == mw_tool_contracts::ToolOutcome::Error).count();
    log::info!(
        target: "mw_batch_orchestrator",
        "{tool}: successful={successful} warnings={warnings} failed={failed}"
    );
}
