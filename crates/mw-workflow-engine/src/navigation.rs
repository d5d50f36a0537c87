//! Navigation labels a node's `post` hook resolves to (spec §4.G).

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Default,
    Error,
    Retry,
    /// Reserved for a future human-in-the-loop node (SPEC_FULL §5 item 3).
    /// No shipped node currently returns it; the executor treats it as a
    /// halt rather than a dispatch case.
    Paused,
}

/// `_determine_navigation_key` from the original workflow node base class,
/// unchanged in meaning: a mapping with `status == "error"` navigates to
/// `error`, `"retry"` to `retry`, anything else (including non-mappings)
/// to `default`.
pub fn navigation_of(result: &Value) -> Navigation {
    match result.get("status").and_then(Value::as_str) {
        Some("error") => Navigation::Error,
        Some("retry") => Navigation::Retry,
        _ => Navigation::Default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_status_error_and_retry_and_defaults_otherwise() {
        assert_eq!(navigation_of(&json!({"status": "error"})), Navigation::Error);
        assert_eq!(navigation_of(&json!({"status": "retry"})), Navigation::Retry);
        assert_eq!(navigation_of(&json!({"status": "success"})), Navigation::Default);
        assert_eq!(navigation_of(&json!("a scalar")), Navigation::Default);
    }
}
