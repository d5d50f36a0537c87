//! Request-scoped execution context (spec §4.B, §9 "Ambient context vs
//! parameter passing").
//!
//! The original implementation exposes the per-request NiFi client and
//! logger through a dynamic variable (Python `ContextVar`) so arbitrarily
//! nested handlers can reach them without threading them through call
//! signatures. That pattern is deliberately not ported: every tool handler
//! and client method here takes a [`RequestContext`] as an explicit first
//! argument instead.

use std::sync::Arc;
use std::time::Duration;

use nifi_client::NiFiClient;
use tokio::time::Instant;

/// Fields bound once per incoming HTTP call, passed explicitly to the
/// dispatcher, every tool handler, and the workflow executor.
pub struct RequestContext {
    /// NiFi client handle bound to the server selected by
    /// `X-Nifi-Server-Id`. Request-scoped: not retained past the call.
    pub nifi: Arc<NiFiClient>,
    /// Id of the NiFi server entry this context is bound to.
    pub nifi_server_id: String,
    /// From `X-Request-ID`, or `-` if the header was absent.
    pub user_request_id: String,
    /// From `X-Action-ID`, or `-` if the header was absent.
    pub action_id: String,
    deadline: Instant,
}

const DEFAULT_HEADER_VALUE: &str = "-";

impl RequestContext {
    pub fn new(
        nifi: Arc<NiFiClient>,
        nifi_server_id: impl Into<String>,
        user_request_id: Option<String>,
        action_id: Option<String>,
        deadline_budget: Duration,
    ) -> Self {
        Self {
            nifi,
            nifi_server_id: nifi_server_id.into(),
            user_request_id: user_request_id.unwrap_or_else(|| DEFAULT_HEADER_VALUE.to_string()),
            action_id: action_id.unwrap_or_else(|| DEFAULT_HEADER_VALUE.to_string()),
            deadline: Instant::now() + deadline_budget,
        }
    }

    pub fn is_past_deadline(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// A log-line prefix carrying the correlation fields, matching the
    /// `user_request_id=... action_id=...` token convention used
    /// throughout this workspace's log records (SPEC_FULL.md §3.1).
    pub fn log_prefix(&self) -> String {
        format!(
            "user_request_id={} action_id={}",
            self.user_request_id, self.action_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nifi_client::NiFiServerConfig;

    fn client() -> Arc<NiFiClient> {
        Arc::new(
            NiFiClient::new(&NiFiServerConfig {
                id: "s1".into(),
                display_name: "s1".into(),
                base_url: "http://localhost:8080".into(),
                username: None,
                password: None,
                verify_tls: true,
                timeout_seconds: 5,
            })
            .unwrap(),
        )
    }

    #[test]
    fn defaults_correlation_ids_to_dash() {
        let ctx = RequestContext::new(client(), "s1", None, None, Duration::from_secs(30));
        assert_eq!(ctx.user_request_id, "-");
        assert_eq!(ctx.action_id, "-");
    }

    #[test]
    fn preserves_supplied_correlation_ids() {
        let ctx = RequestContext::new(
            client(),
            "s1",
            Some("req-1".into()),
            Some("act-1".into()),
            Duration::from_secs(30),
        );
        assert_eq!(ctx.user_request_id, "req-1");
        assert_eq!(ctx.action_id, "act-1");
    }

    #[test]
    fn zero_budget_is_immediately_past_deadline() {
        let ctx = RequestContext::new(client(), "s1", None, None, Duration::from_secs(0));
        std::thread::sleep(Duration::from_millis(5));
        assert!(ctx.is_past_deadline());
    }
}
