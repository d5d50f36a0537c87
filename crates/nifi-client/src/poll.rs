//! Async sub-resource polling: drop requests, listing requests, and
//! provenance queries (spec §4.A "Async sub-resource polling", §9
//! "Polling loops").
//!
//! Each public method follows the same shape: create, poll until
//! `finished` or deadline, extract results, then always delete — the
//! delete runs from the single return path of the function regardless of
//! whether polling succeeded, failed, or timed out (spec §8 invariant 5).

use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::{sleep, Instant};

use crate::client::NiFiClient;
use crate::error::NiFiClientError;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default `timeout_seconds` for async sub-resources when a caller does
/// not supply one (spec §5 "Cancellation and timeouts").
pub const DEFAULT_SUBRESOURCE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DropRequestOutcome {
    pub request_id: String,
    pub success: bool,
    pub message: Option<String>,
    pub current_queue_size: Option<String>,
    pub original_queue_size: Option<String>,
}

impl NiFiClient {
    async fn poll_until_finished(
        &self,
        status_path: &str,
        deadline: Instant,
        is_finished: impl Fn(&Value) -> bool,
    ) -> Result<Value, NiFiClientError> {
        loop {
            let status = self.get(status_path).await?;
            if is_finished(&status) {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                return Err(NiFiClientError::Timeout {
                    sub_resource_id: status_path.to_string(),
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Creates a drop request against `connection_id`'s flowfile queue,
    /// polls it to completion, and always deletes it afterward.
    pub async fn purge_connection(
        &self,
        connection_id: &str,
        timeout: Duration,
    ) -> Result<DropRequestOutcome, NiFiClientError> {
        let deadline = Instant::now() + timeout;

        let created = self
            .post(
                &format!("/flowfile-queues/{connection_id}/drop-requests"),
                &json!({}),
            )
            .await?;
        let request_id = created
            .pointer("/dropRequest/id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                NiFiClientError::BadRequest("NiFi drop-request response missing id".into())
            })?
            .to_string();
        let status_path = format!("/flowfile-queues/{connection_id}/drop-requests/{request_id}");

        let poll_result = self
            .poll_until_finished(&status_path, deadline, |v| {
                v.pointer("/dropRequest/finished")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .await;

        let outcome = poll_result.map(|status| {
            let drop_request = status.pointer("/dropRequest").cloned().unwrap_or(Value::Null);
            DropRequestOutcome {
                request_id: request_id.clone(),
                success: drop_request.get("failureReason").and_then(Value::as_str).is_none(),
                message: drop_request
                    .get("failureReason")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                current_queue_size: drop_request
                    .get("currentSize")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                original_queue_size: drop_request
                    .get("originalSize")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }
        });

        if let Err(e) = self.delete_idempotent(&status_path).await {
            log::warn!(target: "nifi_client::poll", "failed to delete drop-request {request_id}: {e}");
        }

        outcome
    }

    /// Creates a listing request against `connection_id`'s flowfile queue,
    /// polls it to completion, fetches `/results` (falling back to the
    /// `flowFileSummaries` embedded in the final status), and always
    /// deletes the request afterward.
    pub async fn list_connection_queue(
        &self,
        connection_id: &str,
        timeout: Duration,
    ) -> Result<Value, NiFiClientError> {
        let deadline = Instant::now() + timeout;

        let created = self
            .post(
                &format!("/flowfile-queues/{connection_id}/listing-requests"),
                &json!({}),
            )
            .await?;
        let request_id = created
            .pointer("/listingRequest/id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                NiFiClientError::BadRequest("NiFi listing-request response missing id".into())
            })?
            .to_string();
        let status_path = format!("/flowfile-queues/{connection_id}/listing-requests/{request_id}");

        let poll_result = self
            .poll_until_finished(&status_path, deadline, |v| {
                v.pointer("/listingRequest/finished")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .await;

        let outcome: Result<Value, NiFiClientError> = match poll_result {
            Ok(status) => {
                let results = match self.get(&format!("{status_path}/results")).await {
                    Ok(r) => r,
                    Err(_) => status
                        .pointer("/listingRequest/flowFileSummaries")
                        .cloned()
                        .unwrap_or(Value::Null),
                };
                Ok(results)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = self.delete_idempotent(&status_path).await {
            log::warn!(target: "nifi_client::poll", "failed to delete listing-request {request_id}: {e}");
        }

        outcome
    }

    /// Submits a provenance query, polls it to completion, fetches
    /// `/results` (falling back to the embedded `results` field), and
    /// always deletes the query afterward.
    pub async fn query_provenance(
        &self,
        query: Value,
        timeout: Duration,
    ) -> Result<Value, NiFiClientError> {
        let deadline = Instant::now() + timeout;

        let created = self.post("/provenance", &json!({ "provenance": { "request": query } })).await?;
        let request_id = created
            .pointer("/provenance/id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                NiFiClientError::BadRequest("NiFi provenance response missing id".into())
            })?
            .to_string();
        let status_path = format!("/provenance/{request_id}");

        let poll_result = self
            .poll_until_finished(&status_path, deadline, |v| {
                v.pointer("/provenance/finished")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .await;

        let outcome: Result<Value, NiFiClientError> = match poll_result {
            Ok(status) => {
                let results = match self.get(&format!("{status_path}/results")).await {
                    Ok(r) => r,
                    Err(_) => status
                        .pointer("/provenance/results")
                        .cloned()
                        .unwrap_or(Value::Null),
                };
                Ok(results)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = self.delete_idempotent(&status_path).await {
            log::warn!(target: "nifi_client::poll", "failed to delete provenance query {request_id}: {e}");
        }

        outcome
    }
}
