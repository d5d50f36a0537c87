//! Error taxonomy surfaced by the client (spec §4.A, §7).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NiFiClientError {
    #[error("NiFi authentication failed: {0}")]
    AuthError(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Stale revision or an invalid state transition (e.g. delete of a
    /// running component). `stale_version` is set when NiFi reported the
    /// current revision so callers can retry.
    #[error("conflict: {message}")]
    ConflictError {
        message: String,
        stale_version: Option<i64>,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    /// An async sub-resource (drop/listing/provenance) did not finish
    /// within its deadline. The id is left for caller inspection even
    /// though the sub-resource has already been deleted (cleanup always
    /// runs, per spec §4.A step 4 / §9).
    #[error("timed out waiting for sub-resource {sub_resource_id} to finish")]
    Timeout { sub_resource_id: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Any NiFi response status not mapped to a more specific variant
    /// above (notably 5xx).
    #[error("NiFi returned {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("failed to parse NiFi response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NiFiClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, NiFiClientError::NotFound(_))
    }
}
