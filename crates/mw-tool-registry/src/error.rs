//! Dispatch-level errors (spec §4.D, §7). Variants line up one-to-one with
//! the status-code table in spec §7 so the HTTP front-end can map them
//! without re-inspecting message text.

use mw_argument_validator::ValidationError;
use nifi_client::NiFiClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool '{0}'")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("NiFi authentication failed: {0}")]
    AuthError(String),

    #[error("tool '{0}' returned a result that is not JSON-serializable")]
    Internal(String),
}

impl From<ValidationError> for DispatchError {
    fn from(e: ValidationError) -> Self {
        DispatchError::BadRequest(e.to_string())
    }
}

impl From<NiFiClientError> for DispatchError {
    fn from(e: NiFiClientError) -> Self {
        match e {
            NiFiClientError::AuthError(message) => DispatchError::AuthError(message),
            NiFiClientError::NotFound(message) => DispatchError::NotFound(message),
            NiFiClientError::ConflictError { message, .. } => DispatchError::Conflict(message),
            NiFiClientError::BadRequest(message) => DispatchError::BadRequest(message),
            NiFiClientError::Timeout { sub_resource_id } => {
                DispatchError::BadRequest(format!("timed out waiting for sub-resource {sub_resource_id} to finish"))
            }
            NiFiClientError::Transport(source) => DispatchError::BadRequest(source.to_string()),
            NiFiClientError::ServerError { status, body } => DispatchError::BadRequest(format!("NiFi returned {status}: {body}")),
            NiFiClientError::Decode(source) => DispatchError::Internal(source.to_string()),
        }
    }
}
