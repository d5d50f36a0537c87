//! Batch-level (as opposed to per-item) failures — these abort the whole
//! call before any item is attempted.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("batch request carried no items")]
    EmptyBatch,

    #[error(transparent)]
    Client(#[from] nifi_client::NiFiClientError),
}
