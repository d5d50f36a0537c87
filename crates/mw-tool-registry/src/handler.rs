//! The handler seam every concrete tool in `mw-tools` implements.

use async_trait::async_trait;
use mw_request_context::RequestContext;
use serde_json::Value;

use crate::error::DispatchError;

/// One tool's body. Receives the already-validated arguments and the
/// explicit request context (spec §9: ambient lookup is replaced by
/// parameter passing). May return any JSON value; [`crate::ToolRegistry`]
/// normalizes the handful of shapes spec §4.D step 4 calls out.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError>;
}
