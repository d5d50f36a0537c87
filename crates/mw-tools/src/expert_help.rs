//! The optional expert-help tool (spec §4.I, §3 "Expert help"). Forwarding
//! the question to a configured LLM provider is explicitly out of scope
//! (spec §1: "LLM provider adapters ... modeled as opaque LLM callers");
//! this tool's own responsibility ends at the rate-limit decision and
//! handing the question back for the caller's own provider dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mw_expert_help::{ExpertHelpLimiter, RATE_LIMITED_MESSAGE};
use mw_request_context::RequestContext;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use mw_tool_registry::{DispatchError, ToolHandler};
use serde_json::{json, Value};

use crate::descriptor::describe;

pub struct AskNiFiExpert {
    limiter: Arc<ExpertHelpLimiter>,
}

impl AskNiFiExpert {
    pub fn new(limiter: Arc<ExpertHelpLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait]
impl ToolHandler for AskNiFiExpert {
    async fn call(&self, ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
        let question = args
            .get("question")
            .and_then(Value::as_str)
            .ok_or_else(|| DispatchError::BadRequest("missing required field 'question'".into()))?;

        let now = Utc::now();
        if !self.limiter.check(&ctx.user_request_id, now) {
            return Ok(json!({ "result": { "status": "success", "message": RATE_LIMITED_MESSAGE } }));
        }
        self.limiter.record(&ctx.user_request_id, now);

        Ok(json!({
            "result": {
                "status": "success",
                "message": "question forwarded",
                "question": question,
            }
        }))
    }
}

pub fn ask_nifi_expert_descriptor() -> ToolDescriptor {
    describe(
        "ask_nifi_expert",
        "Forwards a free-form NiFi question to an expert helper, rate-limited per request",
        "Hands 'question' off for expert review, at most twice per 24-hour sliding window per \
         caller. Past the ceiling, returns a success-shaped message asking the caller to ask the \
         user directly instead of raising an error.",
        json!({
            "type": "object",
            "properties": { "question": { "type": "string" } },
            "required": ["question"],
        }),
        &[PhaseTag::Query],
    )
}
