//! Tool descriptor table and `call_tool` dispatch sequence (spec §4.D).
//!
//! Adapted from the registration/lookup/dispatch shape of a node/executor
//! registry: handlers are registered once at an explicit `init` step into
//! a compile-time-known table (spec §9 "Decorators as registration"), and
//! the dispatcher resolves by name rather than by any link-time discovery
//! mechanism.

use std::collections::HashMap;
use std::sync::Arc;

use mw_argument_validator::validate_arguments;
use mw_request_context::RequestContext;
use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use serde_json::Value;

use crate::error::DispatchError;
use crate::handler::ToolHandler;

struct RegistryEntry {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

/// Read-only after startup (spec §5 "Shared resources"); safe to share
/// across concurrently-served requests behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one tool. Panics on a duplicate name — descriptor names
    /// are unique by the registry's own invariant (spec §3), and a
    /// collision can only happen from a programming mistake at the
    /// explicit `init` step, not from caller input.
    pub fn register(&mut self, descriptor: ToolDescriptor, handler: Arc<dyn ToolHandler>) {
        descriptor
            .validate()
            .unwrap_or_else(|e| panic!("invalid tool descriptor: {e}"));
        let name = descriptor.name.clone();
        if self.entries.contains_key(&name) {
            panic!("duplicate tool registration for '{name}'");
        }
        self.entries.insert(name, RegistryEntry { descriptor, handler });
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entries.get(name).map(|e| &e.descriptor)
    }

    pub fn list(&self, phase: Option<PhaseTag>) -> Vec<&ToolDescriptor> {
        let mut descriptors: Vec<&ToolDescriptor> = self
            .entries
            .values()
            .filter(|e| phase.is_none_or(|p| e.descriptor.phases.contains(&p)))
            .map(|e| &e.descriptor)
            .collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Runs the full `call_tool(name, args)` sequence (spec §4.D):
    /// lookup, argument validation, invocation, result normalization.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        name: &str,
        mut args: Value,
    ) -> Result<Value, DispatchError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| DispatchError::NotFound(name.to_string()))?;

        validate_arguments(name, &mut args)?;

        let raw = entry.handler.call(ctx, args).await?;
        Ok(normalize_result(raw))
    }
}

/// Normalizes a handler's raw return value (spec §4.D step 4):
/// - an object carrying a `result` key prefers that key's value;
/// - an array of strings is parsed per-element as JSON, falling back to
///   the plain string on decode failure; a single-element array
///   collapses to that element;
/// - anything else passes through unchanged.
fn normalize_result(raw: Value) -> Value {
    match raw {
        Value::Object(ref map) if map.contains_key("result") => {
            map.get("result").cloned().unwrap_or(Value::Null)
        }
        Value::Array(items) => {
            let parsed: Vec<Value> = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => serde_json::from_str(&s).unwrap_or(Value::String(s)),
                    other => other,
                })
                .collect();
            if parsed.len() == 1 {
                parsed.into_iter().next().unwrap()
            } else {
                Value::Array(parsed)
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mw_tool_contracts::ToolDescriptor;
    use nifi_client::{NiFiClient, NiFiServerConfig};
    use serde_json::json;
    use std::time::Duration;

    fn noop_context() -> RequestContext {
        let client = Arc::new(
            NiFiClient::new(&NiFiServerConfig {
                id: "test".into(),
                display_name: "test".into(),
                base_url: "http://localhost:8080".into(),
                username: None,
                password: None,
                verify_tls: true,
                timeout_seconds: 5,
            })
            .unwrap(),
        );
        RequestContext::new(client, "test", None, None, Duration::from_secs(30))
    }

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        async fn call(&self, _ctx: &RequestContext, args: Value) -> Result<Value, DispatchError> {
            Ok(json!({ "result": { "echo": args } }))
        }
    }

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            short_description: "echo".into(),
            long_description: "echoes its arguments".into(),
            example: None,
            parameters: json!({ "type": "object", "properties": {} }),
            phases: vec![PhaseTag::Query],
        }
    }

    #[tokio::test]
    async fn dispatch_looks_up_validates_invokes_and_normalizes() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("echo_tool"), Arc::new(EchoHandler));

        let ctx = noop_context();
        let result = registry
            .dispatch(&ctx, "echo_tool", json!({ "x": 1 }))
            .await
            .unwrap();
        assert_eq!(result, json!({ "echo": { "x": 1 } }));
    }

    #[tokio::test]
    async fn dispatch_of_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        let ctx = noop_context();
        let result = registry.dispatch(&ctx, "nope", json!({})).await;
        assert!(matches!(result, Err(DispatchError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_filters_by_phase() {
        let mut registry = ToolRegistry::new();
        registry.register(descriptor("a_tool"), Arc::new(EchoHandler));
        assert_eq!(registry.list(Some(PhaseTag::Query)).len(), 1);
        assert_eq!(registry.list(Some(PhaseTag::Build)).len(), 0);
    }
}
