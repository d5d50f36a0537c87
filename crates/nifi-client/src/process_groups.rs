//! Process-group operations and flow-tree/status snapshots (spec §4.A).

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, Revision};
use serde_json::{json, Value};

use crate::client::NiFiClient;
use crate::entity_parse::parse_entity;
use crate::error::NiFiClientError;

impl NiFiClient {
    pub async fn list_process_groups(&self, group_id: &str) -> Result<Vec<NiFiEntity>, NiFiClientError> {
        let raw = self
            .get(&format!("/process-groups/{group_id}/process-groups"))
            .await?;
        raw.get("processGroups")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|v| parse_entity(NiFiEntityKind::ProcessGroup, None, v))
            .collect()
    }

    pub async fn get_process_group(&self, id: &str) -> Result<NiFiEntity, NiFiClientError> {
        let raw = self.get(&format!("/process-groups/{id}")).await?;
        parse_entity(NiFiEntityKind::ProcessGroup, None, raw)
    }

    pub async fn create_process_group(
        &self,
        parent_group_id: &str,
        name: &str,
        position: (f64, f64),
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({
            "revision": { "clientId": self.client_id, "version": 0 },
            "component": { "name": name, "position": { "x": position.0, "y": position.1 } },
        });
        let raw = self
            .post(&format!("/process-groups/{parent_group_id}/process-groups"), &body)
            .await?;
        parse_entity(NiFiEntityKind::ProcessGroup, None, raw)
    }

    pub async fn update_process_group(
        &self,
        id: &str,
        revision: Revision,
        patch: Value,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let mut component = patch;
        if let Value::Object(ref mut map) = component {
            map.insert("id".to_string(), json!(id));
        }
        let body = json!({ "revision": revision, "component": component });
        let raw = self.put(&format!("/process-groups/{id}"), &body).await?;
        parse_entity(NiFiEntityKind::ProcessGroup, None, raw)
    }

    pub async fn delete_process_group(&self, id: &str, revision: &Revision) -> Result<(), NiFiClientError> {
        self.delete_with_query(
            &format!("/process-groups/{id}"),
            &[
                ("version", revision.version.to_string()),
                ("clientId", self.client_id.clone()),
            ],
        )
        .await
    }

    /// The flow tree for a group: its own processors, ports, connections
    /// and child groups in one shot (used by the flow documenter, §4.J).
    pub async fn process_group_flow(&self, id: &str) -> Result<Value, NiFiClientError> {
        self.get(&format!("/flow/process-groups/{id}")).await
    }

    /// Aggregate status counters (queue sizes etc) for a group.
    pub async fn group_status(&self, id: &str) -> Result<Value, NiFiClientError> {
        self.get(&format!("/flow/process-groups/{id}/status")).await
    }
}
