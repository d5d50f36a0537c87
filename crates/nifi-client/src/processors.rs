//! Processor operations (spec §4.A "Operations").

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, Revision};
use serde_json::{json, Value};

use crate::client::NiFiClient;
use crate::entity_parse::parse_entity;
use crate::error::NiFiClientError;

impl NiFiClient {
    pub async fn list_processors(&self, group_id: &str) -> Result<Vec<NiFiEntity>, NiFiClientError> {
        let raw = self
            .get(&format!("/process-groups/{group_id}/processors"))
            .await?;
        let items = raw
            .get("processors")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        items
            .into_iter()
            .map(|v| parse_entity(NiFiEntityKind::Processor, None, v))
            .collect()
    }

    pub async fn get_processor(&self, id: &str) -> Result<NiFiEntity, NiFiClientError> {
        let raw = self.get(&format!("/processors/{id}")).await?;
        parse_entity(NiFiEntityKind::Processor, None, raw)
    }

    pub async fn create_processor(
        &self,
        group_id: &str,
        processor_type: &str,
        name: &str,
        position: (f64, f64),
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({
            "revision": { "clientId": self.client_id, "version": 0 },
            "component": {
                "type": processor_type,
                "name": name,
                "position": { "x": position.0, "y": position.1 },
            }
        });
        let raw = self
            .post(&format!("/process-groups/{group_id}/processors"), &body)
            .await?;
        parse_entity(NiFiEntityKind::Processor, None, raw)
    }

    pub async fn update_processor_properties(
        &self,
        id: &str,
        revision: Revision,
        properties: Value,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({
            "revision": revision,
            "component": { "id": id, "config": { "properties": properties } },
        });
        let raw = self.put(&format!("/processors/{id}"), &body).await?;
        parse_entity(NiFiEntityKind::Processor, None, raw)
    }

    pub async fn update_processor_run_status(
        &self,
        id: &str,
        revision: Revision,
        state: &str,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({ "revision": revision, "state": state });
        let raw = self.put(&format!("/processors/{id}/run-status"), &body).await?;
        parse_entity(NiFiEntityKind::Processor, None, raw)
    }

    pub async fn delete_processor(&self, id: &str, revision: &Revision) -> Result<(), NiFiClientError> {
        self.delete_with_query(
            &format!("/processors/{id}"),
            &[
                ("version", revision.version.to_string()),
                ("clientId", self.client_id.clone()),
            ],
        )
        .await
    }

    pub async fn processor_types(&self) -> Result<Value, NiFiClientError> {
        self.get("/flow/processor-types").await
    }
}
