//! Controller service operations (spec §4.A).

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, Revision};
use serde_json::{json, Value};

use crate::client::NiFiClient;
use crate::entity_parse::parse_entity;
use crate::error::NiFiClientError;

impl NiFiClient {
    pub async fn list_controller_services(
        &self,
        group_id: &str,
    ) -> Result<Vec<NiFiEntity>, NiFiClientError> {
        let raw = self
            .get(&format!("/flow/process-groups/{group_id}/controller-services"))
            .await?;
        raw.get("controllerServices")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|v| parse_entity(NiFiEntityKind::ControllerService, None, v))
            .collect()
    }

    pub async fn get_controller_service(&self, id: &str) -> Result<NiFiEntity, NiFiClientError> {
        let raw = self.get(&format!("/controller-services/{id}")).await?;
        parse_entity(NiFiEntityKind::ControllerService, None, raw)
    }

    pub async fn create_controller_service(
        &self,
        group_id: &str,
        service_type: &str,
        name: &str,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({
            "revision": { "clientId": self.client_id, "version": 0 },
            "component": { "type": service_type, "name": name },
        });
        let raw = self
            .post(&format!("/process-groups/{group_id}/controller-services"), &body)
            .await?;
        parse_entity(NiFiEntityKind::ControllerService, None, raw)
    }

    pub async fn update_controller_service_properties(
        &self,
        id: &str,
        revision: Revision,
        properties: Value,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({
            "revision": revision,
            "component": { "id": id, "properties": properties },
        });
        let raw = self.put(&format!("/controller-services/{id}"), &body).await?;
        parse_entity(NiFiEntityKind::ControllerService, None, raw)
    }

    /// `state` is `ENABLED` or `DISABLED` — controller services do not
    /// have a run-status endpoint like processors/ports (spec §4.C:
    /// `enable`/`disable` are the only operations valid for this kind).
    pub async fn update_controller_service_state(
        &self,
        id: &str,
        revision: Revision,
        state: &str,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let body = json!({ "revision": revision, "state": state });
        let raw = self
            .put(&format!("/controller-services/{id}/run-status"), &body)
            .await?;
        parse_entity(NiFiEntityKind::ControllerService, None, raw)
    }

    pub async fn delete_controller_service(
        &self,
        id: &str,
        revision: &Revision,
    ) -> Result<(), NiFiClientError> {
        self.delete_with_query(
            &format!("/controller-services/{id}"),
            &[
                ("version", revision.version.to_string()),
                ("clientId", self.client_id.clone()),
            ],
        )
        .await
    }

    pub async fn controller_service_types(&self) -> Result<Value, NiFiClientError> {
        self.get("/flow/controller-service-types").await
    }
}
