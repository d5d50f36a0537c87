//! Connection operations (spec §4.A).

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, Revision};
use serde_json::{json, Value};

use crate::client::NiFiClient;
use crate::entity_parse::parse_entity;
use crate::error::NiFiClientError;

/// Endpoint shape for the source/destination of a connection, resolved by
/// the caller (the batch orchestrator resolves names to ids before this
/// point — spec §4.F step 5).
#[derive(Debug, Clone)]
pub struct ConnectableRef {
    pub id: String,
    pub group_id: String,
    pub connectable_type: String,
}

impl NiFiClient {
    pub async fn list_connections(&self, group_id: &str) -> Result<Vec<NiFiEntity>, NiFiClientError> {
        let raw = self
            .get(&format!("/process-groups/{group_id}/connections"))
            .await?;
        raw.get("connections")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|v| parse_entity(NiFiEntityKind::Connection, None, v))
            .collect()
    }

    pub async fn get_connection(&self, id: &str) -> Result<NiFiEntity, NiFiClientError> {
        let raw = self.get(&format!("/connections/{id}")).await?;
        parse_entity(NiFiEntityKind::Connection, None, raw)
    }

    pub async fn create_connection(
        &self,
        group_id: &str,
        source: &ConnectableRef,
        destination: &ConnectableRef,
        name: Option<&str>,
        relationships: &[String],
    ) -> Result<NiFiEntity, NiFiClientError> {
        let mut component = json!({
            "source": { "id": source.id, "groupId": source.group_id, "type": source.connectable_type },
            "destination": { "id": destination.id, "groupId": destination.group_id, "type": destination.connectable_type },
            "selectedRelationships": relationships,
        });
        if let Some(name) = name {
            component["name"] = json!(name);
        }
        let body = json!({
            "revision": { "clientId": self.client_id, "version": 0 },
            "component": component,
        });
        let raw = self
            .post(&format!("/process-groups/{group_id}/connections"), &body)
            .await?;
        parse_entity(NiFiEntityKind::Connection, None, raw)
    }

    pub async fn update_connection(
        &self,
        id: &str,
        revision: Revision,
        relationships: &[String],
    ) -> Result<NiFiEntity, NiFiClientError> {
        if relationships.is_empty() {
            return Err(NiFiClientError::BadRequest(
                "connection update with an empty relationships list is rejected; use the delete tool to remove a connection".into(),
            ));
        }
        let body = json!({
            "revision": revision,
            "component": { "id": id, "selectedRelationships": relationships },
        });
        let raw = self.put(&format!("/connections/{id}"), &body).await?;
        parse_entity(NiFiEntityKind::Connection, None, raw)
    }

    pub async fn delete_connection(&self, id: &str, revision: &Revision) -> Result<(), NiFiClientError> {
        self.delete_with_query(
            &format!("/connections/{id}"),
            &[
                ("version", revision.version.to_string()),
                ("clientId", self.client_id.clone()),
            ],
        )
        .await
    }
}
