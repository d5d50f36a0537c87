//! Port operations with the input/output ambiguity fallback (spec §4.A
//! "Port-type ambiguity").

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, PortKind, Revision};
use serde_json::{json, Value};

use crate::client::NiFiClient;
use crate::entity_parse::parse_entity;
use crate::error::NiFiClientError;

impl NiFiClient {
    pub async fn list_ports(&self, group_id: &str) -> Result<Vec<NiFiEntity>, NiFiClientError> {
        let input_raw = self
            .get(&format!("/process-groups/{group_id}/input-ports"))
            .await?;
        let output_raw = self
            .get(&format!("/process-groups/{group_id}/output-ports"))
            .await?;

        let mut ports = Vec::new();
        for v in input_raw.get("inputPorts").and_then(Value::as_array).cloned().unwrap_or_default() {
            ports.push(parse_entity(NiFiEntityKind::Port, Some(PortKind::InputPort), v)?);
        }
        for v in output_raw.get("outputPorts").and_then(Value::as_array).cloned().unwrap_or_default() {
            ports.push(parse_entity(NiFiEntityKind::Port, Some(PortKind::OutputPort), v)?);
        }
        Ok(ports)
    }

    /// Tries the input-port endpoint first; on `404` tries output-port.
    /// Surfaces `NotFound` only when both fail (spec §4.A).
    pub async fn resolve_port(&self, id: &str) -> Result<NiFiEntity, NiFiClientError> {
        match self.get(&format!("/input-ports/{id}")).await {
            Ok(raw) => parse_entity(NiFiEntityKind::Port, Some(PortKind::InputPort), raw),
            Err(e) if e.is_not_found() => {
                let raw = self.get(&format!("/output-ports/{id}")).await?;
                parse_entity(NiFiEntityKind::Port, Some(PortKind::OutputPort), raw)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn create_port(
        &self,
        group_id: &str,
        kind: PortKind,
        name: &str,
        position: (f64, f64),
    ) -> Result<NiFiEntity, NiFiClientError> {
        let segment = port_segment(kind);
        let body = json!({
            "revision": { "clientId": self.client_id, "version": 0 },
            "component": { "name": name, "position": { "x": position.0, "y": position.1 } },
        });
        let raw = self
            .post(&format!("/process-groups/{group_id}/{segment}"), &body)
            .await?;
        parse_entity(NiFiEntityKind::Port, Some(kind), raw)
    }

    pub async fn update_port_run_status(
        &self,
        kind: PortKind,
        id: &str,
        revision: Revision,
        state: &str,
    ) -> Result<NiFiEntity, NiFiClientError> {
        let segment = port_segment(kind);
        let body = json!({ "revision": revision, "state": state });
        let raw = self.put(&format!("/{segment}/{id}/run-status"), &body).await?;
        parse_entity(NiFiEntityKind::Port, Some(kind), raw)
    }

    pub async fn delete_port(
        &self,
        kind: PortKind,
        id: &str,
        revision: &Revision,
    ) -> Result<(), NiFiClientError> {
        let segment = port_segment(kind);
        self.delete_with_query(
            &format!("/{segment}/{id}"),
            &[
                ("version", revision.version.to_string()),
                ("clientId", self.client_id.clone()),
            ],
        )
        .await
    }
}

fn port_segment(kind: PortKind) -> &'static str {
    match kind {
        PortKind::InputPort => "input-ports",
        PortKind::OutputPort => "output-ports",
    }
}
