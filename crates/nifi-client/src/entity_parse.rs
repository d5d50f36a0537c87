//! Parses NiFi's entity envelope (`{id, revision, component, status}`)
//! into the tagged [`NiFiEntity`] shared across the crate.

use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, PortKind, Revision};
use serde_json::Value;

use crate::error::NiFiClientError;

pub(crate) fn parse_entity(
    kind: NiFiEntityKind,
    port_kind: Option<PortKind>,
    raw: Value,
) -> Result<NiFiEntity, NiFiClientError> {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| NiFiClientError::BadRequest("NiFi entity missing id".into()))?
        .to_string();

    let revision: Revision = raw
        .get("revision")
        .cloned()
        .ok_or_else(|| NiFiClientError::BadRequest("NiFi entity missing revision".into()))
        .and_then(|v| serde_json::from_value(v).map_err(NiFiClientError::from))?;

    let component = raw.get("component").cloned().unwrap_or(Value::Null);
    let status = raw.get("status").cloned();
    let bulletins = raw.get("bulletins").cloned();

    Ok(NiFiEntity {
        id,
        revision,
        kind,
        port_kind,
        component,
        status,
        bulletins,
    })
}
