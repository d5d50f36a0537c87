//! Resolves a connection endpoint's human-readable name to a NiFi id by
//! scanning the candidate components of a process group (spec §4.F step 5:
//! "name resolution by scanning candidates").

use nifi_client::{ConnectableRef, NiFiClient, NiFiClientError};

pub struct NamedConnectable {
    pub name: String,
    pub reference: ConnectableRef,
}

/// Every processor, input port and output port directly inside `group_id`,
/// the universe a connection's `source_name`/`target_name` is resolved
/// against. Process groups themselves are not connectable endpoints in the
/// same sense, so they're left out.
pub async fn collect_candidates(
    client: &NiFiClient,
    group_id: &str,
) -> Result<Vec<NamedConnectable>, NiFiClientError> {
    let mut candidates = Vec::new();

    for entity in client.list_processors(group_id).await? {
        let name = entity
            .component
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&entity.id)
            .to_string();
        candidates.push(NamedConnectable {
            name,
            reference: ConnectableRef {
                id: entity.id,
                group_id: group_id.to_string(),
                connectable_type: "PROCESSOR".to_string(),
            },
        });
    }

    for entity in client.list_ports(group_id).await? {
        let name = entity
            .component
            .get("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&entity.id)
            .to_string();
        let connectable_type = match entity.port_kind {
            Some(mw_tool_contracts::PortKind::InputPort) => "INPUT_PORT",
            Some(mw_tool_contracts::PortKind::OutputPort) => "OUTPUT_PORT",
            None => continue,
        };
        candidates.push(NamedConnectable {
            name,
            reference: ConnectableRef {
                id: entity.id,
                group_id: group_id.to_string(),
                connectable_type: connectable_type.to_string(),
            },
        });
    }

    Ok(candidates)
}

/// `Err` carries a message fit to surface directly in a batch item's
/// failure text — "not found" or "ambiguous" (spec §8's invariant that
/// ambiguous name resolution is reported as such, not resolved by guessing).
pub fn resolve_name<'a>(
    candidates: &'a [NamedConnectable],
    name: &str,
) -> Result<&'a ConnectableRef, String> {
    let matches: Vec<&NamedConnectable> = candidates.iter().filter(|c| c.name == name).collect();
    match matches.as_slice() {
        [] => Err(format!("no component named '{name}' was found in this process group")),
        [only] => Ok(&only.reference),
        multiple => Err(format!(
            "ambiguous: {} components are named '{name}' in this process group",
            multiple.len()
        )),
    }
}
