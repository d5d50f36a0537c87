//! `delete_nifi_objects` (spec §4.F): deletes are reordered into tiers —
//! connections first, then processors/ports/controller services, then
//! process groups — so a group is never deleted while something inside it
//! still holds a connection. Each item's `request_index` is preserved so
//! the reordering is invisible to the caller.

use nifi_client::{NiFiClient, NiFiClientError};
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::item_result::{log_batch_summary, BatchItemResult};

fn tier_rank(object_type: &str) -> u8 {
    match object_type {
        "connection" => 0,
        "processor" | "port" | "controller_service" => 1,
        "process_group" => 2,
        _ => 3,
    }
}

pub async fn delete_nifi_objects(
    client: &NiFiClient,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }

    let mut ordered: Vec<(usize, &Value)> = items.iter().enumerate().collect();
    ordered.sort_by_key(|(_, item)| {
        tier_rank(item.get("object_type").and_then(Value::as_str).unwrap_or("unknown"))
    });

    let mut by_index: Vec<Option<BatchItemResult>> = (0..items.len()).map(|_| None).collect();
    for (index, item) in ordered {
        by_index[index] = Some(delete_one(client, item, index).await);
    }

    let results: Vec<BatchItemResult> = by_index.into_iter().map(|r| r.expect("every index visited once")).collect();
    log_batch_summary("delete_nifi_objects", &results);
    Ok(results)
}

async fn delete_one(client: &NiFiClient, item: &Value, index: usize) -> BatchItemResult {
    let (Some(object_type), Some(object_id)) = (
        item.get("object_type").and_then(Value::as_str),
        item.get("object_id").and_then(Value::as_str),
    ) else {
        return BatchItemResult::error(index, item.clone(), "missing required field 'object_type' or 'object_id'");
    };

    let outcome = match object_type {
        "processor" => delete_processor(client, object_id).await,
        "connection" => delete_connection(client, object_id).await,
        "port" => delete_port(client, object_id).await,
        "controller_service" => delete_controller_service(client, object_id).await,
        "process_group" => delete_process_group(client, object_id).await,
        other => Err(NiFiClientError::BadRequest(format!("unknown object_type '{other}'"))),
    };

    match outcome {
        Ok(()) => BatchItemResult::success(index, item.clone(), "deleted", None),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}

/// A component running is refused, not silently force-stopped, before the
/// delete is attempted (spec §4.F step 6 "refuse deletes of running
/// components").
fn refuse_if_running(status: &Option<Value>) -> Result<(), NiFiClientError> {
    let run_status = status.as_ref().and_then(|s| s.get("runStatus")).and_then(Value::as_str);
    if run_status == Some("RUNNING") {
        return Err(NiFiClientError::BadRequest(
            "cannot delete a running component; stop it first".to_string(),
        ));
    }
    Ok(())
}

async fn delete_processor(client: &NiFiClient, id: &str) -> Result<(), NiFiClientError> {
    match client.get_processor(id).await {
        Ok(entity) => {
            refuse_if_running(&entity.status)?;
            client.delete_processor(id, &entity.revision).await
        }
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

async fn delete_connection(client: &NiFiClient, id: &str) -> Result<(), NiFiClientError> {
    match client.get_connection(id).await {
        Ok(entity) => client.delete_connection(id, &entity.revision).await,
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

async fn delete_port(client: &NiFiClient, id: &str) -> Result<(), NiFiClientError> {
    match client.resolve_port(id).await {
        Ok(entity) => {
            refuse_if_running(&entity.status)?;
            let kind = entity.port_kind.expect("resolve_port always sets port_kind");
            client.delete_port(kind, id, &entity.revision).await
        }
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

async fn delete_controller_service(client: &NiFiClient, id: &str) -> Result<(), NiFiClientError> {
    match client.get_controller_service(id).await {
        Ok(entity) => client.delete_controller_service(id, &entity.revision).await,
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

async fn delete_process_group(client: &NiFiClient, id: &str) -> Result<(), NiFiClientError> {
    match client.get_process_group(id).await {
        Ok(entity) => client.delete_process_group(id, &entity.revision).await,
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_rank_orders_connections_before_components_before_groups() {
        assert!(tier_rank("connection") < tier_rank("processor"));
        assert!(tier_rank("processor") < tier_rank("process_group"));
        assert_eq!(tier_rank("processor"), tier_rank("port"));
        assert_eq!(tier_rank("processor"), tier_rank("controller_service"));
    }
}
