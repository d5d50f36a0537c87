//! `update_nifi_processors_properties` and `update_nifi_connection`
//! (spec §4.F). Both fetch the current revision before mutating — the
//! batch caller never supplies one, so a stale-revision conflict can only
//! come from a concurrent writer outside this request.

use mw_response_shaper::{shape_connection, shape_processor};
use nifi_client::NiFiClient;
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::item_result::{log_batch_summary, BatchItemResult};

pub async fn update_nifi_processors_properties(
    client: &NiFiClient,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        results.push(update_one_processor(client, item, index).await);
    }
    log_batch_summary("update_nifi_processors_properties", &results);
    Ok(results)
}

async fn update_one_processor(client: &NiFiClient, item: &Value, index: usize) -> BatchItemResult {
    let Some(id) = item.get("id").and_then(Value::as_str) else {
        return BatchItemResult::error(index, item.clone(), "missing required field 'id'");
    };
    let Some(properties) = item.get("properties").cloned() else {
        return BatchItemResult::error(index, item.clone(), "missing required field 'properties'");
    };

    let current = match client.get_processor(id).await {
        Ok(e) => e,
        Err(e) => return BatchItemResult::from_client_error(index, item.clone(), &e),
    };

    match client.update_processor_properties(id, current.revision, properties).await {
        Ok(entity) => BatchItemResult::success(index, item.clone(), "properties updated", Some(shape_processor(&entity))),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}

pub async fn update_nifi_connection(
    client: &NiFiClient,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        results.push(update_one_connection(client, item, index).await);
    }
    log_batch_summary("update_nifi_connection", &results);
    Ok(results)
}

async fn update_one_connection(client: &NiFiClient, item: &Value, index: usize) -> BatchItemResult {
    let Some(id) = item.get("id").and_then(Value::as_str) else {
        return BatchItemResult::error(index, item.clone(), "missing required field 'id'");
    };
    let relationships: Vec<String> = item
        .get("relationships")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let current = match client.get_connection(id).await {
        Ok(e) => e,
        Err(e) => return BatchItemResult::from_client_error(index, item.clone(), &e),
    };

    match client.update_connection(id, current.revision, &relationships).await {
        Ok(entity) => BatchItemResult::success(index, item.clone(), "connection updated", Some(shape_connection(&entity))),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}
