//! `create_nifi_processors`, `create_nifi_ports`, `create_controller_services`
//! and `create_nifi_connections` (spec §4.F).

use mw_response_shaper::{shape_connection, shape_controller_service, shape_port, shape_processor};
use nifi_client::NiFiClient;
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::item_result::{log_batch_summary, BatchItemResult};
use crate::resolve::{collect_candidates, resolve_name};

fn parse_position(item: &Value) -> (f64, f64) {
    let position = item.get("position");
    let x = position.and_then(|p| p.get("x")).and_then(Value::as_f64).unwrap_or(0.0);
    let y = position.and_then(|p| p.get("y")).and_then(Value::as_f64).unwrap_or(0.0);
    (x, y)
}

pub async fn create_nifi_processors(
    client: &NiFiClient,
    group_id: &str,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let result = match item.get("type").and_then(Value::as_str) {
            None => BatchItemResult::error(index, item.clone(), "missing required field 'type'"),
            Some(processor_type) => {
                let name = item.get("name").and_then(Value::as_str).unwrap_or(processor_type);
                match client
                    .create_processor(group_id, processor_type, name, parse_position(item))
                    .await
                {
                    Ok(entity) => BatchItemResult::success(index, item.clone(), "processor created", Some(shape_processor(&entity))),
                    Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
                }
            }
        };
        results.push(result);
    }
    log_batch_summary("create_nifi_processors", &results);
    Ok(results)
}

pub async fn create_nifi_ports(
    client: &NiFiClient,
    group_id: &str,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let result = match (
            item.get("name").and_then(Value::as_str),
            item.get("port_type").and_then(Value::as_str),
        ) {
            (Some(name), Some(port_type)) => {
                let kind = match port_type.to_ascii_uppercase().as_str() {
                    "INPUT_PORT" => Some(mw_tool_contracts::PortKind::InputPort),
                    "OUTPUT_PORT" => Some(mw_tool_contracts::PortKind::OutputPort),
                    _ => None,
                };
                match kind {
                    None => BatchItemResult::error(
                        index,
                        item.clone(),
                        format!("unknown port_type '{port_type}', expected INPUT_PORT or OUTPUT_PORT"),
                    ),
                    Some(kind) => match client.create_port(group_id, kind, name, parse_position(item)).await {
                        Ok(entity) => BatchItemResult::success(index, item.clone(), "port created", Some(shape_port(&entity))),
                        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
                    },
                }
            }
            _ => BatchItemResult::error(index, item.clone(), "missing required field 'name' or 'port_type'"),
        };
        results.push(result);
    }
    log_batch_summary("create_nifi_ports", &results);
    Ok(results)
}

pub async fn create_controller_services(
    client: &NiFiClient,
    group_id: &str,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let result = match item.get("type").and_then(Value::as_str) {
            None => BatchItemResult::error(index, item.clone(), "missing required field 'type'"),
            Some(service_type) => {
                let name = item.get("name").and_then(Value::as_str).unwrap_or(service_type);
                match client.create_controller_service(group_id, service_type, name).await {
                    Ok(entity) => BatchItemResult::success(
                        index,
                        item.clone(),
                        "controller service created",
                        Some(shape_controller_service(&entity)),
                    ),
                    Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
                }
            }
        };
        results.push(result);
    }
    log_batch_summary("create_controller_services", &results);
    Ok(results)
}

pub async fn create_nifi_connections(
    client: &NiFiClient,
    group_id: &str,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let candidates = collect_candidates(client, group_id).await?;

    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        results.push(create_one_connection(client, group_id, &candidates, item, index).await);
    }
    log_batch_summary("create_nifi_connections", &results);
    Ok(results)
}

async fn create_one_connection(
    client: &NiFiClient,
    group_id: &str,
    candidates: &[crate::resolve::NamedConnectable],
    item: &Value,
    index: usize,
) -> BatchItemResult {
    let (Some(source_name), Some(target_name)) = (
        item.get("source_name").and_then(Value::as_str),
        item.get("target_name").and_then(Value::as_str),
    ) else {
        return BatchItemResult::error(index, item.clone(), "missing required field 'source_name' or 'target_name'");
    };
    let relationships: Vec<String> = item
        .get("relationships")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();
    if relationships.is_empty() {
        return BatchItemResult::error(index, item.clone(), "'relationships' must be a non-empty list");
    }

    let source = match resolve_name(candidates, source_name) {
        Ok(r) => r,
        Err(msg) => return BatchItemResult::error(index, item.clone(), format!("source_name: {msg}")),
    };
    let destination = match resolve_name(candidates, target_name) {
        Ok(r) => r,
        Err(msg) => return BatchItemResult::error(index, item.clone(), format!("target_name: {msg}")),
    };
    let name = item.get("name").and_then(Value::as_str);

    match client.create_connection(group_id, source, destination, name, &relationships).await {
        Ok(entity) => BatchItemResult::success(index, item.clone(), "connection created", Some(shape_connection(&entity))),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}
