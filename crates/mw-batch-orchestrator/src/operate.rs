//! `operate_nifi_objects` (spec §4.F): start/stop for processors and ports,
//! enable/disable for controller services. Each item is preceded by a
//! pre-check `GET` so an invalid component is refused with a distinct
//! message rather than forwarding whatever NiFi's run-status endpoint
//! would otherwise return.

use mw_response_shaper::{shape_controller_service, shape_port, shape_processor};
use nifi_client::NiFiClient;
use serde_json::Value;

use crate::error::OrchestratorError;
use crate::item_result::{log_batch_summary, BatchItemResult};

const CONTROLLER_SERVICE_ONLY_OPS: &[&str] = &["enable", "disable"];
const COMPONENT_ONLY_OPS: &[&str] = &["start", "stop"];

pub async fn operate_nifi_objects(
    client: &NiFiClient,
    items: &[Value],
) -> Result<Vec<BatchItemResult>, OrchestratorError> {
    if items.is_empty() {
        return Err(OrchestratorError::EmptyBatch);
    }
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        results.push(operate_one(client, item, index).await);
    }
    log_batch_summary("operate_nifi_objects", &results);
    Ok(results)
}

async fn operate_one(client: &NiFiClient, item: &Value, index: usize) -> BatchItemResult {
    let (Some(object_type), Some(object_id), Some(operation_type)) = (
        item.get("object_type").and_then(Value::as_str),
        item.get("object_id").and_then(Value::as_str),
        item.get("operation_type").and_then(Value::as_str),
    ) else {
        return BatchItemResult::error(
            index,
            item.clone(),
            "missing required field 'object_type', 'object_id' or 'operation_type'",
        );
    };

    if object_type == "controller_service" && !CONTROLLER_SERVICE_ONLY_OPS.contains(&operation_type) {
        return BatchItemResult::error(
            index,
            item.clone(),
            format!("operation '{operation_type}' is not valid for a controller service; use enable/disable"),
        );
    }
    if object_type != "controller_service" && !COMPONENT_ONLY_OPS.contains(&operation_type) {
        return BatchItemResult::error(
            index,
            item.clone(),
            format!("operation '{operation_type}' is not valid for a {object_type}; use start/stop"),
        );
    }

    match object_type {
        "processor" => operate_processor(client, object_id, operation_type, index, item).await,
        "port" => operate_port(client, object_id, operation_type, index, item).await,
        "controller_service" => operate_controller_service(client, object_id, operation_type, index, item).await,
        other => BatchItemResult::error(index, item.clone(), format!("unsupported object_type '{other}' for operate")),
    }
}

fn validation_status(component: &Value) -> &str {
    component.get("validationStatus").and_then(Value::as_str).unwrap_or("VALID")
}

async fn operate_processor(client: &NiFiClient, id: &str, op: &str, index: usize, item: &Value) -> BatchItemResult {
    let entity = match client.get_processor(id).await {
        Ok(e) => e,
        Err(e) => return BatchItemResult::from_client_error(index, item.clone(), &e),
    };
    if op == "start" && validation_status(&entity.component) != "VALID" {
        return BatchItemResult::error(
            index,
            item.clone(),
            "cannot start an invalid component; check its validation errors first",
        );
    }
    let state = if op == "start" { "RUNNING" } else { "STOPPED" };
    match client.update_processor_run_status(id, entity.revision, state).await {
        Ok(updated) => BatchItemResult::success(index, item.clone(), format!("{op} succeeded"), Some(shape_processor(&updated))),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}

async fn operate_port(client: &NiFiClient, id: &str, op: &str, index: usize, item: &Value) -> BatchItemResult {
    let entity = match client.resolve_port(id).await {
        Ok(e) => e,
        Err(e) => return BatchItemResult::from_client_error(index, item.clone(), &e),
    };
    if op == "start" && validation_status(&entity.component) != "VALID" {
        return BatchItemResult::error(
            index,
            item.clone(),
            "cannot start an invalid component; check its validation errors first",
        );
    }
    let kind = entity.port_kind.expect("resolve_port always sets port_kind");
    let state = if op == "start" { "RUNNING" } else { "STOPPED" };
    match client.update_port_run_status(kind, id, entity.revision, state).await {
        Ok(updated) => BatchItemResult::success(index, item.clone(), format!("{op} succeeded"), Some(shape_port(&updated))),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}

async fn operate_controller_service(
    client: &NiFiClient,
    id: &str,
    op: &str,
    index: usize,
    item: &Value,
) -> BatchItemResult {
    let entity = match client.get_controller_service(id).await {
        Ok(e) => e,
        Err(e) => return BatchItemResult::from_client_error(index, item.clone(), &e),
    };
    if op == "enable" && validation_status(&entity.component) != "VALID" {
        return BatchItemResult::error(
            index,
            item.clone(),
            "cannot enable an invalid controller service; check its validation errors first",
        );
    }
    let state = if op == "enable" { "ENABLED" } else { "DISABLED" };
    match client.update_controller_service_state(id, entity.revision, state).await {
        Ok(updated) => BatchItemResult::success(
            index,
            item.clone(),
            format!("{op} succeeded"),
            Some(shape_controller_service(&updated)),
        ),
        Err(e) => BatchItemResult::from_client_error(index, item.clone(), &e),
    }
}
