//! Filters raw NiFi entities into compact, LLM-friendly summaries (spec
//! §4.E). Every function here is pure: it depends only on its input and
//! never calls NiFi, matching the purity constraint called out for the
//! flow documenter (§4.J) and implied by the response shaper's own "never
//! calls NiFi" rule.

mod drop_request;

pub use drop_request::shape_drop_request_summary;

use mw_tool_contracts::{NiFiEntity, PortKind};
use serde_json::{json, Value};

fn field(entity: &NiFiEntity, key: &str) -> Value {
    entity.component.get(key).cloned().unwrap_or(Value::Null)
}

fn status_field(entity: &NiFiEntity, key: &str) -> Value {
    entity
        .status
        .as_ref()
        .and_then(|s| s.get(key))
        .cloned()
        .unwrap_or(Value::Null)
}

pub fn shape_processor(entity: &NiFiEntity) -> Value {
    json!({
        "id": entity.id,
        "name": field(entity, "name"),
        "type": field(entity, "type"),
        "state": field(entity, "state"),
        "position": field(entity, "position"),
        "runStatus": status_field(entity, "runStatus"),
        "validationStatus": field(entity, "validationStatus"),
        "validationErrors": field(entity, "validationErrors"),
        "relationships": field(entity, "relationships"),
        "properties": field(entity, "config").get("properties").cloned().unwrap_or(Value::Null),
        "version": entity.revision.version,
    })
}

pub fn shape_connection(entity: &NiFiEntity) -> Value {
    let shape_endpoint = |key: &str| -> Value {
        let endpoint = field(entity, key);
        json!({
            "id": endpoint.get("id").cloned().unwrap_or(Value::Null),
            "groupId": endpoint.get("groupId").cloned().unwrap_or(Value::Null),
            "type": endpoint.get("type").cloned().unwrap_or(Value::Null),
            "name": endpoint.get("name").cloned().unwrap_or(Value::Null),
        })
    };

    json!({
        "id": entity.id,
        "uri": field(entity, "uri"),
        "source": shape_endpoint("source"),
        "destination": shape_endpoint("destination"),
        "name": field(entity, "name"),
        "selectedRelationships": field(entity, "selectedRelationships"),
        "availableRelationships": field(entity, "availableRelationships"),
        "version": entity.revision.version,
    })
}

pub fn shape_port(entity: &NiFiEntity) -> Value {
    let port_type = match entity.port_kind {
        Some(PortKind::InputPort) => "INPUT_PORT",
        Some(PortKind::OutputPort) => "OUTPUT_PORT",
        None => "UNKNOWN",
    };
    json!({
        "id": entity.id,
        "name": field(entity, "name"),
        "type": port_type,
        "state": field(entity, "state"),
        "position": field(entity, "position"),
        "comments": field(entity, "comments"),
        "concurrentlySchedulableTaskCount": field(entity, "concurrentlySchedulableTaskCount"),
        "validationStatus": field(entity, "validationStatus"),
        "validationErrors": field(entity, "validationErrors"),
        "version": entity.revision.version,
    })
}

pub fn shape_process_group(entity: &NiFiEntity) -> Value {
    json!({
        "id": entity.id,
        "name": field(entity, "name"),
        "position": field(entity, "position"),
        "comments": field(entity, "comments"),
        "parameterContextId": field(entity, "parameterContext").get("id").cloned().unwrap_or(Value::Null),
        "flowfileConcurrency": field(entity, "flowfileConcurrency"),
        "flowfileOutboundPolicy": field(entity, "flowfileOutboundPolicy"),
        "status": entity.status.clone().unwrap_or(Value::Null),
        "version": entity.revision.version,
    })
}

pub fn shape_controller_service(entity: &NiFiEntity) -> Value {
    json!({
        "id": entity.id,
        "name": field(entity, "name"),
        "type": field(entity, "type"),
        "state": field(entity, "state"),
        "comments": field(entity, "comments"),
        "validationStatus": field(entity, "validationStatus"),
        "validationErrors": field(entity, "validationErrors"),
        "properties": field(entity, "properties"),
        "referencingComponents": field(entity, "referencingComponents"),
        "version": entity.revision.version,
        "bundle": field(entity, "bundle"),
        "serviceApis": field(entity, "controllerServiceApis"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_tool_contracts::{NiFiEntityKind, Revision};
    use serde_json::json;

    fn entity(kind: NiFiEntityKind, component: Value) -> NiFiEntity {
        NiFiEntity {
            id: "abc".into(),
            revision: Revision { client_id: None, version: 3 },
            kind,
            port_kind: None,
            component,
            status: Some(json!({"runStatus": "RUNNING"})),
            bulletins: None,
        }
    }

    #[test]
    fn shapes_processor_with_expected_fields() {
        let e = entity(
            NiFiEntityKind::Processor,
            json!({ "name": "LogAttribute", "type": "org.apache.nifi.processors.standard.LogAttribute" }),
        );
        let shaped = shape_processor(&e);
        assert_eq!(shaped["name"], "LogAttribute");
        assert_eq!(shaped["runStatus"], "RUNNING");
        assert_eq!(shaped["version"], 3);
    }

    #[test]
    fn shapes_port_using_resolved_port_kind() {
        let mut e = entity(NiFiEntityKind::Port, json!({ "name": "in" }));
        e.port_kind = Some(PortKind::InputPort);
        let shaped = shape_port(&e);
        assert_eq!(shaped["type"], "INPUT_PORT");
    }

    #[test]
    fn shaper_does_not_mutate_its_input() {
        let e = entity(NiFiEntityKind::Processor, json!({ "name": "A" }));
        let before = e.component.clone();
        let _ = shape_processor(&e);
        assert_eq!(e.component, before);
    }
}
