//! Traverses processors/connections/ports to emit a decision-point-aware
//! flow summary (spec §4.J). Pure and synchronous: every function here
//! depends only on its input and never calls NiFi, the same purity
//! constraint spec §4.E holds the response shaper to.
//!
//! Grounded on `original_source/nifi_mcp_server/flow_documenter_improved.py`
//! (`document_nifi_flow_improved` and its helpers), reshaped into typed
//! Rust structures instead of loosely-shaped dicts.

mod paths;

pub use paths::{find_decision_points, identify_flow_paths, Branch, DecisionPoint, FlowPath, PathStep};

use std::collections::{HashMap, HashSet};

use mw_tool_contracts::{NiFiEntity, PortKind};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_type: Option<&'static str>,
    pub is_source: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackPressure {
    pub object_threshold: Value,
    pub data_size_threshold: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionSummary {
    pub id: String,
    pub name: String,
    pub source_id: Option<String>,
    pub source_name: String,
    pub source_type: String,
    pub destination_id: Option<String>,
    pub destination_name: String,
    pub destination_type: String,
    pub relationship: String,
    pub prioritizers: Value,
    pub backpressure: BackPressure,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnconnectedComponent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowDocument {
    pub processors: HashMap<String, ComponentSummary>,
    pub connections: HashMap<String, ConnectionSummary>,
    pub ports: HashMap<String, ComponentSummary>,
    pub flows: Vec<FlowPath>,
    pub decision_points: Vec<DecisionPoint>,
    pub unconnected_components: Vec<UnconnectedComponent>,
}

/// Adjacency of connections by endpoint id, built once and shared by
/// decision-point detection and flow-path traversal.
pub(crate) struct Graph<'a> {
    pub outgoing: HashMap<String, Vec<&'a NiFiEntity>>,
    pub incoming: HashMap<String, Vec<&'a NiFiEntity>>,
}

fn build_graph<'a>(connections: &'a [NiFiEntity]) -> Graph<'a> {
    let mut outgoing: HashMap<String, Vec<&NiFiEntity>> = HashMap::new();
    let mut incoming: HashMap<String, Vec<&NiFiEntity>> = HashMap::new();
    for conn in connections {
        let source_id = conn.component.get("source").and_then(|s| s.get("id")).and_then(Value::as_str);
        let dest_id = conn.component.get("destination").and_then(|d| d.get("id")).and_then(Value::as_str);
        if let Some(id) = source_id {
            outgoing.entry(id.to_string()).or_default().push(conn);
        }
        if let Some(id) = dest_id {
            incoming.entry(id.to_string()).or_default().push(conn);
        }
    }
    Graph { outgoing, incoming }
}

fn extract_expressions(properties: &Value) -> Map<String, Value> {
    let mut expressions = Map::new();
    let Some(properties) = properties.as_object() else {
        return expressions;
    };
    for (name, value) in properties {
        let Some(text) = value.as_str() else { continue };
        let found = scan_expressions(text);
        if !found.is_empty() {
            expressions.insert(name.clone(), Value::Array(found.into_iter().map(Value::String).collect()));
        }
    }
    expressions
}

/// Pulls out the inner text of every `${...}` span, the way NiFi
/// expression-language references appear inside property values. A
/// hand-written scan rather than a regex dependency, matching this
/// workspace's preference (see the bulletin-board sanitizer) for small
/// single-purpose text scans over pulling in a pattern-matching crate.
fn scan_expressions(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'$' && bytes[i + 1] == b'{' {
            let start = i + 2;
            if let Some(offset) = text[start..].find('}') {
                found.push(text[start..start + offset].to_string());
                i = start + offset + 1;
                continue;
            }
        }
        i += 1;
    }
    found
}

fn summarize_processor(entity: &NiFiEntity, include_properties: bool, include_descriptions: bool, is_source: bool) -> ComponentSummary {
    let name = entity.component.get("name").and_then(Value::as_str).unwrap_or("Unknown").to_string();
    let processor_type = entity.component.get("type").and_then(Value::as_str).map(str::to_string);
    let properties = entity
        .component
        .get("config")
        .and_then(|c| c.get("properties"))
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    ComponentSummary {
        id: entity.id.clone(),
        name,
        component_type: "PROCESSOR",
        processor_type,
        port_type: None,
        is_source,
        properties: include_properties.then(|| properties.clone()),
        expressions: include_properties.then(|| Value::Object(extract_expressions(&properties))),
        description: include_descriptions.then(|| {
            entity.component.get("comments").and_then(Value::as_str).unwrap_or("").to_string()
        }),
    }
}

fn summarize_port(entity: &NiFiEntity, include_descriptions: bool) -> ComponentSummary {
    let name = entity.component.get("name").and_then(Value::as_str).unwrap_or("Unknown").to_string();
    let port_type = match entity.port_kind {
        Some(PortKind::InputPort) => "INPUT_PORT",
        Some(PortKind::OutputPort) => "OUTPUT_PORT",
        None => "UNKNOWN",
    };
    ComponentSummary {
        id: entity.id.clone(),
        name,
        component_type: "PORT",
        processor_type: None,
        port_type: Some(port_type),
        is_source: matches!(entity.port_kind, Some(PortKind::InputPort)),
        properties: None,
        expressions: None,
        description: include_descriptions.then(|| {
            entity.component.get("comments").and_then(Value::as_str).unwrap_or("").to_string()
        }),
    }
}

fn endpoint_name(endpoint: &Value, resolved_name: Option<&str>) -> String {
    resolved_name
        .map(str::to_string)
        .or_else(|| endpoint.get("name").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn summarize_connection(conn: &NiFiEntity, names_by_id: &HashMap<String, String>) -> ConnectionSummary {
    let source = conn.component.get("source").cloned().unwrap_or(Value::Null);
    let destination = conn.component.get("destination").cloned().unwrap_or(Value::Null);
    let source_id = source.get("id").and_then(Value::as_str).map(str::to_string);
    let destination_id = destination.get("id").and_then(Value::as_str).map(str::to_string);

    ConnectionSummary {
        id: conn.id.clone(),
        name: conn.component.get("name").and_then(Value::as_str).unwrap_or("").to_string(),
        source_name: endpoint_name(&source, source_id.as_deref().and_then(|id| names_by_id.get(id).map(String::as_str))),
        source_type: source.get("type").and_then(Value::as_str).unwrap_or("UNKNOWN").to_string(),
        source_id,
        destination_name: endpoint_name(&destination, destination_id.as_deref().and_then(|id| names_by_id.get(id).map(String::as_str))),
        destination_type: destination.get("type").and_then(Value::as_str).unwrap_or("UNKNOWN").to_string(),
        destination_id,
        relationship: conn
            .component
            .get("selectedRelationships")
            .and_then(Value::as_array)
            .and_then(|r| r.first())
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        prioritizers: conn.component.get("prioritizers").cloned().unwrap_or(Value::Array(Vec::new())),
        backpressure: BackPressure {
            object_threshold: conn.component.get("backPressureObjectThreshold").cloned().unwrap_or(Value::Null),
            data_size_threshold: conn.component.get("backPressureDataSizeThreshold").cloned().unwrap_or(Value::Null),
        },
    }
}

pub fn document_flow(
    processors: &[NiFiEntity],
    connections: &[NiFiEntity],
    ports: &[NiFiEntity],
    include_properties: bool,
    include_descriptions: bool,
) -> FlowDocument {
    let graph = build_graph(connections);

    let mut names_by_id = HashMap::new();
    for p in processors {
        if let Some(name) = p.component.get("name").and_then(Value::as_str) {
            names_by_id.insert(p.id.clone(), name.to_string());
        }
    }
    for p in ports {
        if let Some(name) = p.component.get("name").and_then(Value::as_str) {
            names_by_id.insert(p.id.clone(), name.to_string());
        }
    }

    let mut processor_summaries = HashMap::new();
    for entity in processors {
        let is_source = !graph.incoming.contains_key(&entity.id);
        processor_summaries.insert(
            entity.id.clone(),
            summarize_processor(entity, include_properties, include_descriptions, is_source),
        );
    }

    let mut port_summaries = HashMap::new();
    for entity in ports {
        port_summaries.insert(entity.id.clone(), summarize_port(entity, include_descriptions));
    }

    let mut connection_summaries = HashMap::new();
    for conn in connections {
        connection_summaries.insert(conn.id.clone(), summarize_connection(conn, &names_by_id));
    }

    let decision_points = find_decision_points(&graph, &names_by_id, processors);
    let flows = identify_flow_paths(&graph, &processor_summaries, &port_summaries);

    let mut connected_ids: HashSet<&str> = HashSet::new();
    connected_ids.extend(graph.outgoing.keys().map(String::as_str));
    connected_ids.extend(graph.incoming.keys().map(String::as_str));

    let mut unconnected_components = Vec::new();
    for (id, summary) in processor_summaries.iter().chain(port_summaries.iter()) {
        if !connected_ids.contains(id.as_str()) {
            unconnected_components.push(UnconnectedComponent {
                id: id.clone(),
                name: summary.name.clone(),
                component_type: summary.component_type,
            });
        }
    }

    FlowDocument {
        processors: processor_summaries,
        connections: connection_summaries,
        ports: port_summaries,
        flows,
        decision_points,
        unconnected_components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mw_tool_contracts::{NiFiEntityKind, Revision};
    use serde_json::json;

    fn processor(id: &str, name: &str) -> NiFiEntity {
        NiFiEntity::new(
            NiFiEntityKind::Processor,
            id.to_string(),
            Revision { client_id: None, version: 0 },
            json!({ "name": name, "type": "org.apache.nifi.processors.standard.LogAttribute", "comments": "" }),
        )
    }

    fn connection(id: &str, source: &str, dest: &str, relationship: &str) -> NiFiEntity {
        NiFiEntity::new(
            NiFiEntityKind::Connection,
            id.to_string(),
            Revision { client_id: None, version: 0 },
            json!({
                "source": { "id": source, "type": "PROCESSOR" },
                "destination": { "id": dest, "type": "PROCESSOR" },
                "selectedRelationships": [relationship],
            }),
        )
    }

    #[test]
    fn scans_expressions_out_of_property_values() {
        assert_eq!(scan_expressions("${filename}.gz"), vec!["filename".to_string()]);
        assert_eq!(scan_expressions("no expression here"), Vec::<String>::new());
        assert_eq!(
            scan_expressions("${a}-${b}"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn a_processor_with_two_outgoing_relationships_is_a_decision_point() {
        let processors = vec![processor("p1", "RouteOnAttribute"), processor("p2", "A"), processor("p3", "B")];
        let connections = vec![connection("c1", "p1", "p2", "matched"), connection("c2", "p1", "p3", "unmatched")];
        let doc = document_flow(&processors, &connections, &[], false, false);
        assert_eq!(doc.decision_points.len(), 1);
        assert_eq!(doc.decision_points[0].processor_id, "p1");
        assert_eq!(doc.decision_points[0].branches.len(), 2);
    }

    #[test]
    fn a_processor_with_no_connections_is_unconnected() {
        let processors = vec![processor("p1", "Isolated")];
        let doc = document_flow(&processors, &[], &[], false, false);
        assert_eq!(doc.unconnected_components.len(), 1);
        assert_eq!(doc.unconnected_components[0].id, "p1");
    }

    #[test]
    fn flow_paths_start_from_source_processors_with_no_incoming_connections() {
        let processors = vec![processor("p1", "GenerateFlowFile"), processor("p2", "LogAttribute")];
        let connections = vec![connection("c1", "p1", "p2", "success")];
        let doc = document_flow(&processors, &connections, &[], false, false);
        assert_eq!(doc.flows.len(), 1);
        assert_eq!(doc.flows[0].path.len(), 2);
        assert_eq!(doc.flows[0].source, "GenerateFlowFile");
    }
}
