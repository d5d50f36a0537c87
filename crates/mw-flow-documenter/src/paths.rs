//! Decision-point detection and source-to-sink flow-path traversal.
//! Grounded on `find_decision_branches` and `identify_flow_paths` in
//! `flow_documenter_improved.py`.

use std::collections::{HashMap, HashSet};

use mw_tool_contracts::NiFiEntity;
use serde::Serialize;

use crate::{ComponentSummary, Graph};

#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub relationship: String,
    pub destination_id: String,
    pub destination_name: String,
    pub destination_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionPoint {
    pub processor_id: String,
    pub processor_name: String,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathStep {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_in: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowPath {
    pub source: String,
    pub path: Vec<PathStep>,
}

/// A component is a decision point when it has outgoing connections
/// spanning at least two distinct relationships — a single relationship
/// fanning out to several destinations is not a branch, it's broadcast.
pub fn find_decision_points(
    graph: &Graph,
    names_by_id: &HashMap<String, String>,
    processors: &[NiFiEntity],
) -> Vec<DecisionPoint> {
    let mut decision_points = Vec::new();
    for processor in processors {
        let Some(outgoing) = graph.outgoing.get(&processor.id) else { continue };
        if outgoing.len() < 2 {
            continue;
        }
        let relationships: HashSet<&str> = outgoing
            .iter()
            .map(|conn| relationship_of(conn))
            .collect();
        if relationships.len() < 2 {
            continue;
        }
        let branches = outgoing
            .iter()
            .map(|conn| {
                let dest = conn.component.get("destination").cloned().unwrap_or_default();
                let dest_id = dest.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string();
                let dest_name = names_by_id.get(&dest_id).cloned().unwrap_or_else(|| "Unknown".to_string());
                Branch {
                    relationship: relationship_of(conn).to_string(),
                    destination_name: dest_name,
                    destination_id: dest_id,
                    destination_type: dest.get("type").and_then(|v| v.as_str()).map(type_tag).unwrap_or("UNKNOWN"),
                }
            })
            .collect();
        decision_points.push(DecisionPoint {
            processor_id: processor.id.clone(),
            processor_name: names_by_id.get(&processor.id).cloned().unwrap_or_else(|| "Unknown".to_string()),
            branches,
        });
    }
    decision_points
}

fn relationship_of(conn: &NiFiEntity) -> &str {
    conn.component
        .get("selectedRelationships")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first())
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn type_tag(raw: &str) -> &'static str {
    match raw {
        "INPUT_PORT" | "OUTPUT_PORT" => "PORT",
        "PROCESS_GROUP" => "PROCESS_GROUP",
        _ => "PROCESSOR",
    }
}

/// DFS from every source component (one with no incoming connections —
/// typically an input port or the first processor in a flow). Each
/// branch at a decision point recurses with its own copy of the visited
/// set so that two branches rejoining downstream are documented
/// independently instead of one being truncated as a "revisit".
pub fn identify_flow_paths(
    graph: &Graph,
    processors: &HashMap<String, ComponentSummary>,
    ports: &HashMap<String, ComponentSummary>,
) -> Vec<FlowPath> {
    let mut sources: Vec<&ComponentSummary> = processors
        .values()
        .chain(ports.values())
        .filter(|c| c.is_source)
        .collect();
    sources.sort_by(|a, b| a.id.cmp(&b.id));

    let mut flows = Vec::new();
    for source in sources {
        let mut visited = HashSet::new();
        visited.insert(source.id.clone());
        let first_step = PathStep {
            id: source.id.clone(),
            name: source.name.clone(),
            component_type: source.component_type,
            relationship_in: None,
        };
        walk(source.id.as_str(), visited, vec![first_step], graph, processors, ports, &mut flows, &source.name);
    }
    flows
}

fn walk(
    current_id: &str,
    visited: HashSet<String>,
    path: Vec<PathStep>,
    graph: &Graph,
    processors: &HashMap<String, ComponentSummary>,
    ports: &HashMap<String, ComponentSummary>,
    flows: &mut Vec<FlowPath>,
    source_name: &str,
) {
    let outgoing = graph.outgoing.get(current_id);
    let Some(outgoing) = outgoing.filter(|o| !o.is_empty()) else {
        flows.push(FlowPath { source: source_name.to_string(), path });
        return;
    };

    let mut branched = false;
    for conn in outgoing {
        let dest = conn.component.get("destination").cloned().unwrap_or_default();
        let Some(dest_id) = dest.get("id").and_then(|v| v.as_str()) else { continue };

        if visited.contains(dest_id) {
            let mut terminated = path.clone();
            terminated.push(PathStep {
                id: dest_id.to_string(),
                name: lookup_name(dest_id, processors, ports),
                component_type: lookup_type(dest_id, processors, ports),
                relationship_in: Some(relationship_of(conn).to_string()),
            });
            flows.push(FlowPath { source: source_name.to_string(), path: terminated });
            branched = true;
            continue;
        }

        branched = true;
        let mut branch_visited = visited.clone();
        branch_visited.insert(dest_id.to_string());
        let mut branch_path = path.clone();
        branch_path.push(PathStep {
            id: dest_id.to_string(),
            name: lookup_name(dest_id, processors, ports),
            component_type: lookup_type(dest_id, processors, ports),
            relationship_in: Some(relationship_of(conn).to_string()),
        });
        walk(dest_id, branch_visited, branch_path, graph, processors, ports, flows, source_name);
    }

    if !branched {
        flows.push(FlowPath { source: source_name.to_string(), path });
    }
}

fn lookup_name(id: &str, processors: &HashMap<String, ComponentSummary>, ports: &HashMap<String, ComponentSummary>) -> String {
    processors
        .get(id)
        .or_else(|| ports.get(id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn lookup_type(id: &str, processors: &HashMap<String, ComponentSummary>, ports: &HashMap<String, ComponentSummary>) -> &'static str {
    processors.get(id).or_else(|| ports.get(id)).map(|c| c.component_type).unwrap_or("UNKNOWN")
}
