//! The polymorphic NiFi entity shape (spec §3 "NiFi Entity") modeled as a
//! tagged variant over the five component kinds it diverges into (Design
//! Notes §9: "Model this as a tagged variant ... shaping is a function per
//! variant").

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{clientId, version}` pair NiFi returns with every mutable entity.
/// Echoed verbatim on the next mutation; a stale `version` triggers `409`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    #[serde(rename = "clientId", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub version: i64,
}

/// Which port variant a `port` id was resolved to (spec §4.A "Port-type
/// ambiguity" — `port` is not itself a NiFi REST type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortKind {
    InputPort,
    OutputPort,
}

/// Discriminant for [`NiFiEntity`], also used as a dispatch key by the
/// response shaper and the batch orchestrator's delete-tier ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NiFiEntityKind {
    Processor,
    Connection,
    Port,
    ProcessGroup,
    ControllerService,
}

/// A NiFi entity as received from the REST API: `id` + `revision` shared
/// across all kinds, `component` left as raw JSON since its shape is
/// type-specific and this crate never interprets it beyond what the
/// response shaper extracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiFiEntity {
    pub id: String,
    pub revision: Revision,
    pub kind: NiFiEntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_kind: Option<PortKind>,
    pub component: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulletins: Option<Value>,
}

impl NiFiEntity {
    pub fn new(kind: NiFiEntityKind, id: String, revision: Revision, component: Value) -> Self {
        Self {
            id,
            revision,
            kind,
            port_kind: None,
            component,
            status: None,
            bulletins: None,
        }
    }
}
