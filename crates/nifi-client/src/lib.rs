//! Authenticated, revision-aware REST client over Apache NiFi's API
//! (spec §4.A). One [`NiFiClient`] instance is bound to a single NiFi
//! server and is request-scoped: callers create one per incoming HTTP
//! request and do not share it across concurrent requests (spec §5).

mod bulletins;
mod catalogs;
mod client;
mod config;
mod connections;
mod controller_services;
mod entity_parse;
mod error;
mod ports;
mod poll;
mod process_groups;
mod processors;

pub use client::NiFiClient;
pub use config::NiFiServerConfig;
pub use connections::ConnectableRef;
pub use error::NiFiClientError;
pub use poll::{DropRequestOutcome, DEFAULT_SUBRESOURCE_TIMEOUT};

pub use mw_tool_contracts::{NiFiEntity, NiFiEntityKind, PortKind, Revision};
