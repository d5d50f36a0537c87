//! HTTP/SSE front-end (spec §4.H): axum routes over the tool registry and
//! workflow catalog, configuration loading, and status-code mapping.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod workflow_catalog;

pub use config::MiddlewareConfig;
pub use routes::build_router;
pub use state::AppState;
