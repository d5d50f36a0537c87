//! Tool registry and dispatcher (spec §4.D).

mod error;
mod handler;
mod registry;

pub use error::DispatchError;
pub use handler::ToolHandler;
pub use registry::ToolRegistry;
