//! Shared descriptor and entity types used by the tool registry, the
//! argument validator, the response shaper, and every concrete tool
//! implementation.

pub mod descriptor;
pub mod entity;
pub mod result;

pub use descriptor::{PhaseTag, ToolDescriptor, ToolDescriptorError};
pub use entity::{NiFiEntity, NiFiEntityKind, PortKind, Revision};
pub use result::{ToolOutcome, ToolResult};
