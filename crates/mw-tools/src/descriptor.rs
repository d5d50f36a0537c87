//! Small builder to keep each handler module's `descriptor()` call terse
//! (spec §3 "Tool Descriptor").

use mw_tool_contracts::{PhaseTag, ToolDescriptor};
use serde_json::Value;

pub fn describe(
    name: &str,
    short_description: &str,
    long_description: &str,
    parameters: Value,
    phases: &[PhaseTag],
) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        short_description: short_description.to_string(),
        long_description: long_description.to_string(),
        example: None,
        parameters,
        phases: phases.to_vec(),
    }
}
