//! Declarative per-tool rename table (spec §4.C "Rename table").
//!
//! Built once as plain data rather than through macros or decorators —
//! argument rules are per-tool data, not per-crate statics discovered at
//! link time (SPEC_FULL.md §4.C).

use serde_json::{Map, Value};

/// `(tool_name, canonical_param, [aliases])`. Renaming is only applied
/// when the canonical name is absent from the caller's arguments.
const RENAME_TABLE: &[(&str, &str, &[&str])] = &[
    (
        "delete_nifi_objects",
        "objects",
        &["deletion_requests", "delete_requests", "items"],
    ),
    (
        "operate_nifi_objects",
        "operations",
        &["operation_requests", "items"],
    ),
    (
        "create_nifi_processors",
        "objects",
        &["processors", "items"],
    ),
    ("create_nifi_ports", "objects", &["ports", "items"]),
    (
        "create_controller_services",
        "objects",
        &["controller_services", "items"],
    ),
    (
        "create_nifi_connections",
        "connections",
        &["connection_requests", "items"],
    ),
    (
        "update_nifi_processors_properties",
        "updates",
        &["processor_updates", "items"],
    ),
];

pub(crate) fn apply_renames(tool: &str, map: &mut Map<String, Value>) {
    for (table_tool, canonical, aliases) in RENAME_TABLE {
        if *table_tool != tool {
            continue;
        }
        if map.contains_key(*canonical) {
            continue;
        }
        for alias in *aliases {
            if let Some(value) = map.remove(*alias) {
                log::debug!(
                    target: "mw::validator",
                    "tool '{tool}': renamed argument '{alias}' to '{canonical}'"
                );
                map.insert(canonical.to_string(), value);
                break;
            }
        }
    }
}
