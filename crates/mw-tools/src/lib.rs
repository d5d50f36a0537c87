//! Concrete tool handlers (spec §3's catalog, §4.D's registry) wired onto
//! `mw-tool-registry`, `mw-batch-orchestrator`, `mw-response-shaper`,
//! `mw-expert-help` and `mw-flow-documenter`. `init` is the explicit
//! registration step the registry's own docs call for: every descriptor
//! and handler pair is built here, once, at startup.

mod batch;
mod catalogs;
mod descriptor;
mod expert_help;
mod flow_document;
mod process_groups;
mod reads;
mod subresources;
mod workflow_nodes;

pub use workflow_nodes::ToolCallNode;

use std::sync::Arc;

use mw_expert_help::ExpertHelpLimiter;
use mw_tool_registry::ToolRegistry;

pub fn init(registry: &mut ToolRegistry, expert_help_limiter: Arc<ExpertHelpLimiter>) {
    registry.register(reads::list_nifi_processors_descriptor(), Arc::new(reads::ListNiFiProcessors));
    registry.register(reads::list_nifi_connections_descriptor(), Arc::new(reads::ListNiFiConnections));
    registry.register(reads::list_nifi_ports_descriptor(), Arc::new(reads::ListNiFiPorts));
    registry.register(reads::list_nifi_process_groups_descriptor(), Arc::new(reads::ListNiFiProcessGroups));
    registry.register(reads::list_controller_services_descriptor(), Arc::new(reads::ListControllerServices));
    registry.register(reads::get_nifi_process_group_status_descriptor(), Arc::new(reads::GetNiFiProcessGroupStatus));

    registry.register(batch::create_nifi_processors_descriptor(), Arc::new(batch::CreateNiFiProcessors));
    registry.register(batch::create_nifi_ports_descriptor(), Arc::new(batch::CreateNiFiPorts));
    registry.register(batch::create_controller_services_descriptor(), Arc::new(batch::CreateControllerServices));
    registry.register(batch::create_nifi_connections_descriptor(), Arc::new(batch::CreateNiFiConnections));
    registry.register(batch::update_nifi_processors_properties_descriptor(), Arc::new(batch::UpdateNiFiProcessorsProperties));
    registry.register(batch::update_nifi_connection_descriptor(), Arc::new(batch::UpdateNiFiConnection));
    registry.register(batch::delete_nifi_objects_descriptor(), Arc::new(batch::DeleteNiFiObjects));
    registry.register(batch::operate_nifi_objects_descriptor(), Arc::new(batch::OperateNiFiObjects));

    registry.register(process_groups::create_nifi_process_group_descriptor(), Arc::new(process_groups::CreateNiFiProcessGroup));
    registry.register(process_groups::update_nifi_process_group_descriptor(), Arc::new(process_groups::UpdateNiFiProcessGroup));

    registry.register(catalogs::list_nifi_processor_types_descriptor(), Arc::new(catalogs::ListNiFiProcessorTypes));
    registry.register(catalogs::list_controller_service_types_descriptor(), Arc::new(catalogs::ListControllerServiceTypes));
    registry.register(catalogs::search_nifi_flow_descriptor(), Arc::new(catalogs::SearchNiFiFlow));
    registry.register(catalogs::get_nifi_bulletin_board_descriptor(), Arc::new(catalogs::GetNiFiBulletinBoard));

    registry.register(subresources::purge_nifi_connection_queue_descriptor(), Arc::new(subresources::PurgeNiFiConnectionQueue));
    registry.register(subresources::list_nifi_connection_queue_descriptor(), Arc::new(subresources::ListNiFiConnectionQueue));
    registry.register(subresources::query_nifi_provenance_descriptor(), Arc::new(subresources::QueryNiFiProvenance));

    registry.register(expert_help::ask_nifi_expert_descriptor(), Arc::new(expert_help::AskNiFiExpert::new(expert_help_limiter)));

    registry.register(flow_document::document_nifi_flow_descriptor(), Arc::new(flow_document::DocumentNiFiFlow));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mw_expert_help::ExpertHelpLimiter;
    use mw_tool_registry::ToolRegistry;

    use super::init;

    #[test]
    fn every_handler_registers_without_a_duplicate_name_panic() {
        let mut registry = ToolRegistry::new();
        init(&mut registry, Arc::new(ExpertHelpLimiter::new()));
        assert_eq!(registry.list(None).len(), 25);
    }
}
