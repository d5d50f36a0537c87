//! Batch orchestration for the eight multi-item tools (spec §4.F):
//! `create_nifi_processors`, `create_nifi_ports`, `create_controller_services`,
//! `create_nifi_connections`, `update_nifi_processors_properties`,
//! `update_nifi_connection`, `delete_nifi_objects`, `operate_nifi_objects`.
//!
//! Every item is attempted independently and its outcome captured rather
//! than propagated — one bad item in a batch of fifty never aborts the
//! other forty-nine (grounded on the per-node error-capture shape of a
//! task-orchestration executor: each unit of work is run to completion and
//! its result recorded, failures included, before moving to the next).

mod create;
mod delete;
mod error;
mod item_result;
mod operate;
mod resolve;
mod update;

pub use create::{create_controller_services, create_nifi_connections, create_nifi_ports, create_nifi_processors};
pub use delete::delete_nifi_objects;
pub use error::OrchestratorError;
pub use item_result::BatchItemResult;
pub use operate::operate_nifi_objects;
pub use update::{update_nifi_connection, update_nifi_processors_properties};

#[cfg(test)]
mod tests {
    use super::*;
    use nifi_client::{NiFiClient, NiFiServerConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NiFiClient {
        Mock::given(method("POST"))
            .and(path("/nifi-api/access/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("test-token"))
            .mount(server)
            .await;
        NiFiClient::new(&NiFiServerConfig {
            id: "test".into(),
            display_name: "test".into(),
            base_url: server.uri(),
            username: Some("admin".into()),
            password: Some("password".into()),
            verify_tls: true,
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_before_any_item_is_attempted() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        let result = create_nifi_processors(&client, "root", &[]).await;
        assert!(matches!(result, Err(OrchestratorError::EmptyBatch)));
    }

    #[tokio::test]
    async fn one_failing_item_does_not_abort_the_rest_of_the_batch() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("POST"))
            .and(path("/nifi-api/process-groups/root/processors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p1",
                "revision": { "version": 0 },
                "component": { "name": "ok", "type": "org.apache.nifi.processors.standard.LogAttribute" },
            })))
            .mount(&server)
            .await;

        let items = vec![
            json!({ "type": "org.apache.nifi.processors.standard.LogAttribute", "name": "ok" }),
            json!({ "name": "missing-type" }),
        ];
        let results = create_nifi_processors(&client, "root", &items).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, mw_tool_contracts::ToolOutcome::Success);
        assert_eq!(results[1].status, mw_tool_contracts::ToolOutcome::Error);
        assert_eq!(results[1].request_index, 1);
    }

    #[tokio::test]
    async fn delete_tier_ordering_reorders_but_preserves_request_index() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/nifi-api/process-groups/pg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pg1",
                "revision": { "version": 0 },
                "component": { "name": "group" },
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/nifi-api/process-groups/pg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/nifi-api/connections/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c1",
                "revision": { "version": 0 },
                "component": {},
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/nifi-api/connections/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let items = vec![
            json!({ "object_type": "process_group", "object_id": "pg1" }),
            json!({ "object_type": "connection", "object_id": "c1" }),
        ];
        let results = delete_nifi_objects(&client, &items).await.unwrap();
        // Order of the returned vector matches the caller's request order,
        // even though the connection was deleted first internally.
        assert_eq!(results[0].request_index, 0);
        assert_eq!(results[1].request_index, 1);
        assert!(results.iter().all(|r| r.status == mw_tool_contracts::ToolOutcome::Success));
    }
}
