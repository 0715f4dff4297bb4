use std::time::Duration;

use aiven_broker::aiven::{
    AivenClient, AivenClientError, CreateServiceInput, CreateServiceIntegrationInput,
    HttpAivenClient, ServiceStatus, ServiceTags, UserConfig,
};
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "test-token";
const PROJECT: &str = "test-project";

fn client_for(server: &MockServer) -> HttpAivenClient {
    HttpAivenClient::new(server.base_url(), TOKEN, PROJECT)
        .unwrap()
        .with_request_timeout(Duration::from_secs(5))
}

fn create_input() -> CreateServiceInput {
    CreateServiceInput {
        cloud: "aws-eu-west-1".into(),
        plan: "startup-4".into(),
        service_name: "env-cbf43926".into(),
        service_type: "opensearch".into(),
        user_config: UserConfig {
            ip_filter: vec!["1.2.3.4".into()],
            elasticsearch_version: None,
            opensearch_version: Some("2".into()),
        },
        tags: ServiceTags {
            service_id: "123456789".into(),
            plan_id: "plan".into(),
            organization_id: "org".into(),
            space_id: "space".into(),
            broker_name: "broker".into(),
            restored_from_backup: "false".into(),
        },
    }
}

// -- Create --

#[tokio::test]
async fn create_service_posts_body_with_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/project/test-project/service")
                .header("authorization", "aivenv1 test-token")
                .json_body(json!({
                    "cloud": "aws-eu-west-1",
                    "plan": "startup-4",
                    "service_name": "env-cbf43926",
                    "service_type": "opensearch",
                    "user_config": {
                        "ip_filter": ["1.2.3.4"],
                        "opensearch_version": "2"
                    },
                    "tags": {
                        "service_id": "123456789",
                        "plan_id": "plan",
                        "organization_id": "org",
                        "space_id": "space",
                        "broker_name": "broker",
                        "restored_from_backup": "false"
                    }
                }));
            then.status(200).body(r#"{"service":{"state":"REBUILDING"}}"#);
        })
        .await;

    let body = client_for(&server).create_service(&create_input()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(body, r#"{"service":{"state":"REBUILDING"}}"#);
}

#[tokio::test]
async fn create_service_rejects_non_ok_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/project/test-project/service");
            then.status(201).body("created elsewhere");
        })
        .await;

    let err = client_for(&server)
        .create_service(&create_input())
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        AivenClientError::UnexpectedStatus { status: 201, body, .. } if body == "created elsewhere"
    ));
    assert_eq!(
        err.to_string(),
        "Error creating service: 201 status code returned from Aiven: 'created elsewhere'"
    );
}

// -- Status --

#[tokio::test]
async fn get_service_status_reads_state() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1beta/project/test-project/service/env-cbf43926")
                .header("authorization", "aivenv1 test-token");
            then.status(200)
                .json_body(json!({ "service": { "service_name": "env-cbf43926", "state": "RUNNING" } }));
        })
        .await;

    let status = client_for(&server)
        .get_service_status("env-cbf43926")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(status, ServiceStatus::Running);
}

#[tokio::test]
async fn get_service_status_keeps_unknown_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1beta/project/test-project/service/env-1");
            then.status(200)
                .json_body(json!({ "service": { "state": "REBOOTING" } }));
        })
        .await;

    let status = client_for(&server).get_service_status("env-1").await.unwrap();
    assert_eq!(status, ServiceStatus::Other("REBOOTING".into()));
}

#[tokio::test]
async fn get_service_status_without_state_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1beta/project/test-project/service/env-1");
            then.status(200).json_body(json!({ "service": {} }));
        })
        .await;

    let err = client_for(&server)
        .get_service_status("env-1")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error getting service: no state found in response JSON"
    );
}

#[tokio::test]
async fn get_service_status_of_missing_service_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1beta/project/test-project/service/env-1");
            then.status(404).json_body(json!({ "message": "Service not found" }));
        })
        .await;

    let err = client_for(&server)
        .get_service_status("env-1")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// -- Delete --

#[tokio::test]
async fn delete_service_targets_the_named_service() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/v1beta/project/test-project/service/env-1")
                .header("authorization", "aivenv1 test-token");
            then.status(200).body(r#"{"message":"deleted"}"#);
        })
        .await;

    let body = client_for(&server).delete_service("env-1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(body, r#"{"message":"deleted"}"#);
}

#[tokio::test]
async fn delete_missing_service_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1beta/project/test-project/service/env-1");
            then.status(404).body("{}");
        })
        .await;

    let err = client_for(&server).delete_service("env-1").await.unwrap_err();
    assert!(matches!(
        err,
        AivenClientError::NotFound {
            operation: "deleting service"
        }
    ));
}

#[tokio::test]
async fn delete_service_failure_keeps_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/v1beta/project/test-project/service/env-1");
            then.status(500).body("boom");
        })
        .await;

    let err = client_for(&server).delete_service("env-1").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error deleting service: 500 status code returned from Aiven: 'boom'"
    );
}

// -- Listing and integrations --

#[tokio::test]
async fn list_services_parses_integrations() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1beta/project/test-project/service")
                .header("authorization", "aivenv1 test-token");
            then.status(200).json_body(json!({
                "services": [
                    {
                        "service_name": "env-1",
                        "service_type": "elasticsearch",
                        "state": "RUNNING",
                        "service_integrations": [{ "integration_type": "prometheus" }]
                    },
                    { "service_name": "env-2", "service_type": "influxdb" }
                ]
            }));
        })
        .await;

    let services = client_for(&server).list_services().await.unwrap();

    assert_eq!(services.len(), 2);
    assert!(services[0].has_integration("prometheus"));
    assert_eq!(services[1].service_type, "influxdb");
    assert!(services[1].service_integrations.is_empty());
}

#[tokio::test]
async fn create_service_integration_posts_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/project/test-project/integration")
                .header("authorization", "aivenv1 test-token")
                .json_body(json!({
                    "integration_type": "prometheus",
                    "source_service": "env-1",
                    "dest_endpoint_id": "endpoint-1"
                }));
            then.status(200).json_body(json!({ "service_integration": {} }));
        })
        .await;

    client_for(&server)
        .create_service_integration(&CreateServiceIntegrationInput {
            integration_type: "prometheus".into(),
            source_service: "env-1".into(),
            dest_endpoint_id: "endpoint-1".into(),
        })
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn create_service_integration_404_keeps_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1beta/project/test-project/integration");
            then.status(404).body("endpoint not found");
        })
        .await;

    let err = client_for(&server)
        .create_service_integration(&CreateServiceIntegrationInput {
            integration_type: "prometheus".into(),
            source_service: "env-1".into(),
            dest_endpoint_id: "missing-endpoint".into(),
        })
        .await
        .unwrap_err();
    assert!(!err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Error creating service integration: 404 status code returned from Aiven: 'endpoint not found'"
    );
}

// -- Transport --

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    let client = HttpAivenClient::new("http://127.0.0.1:1", TOKEN, PROJECT).unwrap();

    let err = client.list_services().await.unwrap_err();
    assert!(matches!(
        err,
        AivenClientError::Transport {
            operation: "listing services",
            ..
        }
    ));
}
