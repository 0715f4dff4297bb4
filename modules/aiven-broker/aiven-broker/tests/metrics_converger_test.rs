use std::sync::Arc;
use std::time::Duration;

use aiven_broker::test_support::{FakeAivenClient, FakeFailure, FakeOperation, service_summary};
use aiven_broker::{ConvergeReport, MetricsConverger};

const ENDPOINT_ID: &str = "prometheus-endpoint";

fn converger(fake: &Arc<FakeAivenClient>) -> MetricsConverger {
    MetricsConverger::new(fake.clone(), ENDPOINT_ID, Duration::from_secs(120))
}

#[tokio::test]
async fn integrates_at_most_five_services_per_pass() {
    let fake = Arc::new(FakeAivenClient::new());
    fake.set_services(
        (0..8)
            .map(|i| service_summary(&format!("env-{i}"), "elasticsearch", &[]))
            .collect(),
    );

    let report = converger(&fake).converge_once().await.unwrap();

    assert_eq!(
        report,
        ConvergeReport {
            eligible: 8,
            attempted: 5,
            succeeded: 5,
            failed: 0,
        }
    );
    let sources: Vec<String> = fake
        .integrations()
        .into_iter()
        .map(|i| i.source_service)
        .collect();
    assert_eq!(sources, ["env-0", "env-1", "env-2", "env-3", "env-4"]);
}

#[tokio::test]
async fn skips_integrated_and_non_elasticsearch_services() {
    let fake = Arc::new(FakeAivenClient::new());
    fake.set_services(vec![
        service_summary("env-done", "elasticsearch", &["prometheus"]),
        service_summary("env-logs", "elasticsearch", &["logs"]),
        service_summary("env-influx", "influxdb", &[]),
        service_summary("env-os", "opensearch", &[]),
    ]);

    let report = converger(&fake).converge_once().await.unwrap();

    assert_eq!(report.eligible, 1);
    assert_eq!(report.attempted, 1);
    let integrations = fake.integrations();
    assert_eq!(integrations.len(), 1);
    assert_eq!(integrations[0].source_service, "env-logs");
    assert_eq!(integrations[0].integration_type, "prometheus");
    assert_eq!(integrations[0].dest_endpoint_id, ENDPOINT_ID);
}

#[tokio::test]
async fn nothing_to_do_makes_no_integration_calls() {
    let fake = Arc::new(FakeAivenClient::new());
    fake.set_services(vec![service_summary(
        "env-done",
        "elasticsearch",
        &["prometheus"],
    )]);

    let report = converger(&fake).converge_once().await.unwrap();

    assert_eq!(report, ConvergeReport::default());
    assert!(fake.integrations().is_empty());
}

#[tokio::test]
async fn individual_failures_do_not_stop_the_pass() {
    let fake = Arc::new(FakeAivenClient::new());
    fake.set_services(vec![
        service_summary("env-a", "elasticsearch", &[]),
        service_summary("env-b", "elasticsearch", &[]),
        service_summary("env-c", "elasticsearch", &[]),
    ]);
    fake.fail_integration_for("env-b");

    let report = converger(&fake).converge_once().await.unwrap();

    assert_eq!(
        report,
        ConvergeReport {
            eligible: 3,
            attempted: 3,
            succeeded: 2,
            failed: 1,
        }
    );
}

#[tokio::test]
async fn listing_failure_aborts_the_pass() {
    let fake = Arc::new(FakeAivenClient::new());
    fake.fail(
        FakeOperation::ListServices,
        FakeFailure::Status {
            status: 503,
            body: "unavailable".into(),
        },
    );

    let err = converger(&fake).converge_once().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error listing services: 503 status code returned from Aiven: 'unavailable'"
    );
    assert!(fake.integrations().is_empty());
}
