//! Test utilities for broker integration tests.

pub mod api_v2;
pub mod fake_client;
pub mod fixtures;
pub mod harness;
pub mod request;
pub mod response;

pub use api_v2::ApiV2;
pub use fake_client::{AivenCall, FakeAivenClient, FakeFailure, FakeOperation};
pub use fixtures::{
    ELASTICSEARCH_PLAN_ID, ELASTICSEARCH_SERVICE_ID, EMPTY_SERVICE_ID, INFLUXDB_PLAN_ID,
    INFLUXDB_SERVICE_ID, OPENSEARCH_PLAN_ID, OPENSEARCH_SERVICE_ID, TEST_BROKER_NAME, TEST_CLOUD,
    TEST_PASSWORD, TEST_PREFIX, TEST_USERNAME, UNKNOWN_KIND_PLAN_ID, UNKNOWN_KIND_SERVICE_ID,
    service_summary, test_config,
};
pub use harness::{AppHarness, AppHarnessBuilder};
pub use request::RequestCase;
pub use response::TestResponse;
