//! Canned configuration shared by unit and integration tests.

use std::time::Duration;

use crate::aiven::{ServiceIntegration, ServiceSummary};
use crate::config::{
    AivenConfig, BasicAuth, BrokerConfig, Catalog, CatalogPlan, CatalogService, LogLevel,
};

pub const TEST_PREFIX: &str = "env";
pub const TEST_BROKER_NAME: &str = "aiven-broker-test";
pub const TEST_CLOUD: &str = "aws-eu-west-1";
pub const TEST_USERNAME: &str = "broker-user";
pub const TEST_PASSWORD: &str = "broker-pass";

pub const ELASTICSEARCH_SERVICE_ID: &str = "elasticsearch-service-id";
pub const ELASTICSEARCH_PLAN_ID: &str = "elasticsearch-plan-id";
pub const OPENSEARCH_SERVICE_ID: &str = "opensearch-service-id";
pub const OPENSEARCH_PLAN_ID: &str = "opensearch-plan-id";
pub const INFLUXDB_SERVICE_ID: &str = "influxdb-service-id";
pub const INFLUXDB_PLAN_ID: &str = "influxdb-plan-id";
/// A service declared without plans.
pub const EMPTY_SERVICE_ID: &str = "empty-service-id";
/// A service whose name is not an Aiven kind the broker supports.
pub const UNKNOWN_KIND_SERVICE_ID: &str = "mysql-service-id";
pub const UNKNOWN_KIND_PLAN_ID: &str = "mysql-plan-id";

fn plan(id: &str, aiven_plan: &str) -> CatalogPlan {
    CatalogPlan {
        id: id.to_owned(),
        name: format!("{id}-name"),
        description: format!("{id} description"),
        free: Some(false),
        aiven_plan: aiven_plan.to_owned(),
        elasticsearch_version: None,
        opensearch_version: None,
    }
}

fn service(id: &str, name: &str, plans: Vec<CatalogPlan>) -> CatalogService {
    CatalogService {
        id: id.to_owned(),
        name: name.to_owned(),
        description: format!("{name} service"),
        bindable: true,
        plan_updateable: false,
        tags: vec![name.to_owned()],
        plans,
    }
}

/// Broker configuration with one service per supported kind plus two malformed entries.
///
/// Built directly rather than through [`BrokerConfig::load`] so that catalog
/// validation does not reject the malformed entries.
pub fn test_config() -> BrokerConfig {
    let mut elasticsearch = plan(ELASTICSEARCH_PLAN_ID, "startup-4");
    elasticsearch.elasticsearch_version = Some("7".to_owned());
    let mut opensearch = plan(OPENSEARCH_PLAN_ID, "startup-4");
    opensearch.opensearch_version = Some("2".to_owned());

    BrokerConfig {
        broker_name: TEST_BROKER_NAME.to_owned(),
        basic_auth: BasicAuth {
            username: TEST_USERNAME.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        },
        port: 0,
        log_level: LogLevel::Debug,
        catalog: Catalog {
            services: vec![
                service(ELASTICSEARCH_SERVICE_ID, "elasticsearch", vec![elasticsearch]),
                service(OPENSEARCH_SERVICE_ID, "opensearch", vec![opensearch]),
                service(
                    INFLUXDB_SERVICE_ID,
                    "influxdb",
                    vec![plan(INFLUXDB_PLAN_ID, "startup-4")],
                ),
                service(EMPTY_SERVICE_ID, "opensearch", Vec::new()),
                service(
                    UNKNOWN_KIND_SERVICE_ID,
                    "mysql",
                    vec![plan(UNKNOWN_KIND_PLAN_ID, "hobbyist")],
                ),
            ],
        },
        aiven: AivenConfig {
            api_url: "http://aiven.invalid".to_owned(),
            api_token: "test-token".to_owned(),
            project: "test-project".to_owned(),
            cloud: TEST_CLOUD.to_owned(),
        },
        service_name_prefix: TEST_PREFIX.to_owned(),
        ip_whitelist: None,
        request_timeout: Duration::from_secs(5),
        metrics_interval: Duration::from_secs(120),
        prometheus_integration_endpoint_id: Some("prometheus-endpoint".to_owned()),
    }
}

pub fn service_summary(name: &str, service_type: &str, integrations: &[&str]) -> ServiceSummary {
    ServiceSummary {
        service_name: name.to_owned(),
        service_type: service_type.to_owned(),
        service_integrations: integrations
            .iter()
            .map(|t| ServiceIntegration {
                integration_type: (*t).to_owned(),
            })
            .collect(),
    }
}
