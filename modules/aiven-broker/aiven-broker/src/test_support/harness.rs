//! Top-level test harness that wires the broker to a [`FakeAivenClient`].

use std::sync::Arc;

use aiven_broker_sdk::api::ServiceBrokerV1;

use crate::config::BrokerConfig;
use crate::domain::naming::build_service_name;
use crate::module::AivenBrokerModule;

use super::api_v2::ApiV2;
use super::fake_client::FakeAivenClient;
use super::fixtures::test_config;

/// Fully-wired broker over a recording fake Aiven client.
pub struct AppHarness {
    module: AivenBrokerModule,
    fake: Arc<FakeAivenClient>,
    router: axum::Router,
}

impl AppHarness {
    pub fn builder() -> AppHarnessBuilder {
        AppHarnessBuilder::default()
    }

    pub fn api_v2(&self) -> ApiV2<'_> {
        ApiV2::new(self)
    }

    pub fn fake(&self) -> &FakeAivenClient {
        &self.fake
    }

    pub fn broker(&self) -> Arc<dyn ServiceBrokerV1> {
        self.module.broker()
    }

    pub fn config(&self) -> &BrokerConfig {
        self.module.config()
    }

    /// Aiven service name the broker derives for `instance_id`.
    pub fn service_name(&self, instance_id: &str) -> String {
        build_service_name(&self.config().service_name_prefix, instance_id)
    }

    pub(crate) fn router(&self) -> &axum::Router {
        &self.router
    }
}

/// Builder for [`AppHarness`].
#[derive(Default)]
pub struct AppHarnessBuilder {
    config: Option<BrokerConfig>,
    fake: Option<Arc<FakeAivenClient>>,
}

impl AppHarnessBuilder {
    /// Replaces the default [`test_config`].
    pub fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses a pre-programmed fake client.
    pub fn with_fake(mut self, fake: Arc<FakeAivenClient>) -> Self {
        self.fake = Some(fake);
        self
    }

    pub fn build(self) -> AppHarness {
        let fake = self.fake.unwrap_or_default();
        let config = self.config.unwrap_or_else(test_config);
        let module = AivenBrokerModule::with_client(config, fake.clone());
        let router = module.router();
        AppHarness {
            module,
            fake,
            router,
        }
    }
}
