use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aiven_broker_sdk::api::ServiceBrokerV1;
use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::aiven::{AivenClient, HttpAivenClient};
use crate::api::rest::routes;
use crate::config::{BasicAuth, BrokerConfig, ConfigError};
use crate::domain::converger::MetricsConverger;
use crate::domain::provider::AivenProvider;
use crate::domain::services::BrokerService;

/// Headroom between the Aiven request timeout and the overall broker call timeout.
const CALL_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Shared application state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) broker: Arc<dyn ServiceBrokerV1>,
    pub(crate) basic_auth: BasicAuth,
}

/// Aiven broker: wires the Aiven client, the broker service and the OSB routes.
pub struct AivenBrokerModule {
    config: Arc<BrokerConfig>,
    client: Arc<dyn AivenClient>,
    broker: Arc<dyn ServiceBrokerV1>,
}

impl AivenBrokerModule {
    /// Builds the module with an HTTP client for the configured Aiven API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BrokerConfig) -> anyhow::Result<Self> {
        let client = HttpAivenClient::new(
            config.aiven.api_url.clone(),
            config.aiven.api_token.clone(),
            config.aiven.project.clone(),
        )?
        .with_request_timeout(config.request_timeout);
        Ok(Self::with_client(config, Arc::new(client)))
    }

    pub fn with_client(config: BrokerConfig, client: Arc<dyn AivenClient>) -> Self {
        let config = Arc::new(config);
        let provider = Arc::new(AivenProvider::new(client.clone(), config.clone()));
        let broker: Arc<dyn ServiceBrokerV1> = Arc::new(BrokerService::new(
            provider,
            &config.catalog,
            config.request_timeout + CALL_TIMEOUT_GRACE,
        ));
        Self {
            config,
            client,
            broker,
        }
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn broker(&self) -> Arc<dyn ServiceBrokerV1> {
        self.broker.clone()
    }

    pub fn router(&self) -> axum::Router {
        routes::router(AppState {
            broker: self.broker.clone(),
            basic_auth: self.config.basic_auth.clone(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if no Prometheus integration endpoint is configured.
    pub fn metrics_converger(&self) -> Result<MetricsConverger, ConfigError> {
        let endpoint_id = self.config.prometheus_endpoint_id()?;
        Ok(MetricsConverger::new(
            self.client.clone(),
            endpoint_id,
            self.config.metrics_interval,
        ))
    }

    /// Serves the OSB API on the configured port until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!(%addr, "Aiven service broker listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .context("broker server failed")?;

        info!("Aiven service broker stopped");
        Ok(())
    }
}
