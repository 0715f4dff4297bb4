use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::aiven::{AivenClient, AivenClientError, CreateServiceIntegrationInput};

const ELIGIBLE_SERVICE_TYPE: &str = "elasticsearch";
const PROMETHEUS_INTEGRATION: &str = "prometheus";
const MAX_INTEGRATIONS_PER_RUN: usize = 5;
/// `tokio::time::interval` rejects a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Outcome of one convergence pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvergeReport {
    /// Services lacking the Prometheus integration, before the per-run cap.
    pub eligible: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Periodically wires Elasticsearch services to a Prometheus integration endpoint.
///
/// At most five integrations are created per pass; the rest are picked up on
/// later ticks.
pub struct MetricsConverger {
    client: Arc<dyn AivenClient>,
    endpoint_id: String,
    interval: Duration,
}

impl MetricsConverger {
    pub fn new(client: Arc<dyn AivenClient>, endpoint_id: impl Into<String>, interval: Duration) -> Self {
        Self {
            client,
            endpoint_id: endpoint_id.into(),
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Runs one pass. Fails only when the service listing cannot be fetched.
    pub async fn converge_once(&self) -> Result<ConvergeReport, AivenClientError> {
        let services = self.client.list_services().await?;
        let pending: Vec<_> = services
            .iter()
            .filter(|s| {
                s.service_type == ELIGIBLE_SERVICE_TYPE && !s.has_integration(PROMETHEUS_INTEGRATION)
            })
            .collect();

        let mut report = ConvergeReport {
            eligible: pending.len(),
            ..ConvergeReport::default()
        };
        for service in pending.into_iter().take(MAX_INTEGRATIONS_PER_RUN) {
            report.attempted += 1;
            let input = CreateServiceIntegrationInput {
                integration_type: PROMETHEUS_INTEGRATION.to_owned(),
                source_service: service.service_name.clone(),
                dest_endpoint_id: self.endpoint_id.clone(),
            };
            match self.client.create_service_integration(&input).await {
                Ok(()) => {
                    report.succeeded += 1;
                    info!(service_name = %service.service_name, "created prometheus integration");
                }
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        service_name = %service.service_name,
                        error = %err,
                        "failed to create prometheus integration"
                    );
                }
            }
        }
        Ok(report)
    }

    /// Runs a pass every interval until `shutdown` is cancelled.
    ///
    /// The first pass happens one interval after start. A failed pass is
    /// logged and the loop keeps going.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(interval = ?self.interval, "metrics converger started");
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    match self.converge_once().await {
                        Ok(report) => debug!(?report, "convergence pass finished"),
                        Err(err) => error!(error = %err, "convergence pass failed"),
                    }
                }
            }
        }
        info!("metrics converger stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{AivenCall, FakeAivenClient, service_summary};

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let fake = Arc::new(FakeAivenClient::new());
        let converger = MetricsConverger::new(fake.clone(), "endpoint", Duration::from_secs(3600));
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        converger.run(shutdown).await;
        assert!(fake.calls().is_empty(), "no pass before the first interval");
    }

    #[tokio::test]
    async fn zero_interval_does_not_panic() {
        let fake = Arc::new(FakeAivenClient::new());
        let converger = MetricsConverger::new(fake.clone(), "endpoint", Duration::ZERO);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        converger.run(shutdown).await;
    }

    #[tokio::test]
    async fn run_converges_on_each_tick() {
        let fake = Arc::new(FakeAivenClient::new());
        fake.set_services(vec![service_summary("env-a", "elasticsearch", &[])]);
        let converger = Arc::new(MetricsConverger::new(
            fake.clone(),
            "endpoint",
            Duration::from_millis(10),
        ));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn({
            let converger = converger.clone();
            let shutdown = shutdown.clone();
            async move { converger.run(shutdown).await }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.cancel();
        handle.await.unwrap();

        assert!(fake.calls().contains(&AivenCall::ListServices));
        assert!(!fake.integrations().is_empty());
    }
}
