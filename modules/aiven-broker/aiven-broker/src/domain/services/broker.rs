use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use aiven_broker_sdk::api::ServiceBrokerV1;
use aiven_broker_sdk::error::ServiceBrokerError;
use aiven_broker_sdk::{
    BindDetails, Binding, DeprovisionDetails, DeprovisionServiceSpec, LastOperation, PollDetails,
    ProvisionDetails, ProvisionedServiceSpec, ServiceOffering, UnbindDetails, UpdateDetails,
    UpdateServiceSpec,
};
use tracing::{debug, info, warn};

use crate::config::Catalog;
use crate::domain::error::DomainError;
use crate::domain::provider::AivenProvider;

/// Implements the public `ServiceBrokerV1` trait on top of [`AivenProvider`].
///
/// Each call runs under `call_timeout` and is logged with its instance id.
pub(crate) struct BrokerService {
    provider: Arc<AivenProvider>,
    offerings: Vec<ServiceOffering>,
    call_timeout: Duration,
}

impl BrokerService {
    pub(crate) fn new(provider: Arc<AivenProvider>, catalog: &Catalog, call_timeout: Duration) -> Self {
        Self {
            provider,
            offerings: catalog.services.iter().map(ServiceOffering::from).collect(),
            call_timeout,
        }
    }

    async fn run<T, F>(
        &self,
        operation: &'static str,
        instance_id: &str,
        fut: F,
    ) -> Result<T, ServiceBrokerError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        debug!(operation, instance_id, "broker operation started");
        let result = match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result.map_err(domain_err_to_sdk),
            Err(_) => Err(ServiceBrokerError::Timeout {
                detail: format!("{operation} timed out after {:?}", self.call_timeout),
            }),
        };
        match &result {
            Ok(_) => info!(operation, instance_id, "broker operation succeeded"),
            Err(err) => warn!(operation, instance_id, error = %err, "broker operation failed"),
        }
        result
    }
}

#[async_trait::async_trait]
impl ServiceBrokerV1 for BrokerService {
    async fn services(&self) -> Result<Vec<ServiceOffering>, ServiceBrokerError> {
        Ok(self.offerings.clone())
    }

    async fn provision(
        &self,
        instance_id: &str,
        details: ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, ServiceBrokerError> {
        debug!(
            instance_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            "provision requested"
        );
        self.run(
            "provision",
            instance_id,
            self.provider.provision(instance_id, &details, async_allowed),
        )
        .await
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        details: DeprovisionDetails,
        async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, ServiceBrokerError> {
        if !async_allowed {
            return Err(ServiceBrokerError::AsyncRequired);
        }
        self.run(
            "deprovision",
            instance_id,
            self.provider.deprovision(instance_id, &details),
        )
        .await
    }

    async fn update(
        &self,
        instance_id: &str,
        _details: UpdateDetails,
        async_allowed: bool,
    ) -> Result<UpdateServiceSpec, ServiceBrokerError> {
        if !async_allowed {
            return Err(ServiceBrokerError::AsyncRequired);
        }
        self.provider
            .update(instance_id)
            .map(|()| UpdateServiceSpec::default())
            .map_err(domain_err_to_sdk)
    }

    async fn last_operation(
        &self,
        instance_id: &str,
        _details: PollDetails,
    ) -> Result<LastOperation, ServiceBrokerError> {
        self.run(
            "last_operation",
            instance_id,
            self.provider.last_operation(instance_id),
        )
        .await
    }

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        _details: BindDetails,
        _async_allowed: bool,
    ) -> Result<Binding, ServiceBrokerError> {
        self.provider
            .bind(instance_id, binding_id)
            .map(|credentials| Binding { credentials })
            .map_err(domain_err_to_sdk)
    }

    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        _details: UnbindDetails,
        _async_allowed: bool,
    ) -> Result<(), ServiceBrokerError> {
        self.provider
            .unbind(instance_id, binding_id)
            .map_err(domain_err_to_sdk)
    }
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

fn domain_err_to_sdk(err: DomainError) -> ServiceBrokerError {
    match err {
        DomainError::AsyncRequired => ServiceBrokerError::AsyncRequired,
        DomainError::ServiceNotFound { .. }
        | DomainError::PlanNotFound { .. }
        | DomainError::UnknownServiceKind { .. }
        | DomainError::InvalidParameters { .. } => ServiceBrokerError::BadRequest {
            detail: err.to_string(),
        },
        DomainError::InstanceDoesNotExist => ServiceBrokerError::InstanceDoesNotExist,
        DomainError::NotImplemented { operation } => ServiceBrokerError::NotImplemented {
            operation: operation.to_owned(),
        },
        DomainError::Backing(source) => ServiceBrokerError::Upstream {
            detail: source.to_string(),
        },
    }
}
