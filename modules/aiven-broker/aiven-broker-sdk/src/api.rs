use crate::error::ServiceBrokerError;
use crate::{
    BindDetails, Binding, DeprovisionDetails, DeprovisionServiceSpec, LastOperation, PollDetails,
    ProvisionDetails, ProvisionedServiceSpec, ServiceOffering, UnbindDetails, UpdateDetails,
    UpdateServiceSpec,
};

// ---------------------------------------------------------------------------
// Service trait
// ---------------------------------------------------------------------------

/// Public API trait for an Open Service Broker (API version 2).
///
/// The HTTP surface of the broker is a thin adapter over this trait: each
/// `/v2/...` endpoint decodes its request, calls exactly one method and encodes
/// the result or the [`ServiceBrokerError`].
#[async_trait::async_trait]
pub trait ServiceBrokerV1: Send + Sync {
    // -- Catalog --

    async fn services(&self) -> Result<Vec<ServiceOffering>, ServiceBrokerError>;

    // -- Instance lifecycle --

    async fn provision(
        &self,
        instance_id: &str,
        details: ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, ServiceBrokerError>;

    async fn deprovision(
        &self,
        instance_id: &str,
        details: DeprovisionDetails,
        async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, ServiceBrokerError>;

    async fn update(
        &self,
        instance_id: &str,
        details: UpdateDetails,
        async_allowed: bool,
    ) -> Result<UpdateServiceSpec, ServiceBrokerError>;

    async fn last_operation(
        &self,
        instance_id: &str,
        details: PollDetails,
    ) -> Result<LastOperation, ServiceBrokerError>;

    // -- Bindings --

    async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: BindDetails,
        async_allowed: bool,
    ) -> Result<Binding, ServiceBrokerError>;

    async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: UnbindDetails,
        async_allowed: bool,
    ) -> Result<(), ServiceBrokerError>;
}
