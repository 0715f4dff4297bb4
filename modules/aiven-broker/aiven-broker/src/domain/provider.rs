use std::sync::Arc;

use aiven_broker_sdk::{
    Credentials, DeprovisionDetails, DeprovisionServiceSpec, LastOperation, ProvisionDetails,
    ProvisionedServiceSpec,
};
use tracing::debug;

use crate::aiven::{AivenClient, AivenClientError, CreateServiceInput, ServiceTags, UserConfig};
use crate::config::{BrokerConfig, CatalogPlan};

use super::error::DomainError;
use super::model::{ProvisionParameters, ServiceKind, build_ip_filter, find_plan};
use super::naming::build_service_name;
use super::status::translate_status;

/// Translates instance lifecycle calls into Aiven API calls.
///
/// Holds no per-instance state: every call recomputes the Aiven service name
/// from the instance id.
pub struct AivenProvider {
    client: Arc<dyn AivenClient>,
    config: Arc<BrokerConfig>,
}

impl AivenProvider {
    pub fn new(client: Arc<dyn AivenClient>, config: Arc<BrokerConfig>) -> Self {
        Self { client, config }
    }

    pub fn service_name(&self, instance_id: &str) -> String {
        build_service_name(&self.config.service_name_prefix, instance_id)
    }

    pub async fn provision(
        &self,
        instance_id: &str,
        details: &ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, DomainError> {
        if !async_allowed {
            return Err(DomainError::AsyncRequired);
        }

        let (service, plan) = find_plan(&self.config.catalog, &details.service_id, &details.plan_id)?;
        let kind: ServiceKind = service.name.parse()?;
        let params = ProvisionParameters::from_raw(details.parameters.as_ref())?;
        let ip_filter = build_ip_filter(self.config.ip_whitelist.as_deref(), &params.ip_filter)?;

        let input = CreateServiceInput {
            cloud: self.config.aiven.cloud.clone(),
            plan: plan.aiven_plan.clone(),
            service_name: self.service_name(instance_id),
            service_type: kind.as_str().to_owned(),
            user_config: user_config(kind, plan, ip_filter),
            tags: ServiceTags {
                service_id: instance_id.to_owned(),
                plan_id: details.plan_id.clone(),
                organization_id: details.organization_guid.clone(),
                space_id: details.space_guid.clone(),
                broker_name: self.config.broker_name.clone(),
                restored_from_backup: "false".to_owned(),
            },
        };
        debug!(
            instance_id,
            service_name = %input.service_name,
            service_type = %input.service_type,
            plan = %input.plan,
            "creating Aiven service"
        );
        self.client.create_service(&input).await?;

        Ok(ProvisionedServiceSpec {
            is_async: true,
            dashboard_url: None,
            operation_data: None,
        })
    }

    pub async fn deprovision(
        &self,
        instance_id: &str,
        details: &DeprovisionDetails,
    ) -> Result<DeprovisionServiceSpec, DomainError> {
        find_plan(&self.config.catalog, &details.service_id, &details.plan_id)?;
        let service_name = self.service_name(instance_id);
        debug!(instance_id, %service_name, "deleting Aiven service");
        match self.client.delete_service(&service_name).await {
            Ok(_) => Ok(DeprovisionServiceSpec::default()),
            Err(AivenClientError::NotFound { .. }) => Err(DomainError::InstanceDoesNotExist),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn last_operation(&self, instance_id: &str) -> Result<LastOperation, DomainError> {
        let service_name = self.service_name(instance_id);
        let status = self.client.get_service_status(&service_name).await?;
        debug!(instance_id, %service_name, %status, "fetched Aiven service state");
        Ok(translate_status(&status))
    }

    pub fn bind(&self, _instance_id: &str, _binding_id: &str) -> Result<Credentials, DomainError> {
        Err(DomainError::not_implemented("Bind"))
    }

    pub fn unbind(&self, _instance_id: &str, _binding_id: &str) -> Result<(), DomainError> {
        Err(DomainError::not_implemented("Unbind"))
    }

    pub fn update(&self, _instance_id: &str) -> Result<(), DomainError> {
        Err(DomainError::not_implemented("Update"))
    }
}

fn user_config(kind: ServiceKind, plan: &CatalogPlan, ip_filter: Vec<String>) -> UserConfig {
    let mut config = UserConfig {
        ip_filter,
        ..UserConfig::default()
    };
    match kind {
        ServiceKind::Elasticsearch => {
            config.elasticsearch_version = plan.elasticsearch_version.clone();
        }
        ServiceKind::OpenSearch => config.opensearch_version = plan.opensearch_version.clone(),
        ServiceKind::InfluxDb => {}
    }
    config
}
