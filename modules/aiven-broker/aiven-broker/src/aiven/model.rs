use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Service creation
// ---------------------------------------------------------------------------

/// Body of `POST /v1beta/project/{project}/service`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateServiceInput {
    pub cloud: String,
    pub plan: String,
    pub service_name: String,
    pub service_type: String,
    pub user_config: UserConfig,
    pub tags: ServiceTags,
}

/// Kind-specific service settings. Empty fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ip_filter: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elasticsearch_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opensearch_version: Option<String>,
}

/// Tags recorded on each created service to trace it back to its platform instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTags {
    pub service_id: String,
    pub plan_id: String,
    pub organization_id: String,
    pub space_id: String,
    pub broker_name: String,
    pub restored_from_backup: String,
}

// ---------------------------------------------------------------------------
// Service state
// ---------------------------------------------------------------------------

/// Lifecycle state reported by Aiven for a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    Rebuilding,
    Rebalancing,
    PowerOff,
    Other(String),
}

impl ServiceStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "RUNNING",
            Self::Rebuilding => "REBUILDING",
            Self::Rebalancing => "REBALANCING",
            Self::PowerOff => "POWEROFF",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ServiceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "RUNNING" => Self::Running,
            "REBUILDING" => Self::Rebuilding,
            "REBALANCING" => Self::Rebalancing,
            "POWEROFF" => Self::PowerOff,
            _ => Self::Other(raw),
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Listing and integrations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceSummary {
    pub service_name: String,
    pub service_type: String,
    #[serde(default)]
    pub service_integrations: Vec<ServiceIntegration>,
}

impl ServiceSummary {
    #[must_use]
    pub fn has_integration(&self, integration_type: &str) -> bool {
        self.service_integrations
            .iter()
            .any(|i| i.integration_type == integration_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceIntegration {
    pub integration_type: String,
}

/// Body of `POST /v1beta/project/{project}/integration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateServiceIntegrationInput {
    pub integration_type: String,
    pub source_service: String,
    pub dest_endpoint_id: String,
}

// -- Response envelopes --

#[derive(Deserialize)]
pub(super) struct GetServiceResponse {
    pub service: RawService,
}

#[derive(Deserialize)]
pub(super) struct RawService {
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ListServicesResponse {
    #[serde(default)]
    pub services: Vec<ServiceSummary>,
}
