use aiven_broker_sdk::ServiceOffering;
use serde::{Deserialize, Serialize};

// -- Query parameters --

#[derive(Debug, Default, Deserialize)]
pub struct AsyncQuery {
    #[serde(default)]
    pub accepts_incomplete: bool,
}

/// Deprovision and unbind carry the catalog ids in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub accepts_incomplete: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct LastOperationQuery {
    pub service_id: Option<String>,
    pub plan_id: Option<String>,
    pub operation: Option<String>,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub services: Vec<ServiceOffering>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProvisionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// Body of deprovision and update responses; `{}` when no operation token is issued.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OperationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmptyResponse {}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub description: String,
}
