use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::config::{Catalog, CatalogPlan, CatalogService};

use super::error::DomainError;

// ---------------------------------------------------------------------------
// Service kind
// ---------------------------------------------------------------------------

/// Aiven service types the broker knows how to provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Elasticsearch,
    OpenSearch,
    InfluxDb,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::OpenSearch => "opensearch",
            Self::InfluxDb => "influxdb",
        }
    }
}

impl FromStr for ServiceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "elasticsearch" => Ok(Self::Elasticsearch),
            "opensearch" => Ok(Self::OpenSearch),
            "influxdb" => Ok(Self::InfluxDb),
            other => Err(DomainError::UnknownServiceKind {
                kind: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Catalog lookup
// ---------------------------------------------------------------------------

pub fn find_plan<'a>(
    catalog: &'a Catalog,
    service_id: &str,
    plan_id: &str,
) -> Result<(&'a CatalogService, &'a CatalogPlan), DomainError> {
    let service = catalog
        .services
        .iter()
        .find(|s| s.id == service_id)
        .ok_or_else(|| DomainError::ServiceNotFound {
            service_id: service_id.to_owned(),
        })?;
    let plan = service
        .plans
        .iter()
        .find(|p| p.id == plan_id)
        .ok_or_else(|| DomainError::PlanNotFound {
            plan_id: plan_id.to_owned(),
            service_id: service.id.clone(),
        })?;
    Ok((service, plan))
}

// ---------------------------------------------------------------------------
// Provision parameters
// ---------------------------------------------------------------------------

/// Parameters a platform user may pass when creating an instance.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvisionParameters {
    /// Comma-separated IPv4 addresses allowed to reach the service.
    #[serde(default)]
    pub ip_filter: String,
}

impl ProvisionParameters {
    pub fn from_raw(raw: Option<&Value>) -> Result<Self, DomainError> {
        match raw {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => Self::deserialize(value).map_err(|e| {
                DomainError::invalid_parameters(format!("invalid provision parameters: {e}"))
            }),
        }
    }
}

/// Merges the operator whitelist with user-supplied addresses into one filter list.
///
/// An empty source contributes nothing; within a non-empty source every entry,
/// including empty ones between commas, must be a dotted quad. An empty result
/// leaves the service open to Aiven's default filter.
pub fn build_ip_filter(whitelist: Option<&str>, requested: &str) -> Result<Vec<String>, DomainError> {
    let mut filter = Vec::new();
    for source in [whitelist.unwrap_or_default(), requested] {
        if source.is_empty() {
            continue;
        }
        for entry in source.split(',').map(str::trim) {
            if entry.split('.').count() != 4 {
                return Err(DomainError::invalid_parameters(format!(
                    "malformed whitelist IP: {entry}"
                )));
            }
            if !filter.iter().any(|known| known == entry) {
                filter.push(entry.to_owned());
            }
        }
    }
    Ok(filter)
}
