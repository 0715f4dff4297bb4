use crate::aiven::AivenClientError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Error: service {service_id} not found in the catalog")]
    ServiceNotFound { service_id: String },

    #[error("Error: plan {plan_id} not found in service {service_id}")]
    PlanNotFound { plan_id: String, service_id: String },

    #[error("This service plan requires client support for asynchronous service operations.")]
    AsyncRequired,

    #[error("{operation} method not implemented")]
    NotImplemented { operation: &'static str },

    #[error("Unknown service type {kind}")]
    UnknownServiceKind { kind: String },

    #[error("{detail}")]
    InvalidParameters { detail: String },

    #[error("instance does not exist")]
    InstanceDoesNotExist,

    #[error(transparent)]
    Backing(#[from] AivenClientError),
}

impl DomainError {
    pub fn invalid_parameters(detail: impl Into<String>) -> Self {
        Self::InvalidParameters {
            detail: detail.into(),
        }
    }

    pub fn not_implemented(operation: &'static str) -> Self {
        Self::NotImplemented { operation }
    }
}
