// === PUBLIC API (from SDK) ===
pub use aiven_broker_sdk::{
    Credentials, LastOperation, LastOperationState, ServiceOffering, api::ServiceBrokerV1,
    error::ServiceBrokerError,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::AivenBrokerModule;

// === BACKING API CLIENT ===
pub mod aiven;

// === METRICS CONVERGER ===
pub use domain::converger::{ConvergeReport, MetricsConverger};

// === BUILDING BLOCKS ===
pub use domain::credentials::build_credentials;
pub use domain::error::DomainError;
pub use domain::naming::build_service_name;
pub use domain::status::translate_status;

// === INTERNAL MODULES ===
#[doc(hidden)]
pub mod api;
pub mod config;
pub(crate) mod domain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;
