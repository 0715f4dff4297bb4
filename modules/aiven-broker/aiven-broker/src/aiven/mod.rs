//! Typed client for the subset of the Aiven REST API the broker relies on.

mod client;
mod error;
mod model;

pub use client::HttpAivenClient;
pub use error::AivenClientError;
pub use model::{
    CreateServiceInput, CreateServiceIntegrationInput, ServiceIntegration, ServiceStatus,
    ServiceSummary, ServiceTags, UserConfig,
};

/// Operations the broker performs against the Aiven API.
///
/// Implemented over HTTP by [`HttpAivenClient`]; tests substitute a recording fake.
#[async_trait::async_trait]
pub trait AivenClient: Send + Sync {
    /// Creates a service. Returns the raw response body on success.
    async fn create_service(&self, input: &CreateServiceInput) -> Result<String, AivenClientError>;

    async fn get_service_status(&self, service_name: &str)
    -> Result<ServiceStatus, AivenClientError>;

    /// Deletes a service. Returns the raw response body on success.
    async fn delete_service(&self, service_name: &str) -> Result<String, AivenClientError>;

    async fn list_services(&self) -> Result<Vec<ServiceSummary>, AivenClientError>;

    async fn create_service_integration(
        &self,
        input: &CreateServiceIntegrationInput,
    ) -> Result<(), AivenClientError>;
}
