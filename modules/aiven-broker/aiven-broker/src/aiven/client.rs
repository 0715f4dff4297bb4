use std::time::Duration;

use http::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::AivenClientError;
use super::model::{
    CreateServiceInput, CreateServiceIntegrationInput, GetServiceResponse, ListServicesResponse,
    ServiceStatus, ServiceSummary,
};
use super::AivenClient;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const OP_CREATE_SERVICE: &str = "creating service";
const OP_GET_SERVICE: &str = "getting service";
const OP_DELETE_SERVICE: &str = "deleting service";
const OP_LIST_SERVICES: &str = "listing services";
const OP_CREATE_INTEGRATION: &str = "creating service integration";

const NO_BODY: Option<&()> = None;

/// [`AivenClient`] over the Aiven REST API (`/v1beta`).
pub struct HttpAivenClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: String,
    project: String,
    request_timeout: Duration,
}

impl HttpAivenClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self, AivenClientError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|source| AivenClientError::Transport {
                operation: "building HTTP client",
                source,
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_token: api_token.into(),
            project: project.into(),
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn project_url(&self, suffix: &str) -> String {
        format!(
            "{}/v1beta/project/{}/{suffix}",
            self.base_url,
            urlencoding::encode(&self.project)
        )
    }

    fn service_url(&self, service_name: &str) -> String {
        self.project_url(&format!("service/{}", urlencoding::encode(service_name)))
    }

    async fn send<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<(StatusCode, String), AivenClientError> {
        debug!(%method, %url, operation, "calling Aiven API");

        let mut request = self
            .http_client
            .request(method, &url)
            .timeout(self.request_timeout)
            .header(header::AUTHORIZATION, format!("aivenv1 {}", self.api_token));
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport = |source| AivenClientError::Transport { operation, source };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        Ok((status, text))
    }

    async fn send_expect_ok<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<String, AivenClientError> {
        let (status, text) = self.send(operation, method, url, body).await?;
        match status {
            StatusCode::OK => Ok(text),
            StatusCode::NOT_FOUND if matches!(operation, OP_GET_SERVICE | OP_DELETE_SERVICE) => {
                warn!(operation, "Aiven reported the service as missing");
                Err(AivenClientError::NotFound { operation })
            }
            _ => {
                warn!(operation, status = status.as_u16(), "unexpected status from Aiven");
                Err(AivenClientError::UnexpectedStatus {
                    operation,
                    status: status.as_u16(),
                    body: text,
                })
            }
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, text: &str) -> Result<T, AivenClientError> {
    serde_json::from_str(text).map_err(|source| AivenClientError::Decode { operation, source })
}

#[async_trait::async_trait]
impl AivenClient for HttpAivenClient {
    async fn create_service(&self, input: &CreateServiceInput) -> Result<String, AivenClientError> {
        self.send_expect_ok(
            OP_CREATE_SERVICE,
            Method::POST,
            self.project_url("service"),
            Some(input),
        )
        .await
    }

    async fn get_service_status(
        &self,
        service_name: &str,
    ) -> Result<ServiceStatus, AivenClientError> {
        let text = self
            .send_expect_ok(
                OP_GET_SERVICE,
                Method::GET,
                self.service_url(service_name),
                NO_BODY,
            )
            .await?;
        let response: GetServiceResponse = decode(OP_GET_SERVICE, &text)?;
        response
            .service
            .state
            .filter(|state| !state.is_empty())
            .map(ServiceStatus::from)
            .ok_or(AivenClientError::MissingField {
                operation: OP_GET_SERVICE,
                field: "state",
            })
    }

    async fn delete_service(&self, service_name: &str) -> Result<String, AivenClientError> {
        self.send_expect_ok(
            OP_DELETE_SERVICE,
            Method::DELETE,
            self.service_url(service_name),
            NO_BODY,
        )
        .await
    }

    async fn list_services(&self) -> Result<Vec<ServiceSummary>, AivenClientError> {
        let text = self
            .send_expect_ok(
                OP_LIST_SERVICES,
                Method::GET,
                self.project_url("service"),
                NO_BODY,
            )
            .await?;
        let response: ListServicesResponse = decode(OP_LIST_SERVICES, &text)?;
        Ok(response.services)
    }

    async fn create_service_integration(
        &self,
        input: &CreateServiceIntegrationInput,
    ) -> Result<(), AivenClientError> {
        self.send_expect_ok(
            OP_CREATE_INTEGRATION,
            Method::POST,
            self.project_url("integration"),
            Some(input),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_scoped_to_the_project() {
        let client = HttpAivenClient::new("https://api.example.test/", "token", "my project").unwrap();
        assert_eq!(
            client.project_url("service"),
            "https://api.example.test/v1beta/project/my%20project/service"
        );
        assert_eq!(
            client.service_url("env-0a1b2c3d"),
            "https://api.example.test/v1beta/project/my%20project/service/env-0a1b2c3d"
        );
        assert_eq!(
            client.project_url("integration"),
            "https://api.example.test/v1beta/project/my%20project/integration"
        );
    }

    #[test]
    fn unexpected_status_message_carries_code_and_body() {
        let err = AivenClientError::UnexpectedStatus {
            operation: OP_CREATE_SERVICE,
            status: 403,
            body: "{\"message\":\"forbidden\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error creating service: 403 status code returned from Aiven: '{\"message\":\"forbidden\"}'"
        );
    }
}
