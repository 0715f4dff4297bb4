use aiven_broker_sdk::ServiceBrokerError;
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use super::dto::{EmptyResponse, ErrorResponse};

/// [`ServiceBrokerError`] rendered as an Open Service Broker error response.
#[derive(Debug)]
pub struct BrokerApiError(pub ServiceBrokerError);

impl From<ServiceBrokerError> for BrokerApiError {
    fn from(err: ServiceBrokerError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_for(err: &ServiceBrokerError) -> StatusCode {
    match err {
        ServiceBrokerError::AsyncRequired => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceBrokerError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        ServiceBrokerError::InstanceDoesNotExist => StatusCode::GONE,
        ServiceBrokerError::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
        ServiceBrokerError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ServiceBrokerError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

impl IntoResponse for BrokerApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if matches!(self.0, ServiceBrokerError::InstanceDoesNotExist) {
            return (status, Json(EmptyResponse {})).into_response();
        }
        let body = ErrorResponse {
            error: self.0.error_code().map(str::to_owned),
            description: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ServiceBrokerError) -> (StatusCode, serde_json::Value) {
        let response = BrokerApiError(err).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn async_required_is_unprocessable_with_error_code() {
        let (status, body) = render(ServiceBrokerError::AsyncRequired).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "AsyncRequired");
        assert!(body["description"].as_str().unwrap().contains("asynchronous"));
    }

    #[tokio::test]
    async fn gone_has_empty_body() {
        let (status, body) = render(ServiceBrokerError::InstanceDoesNotExist).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body, serde_json::json!({}));
    }

    #[tokio::test]
    async fn upstream_error_keeps_message() {
        let (status, body) = render(ServiceBrokerError::Upstream {
            detail: "Error getting service: no state found in response JSON".into(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("error").is_none());
        assert_eq!(
            body["description"],
            "Error getting service: no state found in response JSON"
        );
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_for(&ServiceBrokerError::BadRequest {
                detail: String::new()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ServiceBrokerError::NotImplemented {
                operation: "Bind".into()
            }),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            status_for(&ServiceBrokerError::Timeout {
                detail: String::new()
            }),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
