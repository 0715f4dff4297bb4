//! Response wrapper with assertion helpers for integration tests.

use axum::body::Body;
use http::StatusCode;
use http::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Eagerly-collected HTTP response with sync assertion methods.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Vec<u8>,
}

impl TestResponse {
    /// Consume an `http::Response<Body>`, collecting the body into bytes.
    pub async fn from_response(resp: http::Response<Body>) -> Self {
        let (parts, body) = resp.into_parts();
        let body_bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("failed to collect response body")
            .to_vec();
        Self {
            status: parts.status,
            headers: parts.headers,
            body_bytes,
        }
    }

    // -- Assertions --

    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "expected status {expected}, got {}. Body: {}",
            self.status.as_u16(),
            String::from_utf8_lossy(&self.body_bytes),
        );
        self
    }

    pub fn assert_empty_body(&self) -> &Self {
        assert!(
            self.body_bytes.is_empty(),
            "expected empty body, got: {}",
            String::from_utf8_lossy(&self.body_bytes),
        );
        self
    }

    /// Assert the `description` field of an OSB error body.
    pub fn assert_description(&self, expected: &str) -> &Self {
        let body = self.json();
        assert_eq!(
            body["description"].as_str(),
            Some(expected),
            "unexpected error body: {body}"
        );
        self
    }

    // -- Body parsing --

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body_bytes.clone()).expect("response body is not valid UTF-8")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body_bytes).expect("response body is not valid JSON")
    }

    pub fn parse<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body_bytes).unwrap_or_else(|e| {
            panic!(
                "failed to deserialize response body as {}: {e}\nbody: {}",
                std::any::type_name::<T>(),
                String::from_utf8_lossy(&self.body_bytes),
            )
        })
    }
}
