//! Fluent request builder for integration tests.

use axum::body::Body;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::header::HeaderMap;
use http::{HeaderName, HeaderValue, Method, header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use super::harness::AppHarness;
use super::response::TestResponse;

/// Fluent HTTP request builder tied to an [`AppHarness`].
///
/// Requests carry the harness's basic-auth credentials unless
/// [`without_auth`](Self::without_auth) or [`with_basic_auth`](Self::with_basic_auth) is used.
pub struct RequestCase<'a> {
    harness: &'a AppHarness,
    method: Method,
    path: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Body>,
}

impl<'a> RequestCase<'a> {
    pub(crate) fn new(harness: &'a AppHarness, method: Method, path: impl Into<String>) -> Self {
        let auth = &harness.config().basic_auth;
        let case = Self {
            harness,
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        };
        case.with_basic_auth(&auth.username, &auth.password)
    }

    /// Set a JSON request body.
    pub fn with_json(mut self, value: &serde_json::Value) -> Self {
        self.body = Some(Body::from(value.to_string()));
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        self
    }

    /// Add a request header.
    pub fn with_header(
        mut self,
        name: impl Into<HeaderName>,
        value: impl Into<HeaderValue>,
    ) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_basic_auth(self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        let value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .expect("basic auth header is valid");
        self.with_header(header::AUTHORIZATION, value)
    }

    pub fn without_auth(mut self) -> Self {
        self.headers.remove(header::AUTHORIZATION);
        self
    }

    /// Add a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Shorthand for `accepts_incomplete=true`.
    pub fn accepts_incomplete(self) -> Self {
        self.with_query("accepts_incomplete", "true")
    }

    /// Send the request and return the collected response.
    pub async fn send(self) -> TestResponse {
        let uri = if self.query.is_empty() {
            self.path
        } else {
            let qs: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{}?{}", self.path, qs.join("&"))
        };

        let mut builder = http::Request::builder().method(self.method).uri(&uri);

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let body = self.body.unwrap_or_else(Body::empty);
        let request = builder.body(body).expect("failed to build request");

        let router = self.harness.router().clone();
        let response = router
            .oneshot(request)
            .await
            .expect("router returned error");

        TestResponse::from_response(response).await
    }

    /// Send and assert the expected status code, returning the response for
    /// further assertions.
    pub async fn expect_status(self, status: u16) -> TestResponse {
        let resp = self.send().await;
        resp.assert_status(status);
        resp
    }

    /// Send, assert 200 OK, and deserialize the body.
    pub async fn expect_ok<T: DeserializeOwned>(self) -> T {
        let resp = self.send().await;
        resp.assert_status(200);
        resp.parse()
    }
}
