//! OSB v2 namespace with endpoint factory methods.

use http::Method;

use super::harness::AppHarness;
use super::request::RequestCase;

/// Endpoint factory for the `/v2/` API surface.
pub struct ApiV2<'a> {
    harness: &'a AppHarness,
}

impl<'a> ApiV2<'a> {
    pub(crate) fn new(harness: &'a AppHarness) -> Self {
        Self { harness }
    }

    pub fn healthcheck(&self) -> RequestCase<'a> {
        RequestCase::new(self.harness, Method::GET, "/healthcheck").without_auth()
    }

    pub fn catalog(&self) -> RequestCase<'a> {
        RequestCase::new(self.harness, Method::GET, "/v2/catalog")
    }

    // -- Service instances --

    pub fn provision(&self, instance_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::PUT,
            format!("/v2/service_instances/{instance_id}"),
        )
    }

    pub fn update(&self, instance_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::PATCH,
            format!("/v2/service_instances/{instance_id}"),
        )
    }

    pub fn deprovision(&self, instance_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::DELETE,
            format!("/v2/service_instances/{instance_id}"),
        )
    }

    pub fn last_operation(&self, instance_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::GET,
            format!("/v2/service_instances/{instance_id}/last_operation"),
        )
    }

    // -- Bindings --

    pub fn bind(&self, instance_id: &str, binding_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::PUT,
            format!("/v2/service_instances/{instance_id}/service_bindings/{binding_id}"),
        )
    }

    pub fn unbind(&self, instance_id: &str, binding_id: &str) -> RequestCase<'a> {
        RequestCase::new(
            self.harness,
            Method::DELETE,
            format!("/v2/service_instances/{instance_id}/service_bindings/{binding_id}"),
        )
    }
}
