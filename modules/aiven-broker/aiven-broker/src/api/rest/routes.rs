use axum::Router;
use axum::extract::Extension;
use axum::middleware;
use axum::routing::{get, put};

use super::auth::require_basic_auth;
use super::handlers;
use crate::module::AppState;

/// Builds the broker router.
///
/// Everything under `/v2` requires basic auth; `/healthcheck` is open.
pub fn router(state: AppState) -> Router {
    let v2 = Router::new()
        .route("/v2/catalog", get(handlers::catalog))
        .route(
            "/v2/service_instances/{instance_id}",
            put(handlers::provision)
                .patch(handlers::update)
                .delete(handlers::deprovision),
        )
        .route(
            "/v2/service_instances/{instance_id}/last_operation",
            get(handlers::last_operation),
        )
        .route(
            "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
            put(handlers::bind).delete(handlers::unbind),
        )
        .route_layer(middleware::from_fn_with_state(
            state.basic_auth.clone(),
            require_basic_auth,
        ));

    Router::new()
        .route("/healthcheck", get(handlers::healthcheck))
        .merge(v2)
        .layer(Extension(state))
}
