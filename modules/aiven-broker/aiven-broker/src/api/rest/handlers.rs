use aiven_broker_sdk::{
    BindDetails, DeprovisionDetails, PollDetails, ProvisionDetails, UnbindDetails, UpdateDetails,
};
use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::response::IntoResponse;
use http::StatusCode;

use crate::api::rest::dto::{
    AsyncQuery, CatalogResponse, DeleteQuery, EmptyResponse, LastOperationQuery,
    OperationResponse, ProvisionResponse,
};
use crate::api::rest::error::BrokerApiError;
use crate::module::AppState;

fn accepted_or(is_async: bool, sync_status: StatusCode) -> StatusCode {
    if is_async {
        StatusCode::ACCEPTED
    } else {
        sync_status
    }
}

pub async fn healthcheck() -> StatusCode {
    StatusCode::OK
}

pub async fn catalog(
    Extension(state): Extension<AppState>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let services = state.broker.services().await?;
    Ok(Json(CatalogResponse { services }))
}

pub async fn provision(
    Extension(state): Extension<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    Json(details): Json<ProvisionDetails>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let spec = state
        .broker
        .provision(&instance_id, details, query.accepts_incomplete)
        .await?;
    let body = ProvisionResponse {
        dashboard_url: spec.dashboard_url,
        operation: spec.operation_data,
    };
    Ok((accepted_or(spec.is_async, StatusCode::CREATED), Json(body)))
}

pub async fn deprovision(
    Extension(state): Extension<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let details = DeprovisionDetails {
        service_id: query.service_id,
        plan_id: query.plan_id,
    };
    let spec = state
        .broker
        .deprovision(&instance_id, details, query.accepts_incomplete)
        .await?;
    let body = OperationResponse {
        operation: spec.operation_data,
    };
    Ok((accepted_or(spec.is_async, StatusCode::OK), Json(body)))
}

pub async fn update(
    Extension(state): Extension<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    Json(details): Json<UpdateDetails>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let spec = state
        .broker
        .update(&instance_id, details, query.accepts_incomplete)
        .await?;
    let body = OperationResponse {
        operation: spec.operation_data,
    };
    Ok((accepted_or(spec.is_async, StatusCode::OK), Json(body)))
}

pub async fn last_operation(
    Extension(state): Extension<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<LastOperationQuery>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let details = PollDetails {
        service_id: query.service_id,
        plan_id: query.plan_id,
        operation: query.operation,
    };
    let operation = state.broker.last_operation(&instance_id, details).await?;
    Ok(Json(operation))
}

pub async fn bind(
    Extension(state): Extension<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(query): Query<AsyncQuery>,
    Json(details): Json<BindDetails>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let binding = state
        .broker
        .bind(&instance_id, &binding_id, details, query.accepts_incomplete)
        .await?;
    Ok((StatusCode::CREATED, Json(binding)))
}

pub async fn unbind(
    Extension(state): Extension<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<impl IntoResponse, BrokerApiError> {
    let details = UnbindDetails {
        service_id: query.service_id,
        plan_id: query.plan_id,
    };
    state
        .broker
        .unbind(&instance_id, &binding_id, details, query.accepts_incomplete)
        .await?;
    Ok(Json(EmptyResponse {}))
}
