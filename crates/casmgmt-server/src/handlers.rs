use axum::{
    extract::{rejection::QueryRejection, Form, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use casmgmt_core::{RegisteredService, RegistryError, ServiceId};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::response::{ApiError, OperationResult};
use crate::view::ManageView;
use crate::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServiceIdParams {
    /// Id of the registered service.
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EvaluationOrderParams {
    /// Id of the registered service.
    pub id: Option<String>,
    /// New evaluation order. The current order is kept when absent.
    pub evaluation_order: Option<String>,
}

/// Request parameters that may arrive in the query string, the form body, or both.
pub trait MergeParams: Sized {
    /// Keeps every field set in `self`, filling the rest from `fallback`.
    fn or(self, fallback: Self) -> Self;
}

impl MergeParams for ServiceIdParams {
    fn or(self, fallback: Self) -> Self {
        Self { id: self.id.or(fallback.id) }
    }
}

impl MergeParams for EvaluationOrderParams {
    fn or(self, fallback: Self) -> Self {
        Self {
            id: self.id.or(fallback.id),
            evaluation_order: self.evaluation_order.or(fallback.evaluation_order),
        }
    }
}

/// Body fields win over query fields. A body that is not url-encoded is ignored.
fn merge_params<P: MergeParams>(
    query: Result<Query<P>, QueryRejection>,
    body: Option<Form<P>>,
) -> Result<P, ApiError> {
    let Query(query) = query.map_err(|rejection| RegistryError::InvalidInput(rejection.body_text()))?;
    Ok(match body {
        Some(Form(body)) => body.or(query),
        None => query,
    })
}

fn parse_id(raw: Option<&str>) -> Result<ServiceId, RegistryError> {
    raw.ok_or_else(|| RegistryError::InvalidInput(String::new()))?
        .parse()
}

fn parse_order(raw: &str) -> Result<i32, RegistryError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| RegistryError::InvalidInput(raw.to_string()))
}

#[utoipa::path(
    post,
    path = "/updateRegisteredServiceEvaluationOrder.html",
    params(EvaluationOrderParams),
    responses(
        (status = 200, description = "Evaluation order updated", body = OperationResult),
        (status = 500, description = "Unknown or malformed id", body = OperationResult)
    )
)]
pub async fn update_evaluation_order(
    State(state): State<AppState>,
    query: Result<Query<EvaluationOrderParams>, QueryRejection>,
    body: Option<Form<EvaluationOrderParams>>,
) -> Result<OperationResult, ApiError> {
    let params = merge_params(query, body)?;
    let id = parse_id(params.id.as_deref())?;
    let mut service = state.registry.find_by_id(id.get())?;
    if let Some(raw) = params.evaluation_order.as_deref() {
        service.evaluation_order = parse_order(raw)?;
    }
    let saved = state.registry.save(service)?;
    tracing::info!(id = saved.id, order = saved.evaluation_order, "evaluation order updated");
    metrics::counter!("casmgmt_operations_total", "op" => "update_order").increment(1);
    Ok(OperationResult::for_service(&saved))
}

#[utoipa::path(
    post,
    path = "/deleteRegisteredService.html",
    params(ServiceIdParams),
    responses(
        (status = 200, description = "Service deleted", body = OperationResult),
        (status = 500, description = "Unknown, malformed or out-of-range id", body = OperationResult)
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    query: Result<Query<ServiceIdParams>, QueryRejection>,
    body: Option<Form<ServiceIdParams>>,
) -> Result<OperationResult, ApiError> {
    let params = merge_params(query, body)?;
    let id = parse_id(params.id.as_deref())?;
    let removed = state
        .registry
        .delete_unprotected(id.get(), &state.default_service_url)?;
    tracing::info!(id = removed.id, name = %removed.name, "service deleted");
    metrics::counter!("casmgmt_operations_total", "op" => "delete").increment(1);
    Ok(OperationResult::for_service(&removed))
}

#[utoipa::path(
    get,
    path = "/getServices.html",
    responses((status = 200, description = "All services in evaluation order", body = OperationResult))
)]
pub async fn list_services(State(state): State<AppState>) -> Result<OperationResult, ApiError> {
    let services = state.registry.all_services()?;
    tracing::debug!(count = services.len(), "services listed");
    metrics::counter!("casmgmt_operations_total", "op" => "list").increment(1);
    Ok(OperationResult::listing(services))
}

#[utoipa::path(
    get,
    path = "/manage.html",
    responses((status = 200, description = "Management page", body = String, content_type = "text/html"))
)]
pub async fn manage(State(state): State<AppState>) -> impl IntoResponse {
    // The page must still render when the default service cannot be written.
    if let Err(err) = ensure_default_service(&state).await {
        tracing::warn!(error = %err, "default service not ensured");
    }
    metrics::counter!("casmgmt_operations_total", "op" => "manage").increment(1);
    ManageView {
        default_service_url: state.default_service_url.clone(),
        status: StatusCode::OK.as_u16(),
    }
}

/// Registers a service covering the management application itself, unless one already matches.
///
/// Concurrent callers are serialized so only one of them can insert it.
pub async fn ensure_default_service(state: &AppState) -> Result<Option<RegisteredService>, RegistryError> {
    let _guard = state.ensure_lock.lock().await;
    let url = state.default_service_url.as_str();
    if state.registry.find_by_url(url)?.is_some() {
        return Ok(None);
    }
    let service = RegisteredService::new("Services Management Web Application", url)
        .with_description("Default service for the services management application")
        .with_evaluation_order(0);
    let saved = state.registry.save(service)?;
    tracing::info!(id = saved.id, url, "default service registered");
    Ok(Some(saved))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "OK"))
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
