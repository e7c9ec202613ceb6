use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use casmgmt_core::{RegisteredService, RegistryError};
use serde::Serialize;
use utoipa::ToSchema;

use crate::wire;

/// Envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<RegisteredService>>,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            service_name: None,
            services: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            ..Self::ok()
        }
    }

    pub fn for_service(service: &RegisteredService) -> Self {
        Self {
            service_name: Some(service.name.clone()),
            ..Self::ok()
        }
    }

    pub fn listing(services: Vec<RegisteredService>) -> Self {
        Self {
            services: Some(services),
            ..Self::ok()
        }
    }

    fn http_status(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for OperationResult {
    fn into_response(self) -> Response {
        let status = self.http_status();
        match wire::to_string(&self) {
            Ok(body) => {
                let mut response = (status, body).into_response();
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json;charset=UTF-8"),
                );
                response
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to encode response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Any failed registry operation. Callers only ever see a generic 500.
#[derive(Debug)]
pub struct ApiError(pub RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = match &self.0 {
            RegistryError::NotFound(_) => "not_found",
            RegistryError::InvalidInput(_) => "invalid_input",
            RegistryError::OutOfRange(_) => "out_of_range",
            RegistryError::ProtectedService(_) => "protected",
            RegistryError::Storage(_) => "storage",
        };
        tracing::error!(kind, error = %self.0, "registry operation failed");
        metrics::counter!("casmgmt_errors_total", "kind" => kind).increment(1);
        OperationResult::failed().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_serializes_services_and_status() {
        let result = OperationResult::listing(vec![RegisteredService::new("a", "https://a/**").with_id(1)]);
        let body = wire::to_string(&result).unwrap();
        assert!(body.contains("\"services\" : ["));
        assert!(body.contains("\"status\" : 200"));
        assert!(!body.contains("serviceName"));
    }

    #[test]
    fn errors_collapse_to_internal_server_error() {
        for err in [
            RegistryError::NotFound(666),
            RegistryError::InvalidInput("invalid".into()),
            RegistryError::OutOfRange("1.7976931348623157E308".into()),
        ] {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
