//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use core_kernel::{CoreError, PortError};
use domain_customer::{CustomerError, LookupFailureKind};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The postal code provider answered, but not with an address
    #[error("Address lookup failed: {0}")]
    LookupFailed(String),

    /// The postal code provider or a store could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::LookupFailed(msg) => (StatusCode::BAD_GATEWAY, "lookup_failed", msg.clone()),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg.clone()),
            ApiError::Internal(msg) => {
                error!(message = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error".to_string())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CustomerError::Validation(msg) => ApiError::Validation(msg),
            CustomerError::LookupFailed { kind, .. } => match kind {
                LookupFailureKind::ProviderUnavailable => {
                    ApiError::ServiceUnavailable(err.to_string())
                }
                LookupFailureKind::MalformedPostalCode | LookupFailureKind::UnknownPostalCode => {
                    ApiError::LookupFailed(err.to_string())
                }
            },
            CustomerError::Store(port) => port.into(),
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, .. } => ApiError::Validation(message),
            PortError::Conflict { message } => ApiError::Conflict(message),
            e if e.is_transient() => ApiError::ServiceUnavailable(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ApiError::Validation(msg),
            CoreError::InvalidIdentifier(msg) => ApiError::BadRequest(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::PostalCode;

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_lookup_failures_split_by_kind() {
        let code = PostalCode::parse("99999999").unwrap();

        let unknown = CustomerError::lookup_failed(&code, PortError::not_found("Address", &code));
        assert_eq!(status_of(unknown.into()), StatusCode::BAD_GATEWAY);

        let down = CustomerError::lookup_failed(&code, PortError::unavailable("ViaCEP"));
        assert_eq!(status_of(down.into()), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        assert_eq!(
            status_of(CustomerError::customer_not_found(7).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CustomerError::validation("blank").into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(CustomerError::Store(PortError::internal("boom")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(CustomerError::Store(PortError::connection("refused")).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_invalid_identifier_is_bad_request() {
        let error: ApiError = CoreError::invalid_identifier("abc").into();
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }
}
