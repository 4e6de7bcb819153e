//! API error types with HTTP response mapping.

use application::ApplicationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{SaleError, ValidationErrorDetail};
use sale_store::StoreError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// A sale use case failed.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Application(err) => application_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new())
            }
        };

        let body = if errors.is_empty() {
            serde_json::json!({ "error": message })
        } else {
            serde_json::json!({ "error": message, "errors": errors })
        };
        (status, axum::Json(body)).into_response()
    }
}

fn application_error_to_response(
    err: ApplicationError,
) -> (StatusCode, String, Vec<ValidationErrorDetail>) {
    let status = match &err {
        ApplicationError::Validation(result) => {
            return (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                result.errors().to_vec(),
            );
        }
        ApplicationError::SaleNotFound(_) | ApplicationError::ItemNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ApplicationError::Domain(SaleError::InvalidQuantity { .. }) => StatusCode::BAD_REQUEST,
        ApplicationError::Domain(SaleError::InvalidStateTransition { .. }) => {
            StatusCode::CONFLICT
        }
        ApplicationError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        ApplicationError::Store(
            StoreError::ConcurrencyConflict { .. } | StoreError::AlreadyExists(_),
        ) => StatusCode::CONFLICT,
        ApplicationError::Store(_) => {
            tracing::error!(error = %err, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, err.to_string(), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{SaleId, Version};
    use domain::{SaleStatus, ValidationResult};

    fn status_of(err: ApplicationError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let mut result = ValidationResult::new();
        result.push("sale_number", "Sale number is required");
        assert_eq!(
            status_of(ApplicationError::Validation(result)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        assert_eq!(
            status_of(ApplicationError::SaleNotFound(SaleId::new())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApplicationError::Store(StoreError::NotFound(SaleId::new()))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn conflicts_map_to_conflict() {
        assert_eq!(
            status_of(ApplicationError::Domain(SaleError::InvalidStateTransition {
                current: SaleStatus::Cancelled,
                action: "cancel",
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApplicationError::Store(StoreError::ConcurrencyConflict {
                sale_id: SaleId::new(),
                expected: Version::first(),
                actual: Version::new(2),
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn quantity_violation_maps_to_bad_request() {
        assert_eq!(
            status_of(ApplicationError::Domain(SaleError::InvalidQuantity {
                quantity: 21
            })),
            StatusCode::BAD_REQUEST
        );
    }
}
