//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError};

/// API-level error type that maps to HTTP responses.
///
/// Bodies follow `{ "error": <category>, "details": <message> }`; the
/// category tracks the core error taxonomy (not found / precondition failed /
/// validation failed / storage failure).
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "validation failed", msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error", msg)
            }
        };

        let body = serde_json::json!({ "error": error, "details": details });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, &'static str, String) {
    match &err {
        DomainError::OrderNotFound(_) | DomainError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, "not found", err.to_string())
        }
        DomainError::Order(order_err) => match order_err {
            OrderError::OrderCancelled => (
                StatusCode::PRECONDITION_FAILED,
                "precondition failed",
                err.to_string(),
            ),
            OrderError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "precondition failed", err.to_string())
            }
            OrderError::InvalidQuantity { .. }
            | OrderError::InvalidUnitPrice { .. }
            | OrderError::InvalidShippingFee { .. }
            | OrderError::UnknownStatus { .. }
            | OrderError::CancelledStatusInPayload => (
                StatusCode::BAD_REQUEST,
                "validation failed",
                err.to_string(),
            ),
        },
        DomainError::Storage(_) => {
            tracing::error!(error = %err, "storage failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage failure",
                err.to_string(),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<storage::StorageError> for ApiError {
    fn from(err: storage::StorageError) -> Self {
        ApiError::Domain(DomainError::Storage(err))
    }
}
