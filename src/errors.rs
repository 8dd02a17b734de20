use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::entities::supply_claim;

/// Standardized error body for general API failures
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Alert with ID 550e8400-e29b-41d4-a716-446655440000 not found",
    "details": null,
    "timestamp": "2026-08-07T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Additional error details (validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.response_message();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: error_message,
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

/// Outcomes of the claim resolver that must stay distinguishable to callers.
///
/// `AlreadyClaimed` means a claim row existed at pre-check time;
/// `RaceLost` means the unique index rejected the insert after a clean
/// pre-check, i.e. a concurrent request won the race in between.
#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("Missing required parameters")]
    InvalidRequest,

    #[error("Item not found")]
    NotFound,

    #[error("Item is already claimed")]
    AlreadyClaimed { existing_claim: supply_claim::Model },

    #[error("Not enough quantity available")]
    InsufficientQuantity { available: i32 },

    #[error("Item was just claimed by someone else")]
    RaceLost,

    #[error("Storage failure: {0}")]
    Storage(#[from] DbErr),
}

impl ClaimError {
    /// Machine-readable discriminator carried on conflict responses.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyClaimed { .. } => Some("ALREADY_CLAIMED"),
            Self::InsufficientQuantity { .. } => Some("INSUFFICIENT_QUANTITY"),
            Self::RaceLost => Some("RACE_CONDITION"),
            _ => None,
        }
    }
}

impl IntoResponse for ClaimError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing required parameters" })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Item not found" })),
            )
                .into_response(),
            Self::AlreadyClaimed { ref existing_claim } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Item is already claimed",
                    "code": "ALREADY_CLAIMED",
                    "existingClaim": existing_claim,
                })),
            )
                .into_response(),
            Self::InsufficientQuantity { available } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Not enough quantity available",
                    "code": "INSUFFICIENT_QUANTITY",
                    "available": available,
                })),
            )
                .into_response(),
            Self::RaceLost => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "Item was just claimed by someone else",
                    "code": "RACE_CONDITION",
                })),
            )
                .into_response(),
            Self::Storage(ref db_err) => {
                // Details stay server-side; the caller gets an opaque failure.
                error!(error = %db_err, "claim persistence failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to check/save claimed item" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_status_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let err = ServiceError::DatabaseError(DbErr::Custom("secret dsn".into()));
        assert_eq!(err.response_message(), "Database error");
    }

    #[test]
    fn claim_error_codes() {
        assert_eq!(ClaimError::RaceLost.code(), Some("RACE_CONDITION"));
        assert_eq!(
            ClaimError::InsufficientQuantity { available: 2 }.code(),
            Some("INSUFFICIENT_QUANTITY")
        );
        assert_eq!(ClaimError::InvalidRequest.code(), None);
        assert_eq!(ClaimError::NotFound.code(), None);
    }
}
