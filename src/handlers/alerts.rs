use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::entities::alert::AlertSeverity;
use crate::errors::ServiceError;
use crate::handlers::common::{validate_input, PaginatedResponse, PaginationParams};
use crate::services::alerts::CreateAlertCommand;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// One of "info", "warning", "critical"
    pub severity: String,
    pub created_by: Uuid,
}

/// Create a new alert
#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn create_alert(
    State(state): State<AppState>,
    Json(payload): Json<CreateAlertRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let severity = AlertSeverity::from_str(&payload.severity).ok_or_else(|| {
        ServiceError::ValidationError(format!("Unknown severity '{}'", payload.severity))
    })?;

    let alert = state
        .services
        .alerts
        .create_alert(CreateAlertCommand {
            title: payload.title,
            description: payload.description,
            severity,
            created_by: payload.created_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(alert)))
}

/// List alerts with pagination
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    params(PaginationParams),
    responses(
        (status = 200, description = "Alert list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (alerts, total) = state
        .services
        .alerts
        .list_alerts(params.page, params.per_page)
        .await?;

    Ok((
        StatusCode::OK,
        Json(PaginatedResponse::new(
            alerts,
            params.page,
            params.per_page,
            total,
        )),
    ))
}

/// Get a single alert
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let alert = state
        .services
        .alerts
        .get_alert(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Alert {} not found", id)))?;

    Ok((StatusCode::OK, Json(alert)))
}
