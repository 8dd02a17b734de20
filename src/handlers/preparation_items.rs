use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::handlers::common::validate_input;
use crate::services::preparation_items::AddPreparationItemCommand;
use crate::{ApiResponse, AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddPreparationItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 1))]
    pub total_quantity: i32,
    pub unit: Option<String>,
}

/// Add an item to an alert's supply list
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{alert_id}/items",
    params(("alert_id" = Uuid, Path, description = "Alert ID")),
    request_body = AddPreparationItemRequest,
    responses(
        (status = 201, description = "Item added to the supply list"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Alert not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "preparation-items"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(payload): Json<AddPreparationItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let item = state
        .services
        .preparation_items
        .add_item(AddPreparationItemCommand {
            alert_id,
            name: payload.name,
            total_quantity: payload.total_quantity,
            unit: payload.unit,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// List an alert's supply list with claim status
#[utoipa::path(
    get,
    path = "/api/v1/alerts/{alert_id}/items",
    params(("alert_id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Supply list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "preparation-items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state
        .services
        .preparation_items
        .list_for_alert(alert_id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(items))))
}

/// Get a single item from an alert's supply list
pub async fn get_item(
    State(state): State<AppState>,
    Path((alert_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state
        .services
        .preparation_items
        .get_item(alert_id, item_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))?;

    Ok((StatusCode::OK, Json(item)))
}
