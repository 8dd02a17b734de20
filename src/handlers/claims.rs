use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{ClaimError, ServiceError};
use crate::services::claims::ClaimItemCommand;
use crate::{ApiResponse, AppState};

/// Wire format of a claim request.
///
/// Every identifier is accepted as an optional string and validated here,
/// before any storage access, so that a missing or malformed field produces
/// the contract's 400 rather than a framework rejection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItemRequest {
    pub item_id: Option<String>,
    pub user_id: Option<String>,
    pub alert_id: Option<String>,
    pub claimed_quantity: Option<i32>,
}

impl ClaimItemRequest {
    pub fn into_command(self) -> Result<ClaimItemCommand, ClaimError> {
        let item_id = parse_required_id(self.item_id.as_deref())?;
        let user_id = parse_required_id(self.user_id.as_deref())?;
        let alert_id = parse_required_id(self.alert_id.as_deref())?;

        // Absent quantity means one unit; an explicit non-positive quantity
        // is a client error.
        let quantity = match self.claimed_quantity {
            None => 1,
            Some(q) if q > 0 => q,
            Some(_) => return Err(ClaimError::InvalidRequest),
        };

        Ok(ClaimItemCommand {
            item_id,
            user_id,
            alert_id,
            quantity,
        })
    }
}

fn parse_required_id(raw: Option<&str>) -> Result<Uuid, ClaimError> {
    raw.and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(ClaimError::InvalidRequest)
}

/// Claim a supply item
#[utoipa::path(
    post,
    path = "/api/v1/claims",
    request_body = ClaimItemRequest,
    responses(
        (status = 200, description = "Claim accepted; the inserted claim row is returned"),
        (status = 400, description = "Missing or invalid parameters"),
        (status = 404, description = "Item not found under the given alert"),
        (status = 409, description = "Rejected: already claimed, insufficient quantity, or lost a concurrent race (see `code`)"),
        (status = 500, description = "Persistence failure")
    ),
    tag = "claims"
)]
pub async fn claim_item(
    State(state): State<AppState>,
    Json(payload): Json<ClaimItemRequest>,
) -> Result<impl IntoResponse, ClaimError> {
    let command = payload.into_command()?;

    let claim = state.services.claims.claim_item(command).await?;

    // The response carries the inserted row as a single-element array.
    Ok((StatusCode::OK, Json(ApiResponse::success(vec![claim]))))
}

/// List the claims recorded under an alert
pub async fn list_alert_claims(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let claims = state.services.claims.list_claims_for_alert(alert_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(claims))))
}
