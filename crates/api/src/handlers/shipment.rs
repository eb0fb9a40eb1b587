//! Handlers for the `/shipments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::shipment::ShipmentRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::shipment;
use crate::state::AppState;

/// POST /api/v1/shipments
///
/// Places the order with the shipping provider before anything is stored.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ShipmentRequest>,
) -> AppResult<impl IntoResponse> {
    let created = shipment::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/shipments/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = shipment::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// PATCH /api/v1/shipments/{id}/cancel
pub async fn cancel(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cancelled = shipment::cancel(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: cancelled }))
}

/// POST /api/v1/shipments/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = shipment::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
