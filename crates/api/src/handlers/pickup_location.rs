//! Handlers for the `/pickup-locations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::pickup_location::PickupLocationRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::pickup_location;
use crate::state::AppState;

/// POST /api/v1/pickup-locations
///
/// Saves the address and location, then registers the location with the
/// shipping provider.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PickupLocationRequest>,
) -> AppResult<impl IntoResponse> {
    let created = pickup_location::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/pickup-locations/bulk
///
/// Each location is saved and registered on its own; the result lists each
/// failure.
pub async fn bulk_create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<Vec<PickupLocationRequest>>,
) -> AppResult<impl IntoResponse> {
    let result = pickup_location::bulk_create(&state.services, &user, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// PUT /api/v1/pickup-locations/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PickupLocationRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = pickup_location::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/pickup-locations/{id}/toggle
///
/// Soft-delete the pickup location, or restore it when already deleted.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = pickup_location::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/pickup-locations/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = pickup_location::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/pickup-locations/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = pickup_location::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
