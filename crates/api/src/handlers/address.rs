//! Handlers for the `/addresses` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::address::AddressRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::address;
use crate::state::AppState;

/// POST /api/v1/addresses
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddressRequest>,
) -> AppResult<impl IntoResponse> {
    let created = address::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/addresses/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddressRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = address::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/addresses/{id}/toggle
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = address::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/addresses/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = address::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// GET /api/v1/addresses/user/{user_id}
///
/// Live addresses attached to one user of the caller's tenant.
pub async fn list_for_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let addresses = address::list_for_user(&state.services, &user, user_id).await?;
    Ok(Json(DataResponse { data: addresses }))
}

/// POST /api/v1/addresses/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = address::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
