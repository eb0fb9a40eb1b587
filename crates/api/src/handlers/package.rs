//! Handlers for the `/packages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::package::PackageRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::package;
use crate::state::AppState;

/// POST /api/v1/packages
///
/// A second package with the same dimensions and type is rejected.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PackageRequest>,
) -> AppResult<impl IntoResponse> {
    let created = package::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/packages/bulk
///
/// Items are inserted independently; the result lists each failure.
pub async fn bulk_create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<Vec<PackageRequest>>,
) -> AppResult<impl IntoResponse> {
    let result = package::bulk_create(&state.services, &user, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/packages/all
pub async fn all(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let packages = package::list_all(&state.services, &user).await?;
    Ok(Json(DataResponse { data: packages }))
}

/// PUT /api/v1/packages/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PackageRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = package::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/packages/{id}/toggle
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = package::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/packages/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = package::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/packages/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = package::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
