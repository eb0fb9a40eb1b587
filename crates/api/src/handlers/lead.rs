//! Handlers for the `/leads` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::lead::LeadRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::lead;
use crate::state::AppState;

/// POST /api/v1/leads
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<LeadRequest>,
) -> AppResult<impl IntoResponse> {
    let created = lead::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/leads/bulk
///
/// Items are inserted independently; the result lists each failure.
pub async fn bulk_create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<Vec<LeadRequest>>,
) -> AppResult<impl IntoResponse> {
    let result = lead::bulk_create(&state.services, &user, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/leads/email/{email}
pub async fn get_by_email(
    user: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = lead::get_by_email(&state.services, &user, &email).await?;
    Ok(Json(DataResponse { data: found }))
}

/// PUT /api/v1/leads/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<LeadRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = lead::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/leads/{id}/toggle
///
/// Soft-delete the lead, or restore it when already deleted.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = lead::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/leads/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = lead::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/leads/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = lead::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
