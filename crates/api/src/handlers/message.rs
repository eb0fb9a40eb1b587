//! Handlers for the `/messages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::message::MessageRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::message;
use crate::state::AppState;

/// POST /api/v1/messages
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<MessageRequest>,
) -> AppResult<impl IntoResponse> {
    let created = message::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/messages/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MessageRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = message::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/messages/{id}/toggle
///
/// Soft-delete the message, or restore it when already deleted. Deleting
/// cancels a pending scheduled email; restoring reschedules it.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = message::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/messages/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = message::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/messages/{id}/read
pub async fn mark_read(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let message = message::mark_read(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: message }))
}

/// GET /api/v1/messages/user/{user_id}
///
/// Messages addressed to the user directly or through one of their groups,
/// each with the user's read flag.
pub async fn list_for_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inbox = message::list_for_user(&state.services, &user, user_id).await?;
    Ok(Json(DataResponse { data: inbox }))
}

/// POST /api/v1/messages/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = message::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
