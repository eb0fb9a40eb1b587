//! Handlers for the `/todos` resource.
//!
//! Todos are private: every route acts on the caller's own items only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::types::DbId;
use bizhub_db::models::todo::TodoRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::todo;
use crate::state::AppState;

/// POST /api/v1/todos
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TodoRequest>,
) -> AppResult<impl IntoResponse> {
    let created = todo::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/todos/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TodoRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = todo::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/todos/{id}/toggle
///
/// Soft-delete the todo, or restore it when already deleted.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = todo::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// PATCH /api/v1/todos/{id}/done
pub async fn toggle_done(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let todo = todo::toggle_done(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: todo }))
}

/// DELETE /api/v1/todos/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    todo::delete(&state.services, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/todos
pub async fn list_mine(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let todos = todo::list_mine(&state.services, &user).await?;
    Ok(Json(DataResponse { data: todos }))
}

/// GET /api/v1/todos/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = todo::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

