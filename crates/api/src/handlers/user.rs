//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::user::{CreateUser, UpdateUser};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::user;
use crate::state::AppState;

/// POST /api/v1/users
///
/// Create a user in the caller's tenant. The password is stored hashed.
pub async fn create(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<impl IntoResponse> {
    let created = user::create(&state.services, &caller, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/users/{id}
pub async fn update(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let updated = user::update(&state.services, &caller, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/users/email/{email}
pub async fn get_by_email(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = user::get_by_email(&state.services, &caller, &email).await?;
    Ok(Json(DataResponse { data: found }))
}

/// PATCH /api/v1/users/{id}/toggle
pub async fn toggle(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = user::toggle_deleted(&state.services, &caller, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/users/{id}
pub async fn get(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = user::get(&state.services, &caller, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/users/page
pub async fn page(
    caller: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = user::list(&state.services, &caller, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
