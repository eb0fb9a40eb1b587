//! Handlers for the `/promos` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::promo::{DiscountRequest, PromoRequest};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::promo;
use crate::state::AppState;

/// POST /api/v1/promos
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PromoRequest>,
) -> AppResult<impl IntoResponse> {
    let created = promo::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PATCH /api/v1/promos/{id}/toggle
///
/// Soft-delete the promo, or restore it when already deleted.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = promo::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// POST /api/v1/promos/bulk
///
/// Items are inserted independently; the result lists each failure.
pub async fn bulk_create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<Vec<PromoRequest>>,
) -> AppResult<impl IntoResponse> {
    let result = promo::bulk_create(&state.services, &user, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/promos/code/{code}
pub async fn get_by_code(
    user: AuthUser,
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    let found = promo::get_by_code(&state.services, &user, &code).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/promos/{id}/discount
pub async fn discount(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DiscountRequest>,
) -> AppResult<impl IntoResponse> {
    let result = promo::discount(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/promos/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = promo::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/promos/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = promo::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
