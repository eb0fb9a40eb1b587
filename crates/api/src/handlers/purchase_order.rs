//! Handlers for the `/purchase-orders` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::purchase_order::PurchaseOrderRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::purchase_order;
use crate::state::AppState;

/// POST /api/v1/purchase-orders
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PurchaseOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let created = purchase_order::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/purchase-orders/{id}
///
/// Line items and charges replace the stored ones; amounts are recomputed.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PurchaseOrderRequest>,
) -> AppResult<impl IntoResponse> {
    let updated = purchase_order::update(&state.services, &user, id, input).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// PATCH /api/v1/purchase-orders/{id}/toggle
///
/// Soft-delete the order together with its payment info, or restore both.
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = purchase_order::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// GET /api/v1/purchase-orders/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = purchase_order::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/purchase-orders/{id}/approve
pub async fn approve(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = purchase_order::approve(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/purchase-orders/{id}/reject
pub async fn reject(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = purchase_order::reject(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/purchase-orders/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = purchase_order::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
