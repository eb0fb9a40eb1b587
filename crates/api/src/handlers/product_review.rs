//! Handlers for the `/product-reviews` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::pagination::PaginationRequest;
use bizhub_core::types::DbId;
use bizhub_db::models::product_review::{ProductReviewRequest, ScoreRequest};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::product_review;
use crate::state::AppState;

/// POST /api/v1/product-reviews
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProductReviewRequest>,
) -> AppResult<impl IntoResponse> {
    let created = product_review::create(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// POST /api/v1/product-reviews/product/{product_id}/page
pub async fn page_for_product(
    user: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<impl IntoResponse> {
    let page = product_review::list_for_product(&state.services, &user, product_id, &input).await?;
    Ok(Json(DataResponse { data: page }))
}

/// PATCH /api/v1/product-reviews/{id}/toggle
pub async fn toggle(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let toggled = product_review::toggle_deleted(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: toggled }))
}

/// PATCH /api/v1/product-reviews/{id}/score
///
/// Body `{"increase": true}` adds a vote; anything else takes one away.
pub async fn score(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ScoreRequest>,
) -> AppResult<impl IntoResponse> {
    let scored = product_review::set_score(&state.services, &user, id, input.increase).await?;
    Ok(Json(DataResponse { data: scored }))
}
