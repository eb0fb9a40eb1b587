//! Handlers for the `/payments` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::types::DbId;
use bizhub_db::models::payment::CashPaymentRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::payment;
use crate::state::AppState;

/// POST /api/v1/payments/cash
///
/// First payment against a pending order; approves the order.
pub async fn record_cash(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CashPaymentRequest>,
) -> AppResult<impl IntoResponse> {
    let receipt = payment::record_cash_payment(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// POST /api/v1/payments/cash/follow-up
pub async fn record_follow_up(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CashPaymentRequest>,
) -> AppResult<impl IntoResponse> {
    let receipt = payment::record_follow_up_payment(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/payments/{id}
pub async fn get(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let found = payment::get(&state.services, &user, id).await?;
    Ok(Json(DataResponse { data: found }))
}

/// GET /api/v1/payments/purchase-order/{order_id}
pub async fn list_for_order(
    user: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let payments = payment::list_for_purchase_order(&state.services, &user, order_id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// GET /api/v1/payments/purchase-order/{order_id}/paid
pub async fn is_paid(
    user: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let paid = payment::is_purchase_order_paid(&state.services, &user, order_id).await?;
    Ok(Json(DataResponse { data: paid }))
}
