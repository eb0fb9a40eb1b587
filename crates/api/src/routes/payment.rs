//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST /cash                          -> record_cash
/// POST /cash/follow-up                -> record_follow_up
/// GET  /{id}                          -> get
/// GET  /purchase-order/{order_id}      -> list_for_order
/// GET  /purchase-order/{order_id}/paid -> is_paid
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cash", post(payment::record_cash))
        .route("/cash/follow-up", post(payment::record_follow_up))
        .route("/{id}", get(payment::get))
        .route("/purchase-order/{order_id}", get(payment::list_for_order))
        .route("/purchase-order/{order_id}/paid", get(payment::is_paid))
}
