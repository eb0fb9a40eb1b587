//! Route definitions for the `/purchase-orders` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::purchase_order;
use crate::state::AppState;

/// Routes mounted at `/purchase-orders`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// POST  /{id}/approve  -> approve
/// POST  /{id}/reject   -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(purchase_order::create))
        .route("/page", post(purchase_order::page))
        .route("/{id}", get(purchase_order::get).put(purchase_order::update))
        .route("/{id}/toggle", patch(purchase_order::toggle))
        .route("/{id}/approve", post(purchase_order::approve))
        .route("/{id}/reject", post(purchase_order::reject))
}
