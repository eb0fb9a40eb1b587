//! Route definitions for the `/products` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// PATCH /{id}/return   -> toggle_return
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(product::create))
        .route("/page", post(product::page))
        .route("/{id}", get(product::get).put(product::update))
        .route("/{id}/toggle", patch(product::toggle))
        .route("/{id}/return", patch(product::toggle_return))
}
