//! Route definitions for the `/product-reviews` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::product_review;
use crate::state::AppState;

/// Routes mounted at `/product-reviews`.
///
/// ```text
/// POST  /                          -> create
/// POST  /product/{product_id}/page -> page_for_product
/// PATCH /{id}/toggle               -> toggle
/// PATCH /{id}/score                -> score
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(product_review::create))
        .route("/product/{product_id}/page", post(product_review::page_for_product))
        .route("/{id}/toggle", patch(product_review::toggle))
        .route("/{id}/score", patch(product_review::score))
}
