//! Route definitions for the `/promos` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::promo;
use crate::state::AppState;

/// Routes mounted at `/promos`.
///
/// ```text
/// POST  /               -> create
/// POST  /bulk           -> bulk_create
/// POST  /page           -> page
/// GET   /code/{code}    -> get_by_code
/// GET   /{id}           -> get
/// PATCH /{id}/toggle    -> toggle
/// POST  /{id}/discount  -> discount
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(promo::create))
        .route("/bulk", post(promo::bulk_create))
        .route("/page", post(promo::page))
        .route("/code/{code}", get(promo::get_by_code))
        .route("/{id}", get(promo::get))
        .route("/{id}/toggle", patch(promo::toggle))
        .route("/{id}/discount", post(promo::discount))
}
