//! Route definitions for the `/packages` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::package;
use crate::state::AppState;

/// Routes mounted at `/packages`.
///
/// ```text
/// POST  /              -> create
/// POST  /bulk          -> bulk_create
/// POST  /page          -> page
/// GET   /all           -> all
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(package::create))
        .route("/bulk", post(package::bulk_create))
        .route("/page", post(package::page))
        .route("/all", get(package::all))
        .route("/{id}", get(package::get).put(package::update))
        .route("/{id}/toggle", patch(package::toggle))
}
