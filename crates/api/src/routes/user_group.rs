//! Route definitions for the `/user-groups` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::user_group;
use crate::state::AppState;

/// Routes mounted at `/user-groups`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(user_group::create))
        .route("/page", post(user_group::page))
        .route("/{id}", get(user_group::get).put(user_group::update))
        .route("/{id}/toggle", patch(user_group::toggle))
}
