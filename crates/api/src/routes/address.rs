//! Route definitions for the `/addresses` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::address;
use crate::state::AppState;

/// Routes mounted at `/addresses`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// GET   /user/{user_id} -> list_for_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(address::create))
        .route("/page", post(address::page))
        .route("/{id}", get(address::get).put(address::update))
        .route("/{id}/toggle", patch(address::toggle))
        .route("/user/{user_id}", get(address::list_for_user))
}
