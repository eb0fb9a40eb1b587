//! Route definitions for the `/messages` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// POST  /{id}/read     -> mark_read
/// GET   /user/{user_id} -> list_for_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(message::create))
        .route("/page", post(message::page))
        .route("/{id}", get(message::get).put(message::update))
        .route("/{id}/toggle", patch(message::toggle))
        .route("/{id}/read", post(message::mark_read))
        .route("/user/{user_id}", get(message::list_for_user))
}
