//! Route definitions for the `/todos` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::todo;
use crate::state::AppState;

/// Routes mounted at `/todos`.
///
/// ```text
/// GET    /             -> list_mine
/// POST   /             -> create
/// GET    /{id}         -> get
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// PATCH  /{id}/toggle  -> toggle
/// PATCH  /{id}/done    -> toggle_done
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todo::list_mine).post(todo::create))
        .route(
            "/{id}",
            get(todo::get).put(todo::update).delete(todo::delete),
        )
        .route("/{id}/toggle", patch(todo::toggle))
        .route("/{id}/done", patch(todo::toggle_done))
}
