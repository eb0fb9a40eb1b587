//! Route definitions for the `/users` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST  /              -> create
/// POST  /page          -> page
/// GET   /email/{email} -> get_by_email
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(user::create))
        .route("/page", post(user::page))
        .route("/email/{email}", get(user::get_by_email))
        .route("/{id}", get(user::get).put(user::update))
        .route("/{id}/toggle", patch(user::toggle))
}
