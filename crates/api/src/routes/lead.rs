//! Route definitions for the `/leads` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::lead;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// POST  /              -> create
/// POST  /bulk          -> bulk_create
/// POST  /page          -> page
/// GET   /email/{email} -> get_by_email
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(lead::create))
        .route("/bulk", post(lead::bulk_create))
        .route("/page", post(lead::page))
        .route("/email/{email}", get(lead::get_by_email))
        .route("/{id}", get(lead::get).put(lead::update))
        .route("/{id}/toggle", patch(lead::toggle))
}
