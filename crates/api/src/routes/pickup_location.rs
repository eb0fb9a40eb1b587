//! Route definitions for the `/pickup-locations` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::pickup_location;
use crate::state::AppState;

/// Routes mounted at `/pickup-locations`.
///
/// ```text
/// POST  /              -> create
/// POST  /bulk          -> bulk_create
/// POST  /page          -> page
/// GET   /{id}          -> get
/// PUT   /{id}          -> update
/// PATCH /{id}/toggle   -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(pickup_location::create))
        .route("/bulk", post(pickup_location::bulk_create))
        .route("/page", post(pickup_location::page))
        .route("/{id}", get(pickup_location::get).put(pickup_location::update))
        .route("/{id}/toggle", patch(pickup_location::toggle))
}
