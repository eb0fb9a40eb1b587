//! Route definitions for the `/shipments` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::shipment;
use crate::state::AppState;

/// Routes mounted at `/shipments`.
///
/// ```text
/// POST  /             -> create
/// POST  /page         -> page
/// GET   /{id}         -> get
/// PATCH /{id}/cancel  -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(shipment::create))
        .route("/page", post(shipment::page))
        .route("/{id}", get(shipment::get))
        .route("/{id}/cancel", patch(shipment::cancel))
}
