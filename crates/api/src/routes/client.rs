//! Route definitions for the `/clients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::client;
use crate::state::AppState;

/// Routes mounted at `/clients`. Only the caller's own client is reachable.
///
/// ```text
/// GET /current  -> get_current
/// PUT /current  -> update_current
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/current",
        get(client::get_current).put(client::update_current),
    )
}
