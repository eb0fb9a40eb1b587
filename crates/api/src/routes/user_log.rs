//! Route definitions for the audit log.

use axum::routing::post;
use axum::Router;

use crate::handlers::user_log;
use crate::state::AppState;

/// Routes mounted at `/user-logs`. The log is read-only over HTTP.
pub fn router() -> Router<AppState> {
    Router::new().route("/page", post(user_log::page))
}
