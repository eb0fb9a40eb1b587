//! Route definitions for the QA dashboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::qa;
use crate::state::AppState;

/// Routes mounted at `/qa`.
///
/// ```text
/// POST /executions       -> start
/// GET  /executions/{id}  -> get
/// GET  /dashboard        -> dashboard
/// GET  /coverage         -> coverage
/// GET  /services         -> services
/// POST /test-runs        -> save_test_run
/// GET  /test-results     -> latest_results (?service=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/executions", post(qa::start))
        .route("/executions/{id}", get(qa::get))
        .route("/dashboard", get(qa::dashboard))
        .route("/coverage", get(qa::coverage))
        .route("/services", get(qa::services))
        .route("/test-runs", post(qa::save_test_run))
        .route("/test-results", get(qa::latest_results))
}
