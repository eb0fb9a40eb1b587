//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login           -> login (public)
/// POST /confirm-email   -> confirm_email (public)
/// POST /reset-password  -> reset_password (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/confirm-email", post(auth::confirm_email))
        .route("/reset-password", post(auth::reset_password))
}
