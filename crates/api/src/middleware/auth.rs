//! JWT-based authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use bizhub_core::error::CoreError;
use bizhub_core::types::{DbId, TenantContext};

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Carries the tenant context every service call is scoped by, plus the
/// request path, which is recorded with each audit-log entry.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(client_id = user.client_id(), route = %user.route, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub tenant: TenantContext,
    /// The user's role name (e.g. `"admin"`, `"user"`).
    pub role: String,
    /// Full request path, including the `/api/v1` prefix.
    pub route: String,
}

impl AuthUser {
    pub fn client_id(&self) -> DbId {
        self.tenant.client_id
    }

    pub fn user_id(&self) -> DbId {
        self.tenant.user_id
    }

    /// Name stamped into `created_user` / `modified_user`.
    pub fn actor(&self) -> &str {
        &self.tenant.login_name
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::unauthorized("Missing Authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>",
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::unauthorized("Invalid or expired token")))?;

        // Nested routers see a stripped URI; the original one is in the extensions.
        let route = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(AuthUser {
            tenant: claims.tenant(),
            role: claims.role,
            route,
        })
    }
}
