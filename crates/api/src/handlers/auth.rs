//! Handlers for the `/auth` resource. None of them needs a session.

use axum::extract::{OriginalUri, State};
use axum::Json;
use bizhub_core::messages::login as msg;
use bizhub_db::models::user::{ConfirmEmailRequest, LoginRequest, ResetPasswordRequest, User};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::login::{self, LoginResponse};
use crate::state::AppState;

/// POST /api/v1/auth/login
///
/// Check the caller's credentials. Bearer tokens come from the identity
/// provider, so the response only carries the signed-in user and client.
pub async fn login(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let signed_in = login::login(&state.services, input, uri.path()).await?;
    Ok(Json(DataResponse { data: signed_in }))
}

/// POST /api/v1/auth/confirm-email
pub async fn confirm_email(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<ConfirmEmailRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    let confirmed = login::confirm_email(&state.services, input, uri.path()).await?;
    Ok(Json(DataResponse { data: confirmed }))
}

/// POST /api/v1/auth/reset-password
///
/// The new password goes out by email only.
pub async fn reset_password(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<DataResponse<&'static str>>> {
    login::reset_password(&state.services, input, uri.path()).await?;
    Ok(Json(DataResponse {
        data: msg::PASSWORD_RESET,
    }))
}
