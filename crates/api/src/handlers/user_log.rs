//! Handler for reading the audit log.

use axum::extract::State;
use axum::Json;
use bizhub_core::pagination::{PaginatedResponse, PaginationRequest};
use bizhub_db::models::user_log::UserLog;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::user_log;
use crate::state::AppState;

/// POST /api/v1/user-logs/page
pub async fn page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PaginationRequest>,
) -> AppResult<Json<DataResponse<PaginatedResponse<UserLog>>>> {
    let page = user_log::list(&state.services, &user, &input).await?;
    Ok(Json(DataResponse { data: page }))
}
