//! Handlers for the caller's own client record.

use axum::extract::State;
use axum::Json;
use bizhub_db::models::client::{Client, UpdateClient};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::client;
use crate::state::AppState;

/// GET /api/v1/clients/current
pub async fn get_current(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Client>>> {
    let current = client::get_current(&state.services, &user).await?;
    Ok(Json(DataResponse { data: current }))
}

/// PUT /api/v1/clients/current
pub async fn update_current(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<DataResponse<Client>>> {
    let updated = client::update_current(&state.services, &user, input).await?;
    Ok(Json(DataResponse { data: updated }))
}
