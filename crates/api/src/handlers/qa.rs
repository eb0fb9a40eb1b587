//! Handlers for the QA dashboard: test executions, recorded runs and coverage.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bizhub_core::qa::TestExecutionRequest;
use bizhub_db::models::test_run::TestRunRequest;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::qa;
use crate::state::AppState;

/// POST /api/v1/qa/executions
///
/// Queue a test run and return its PENDING record right away. Poll
/// `GET /qa/executions/{id}` for progress.
pub async fn start(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TestExecutionRequest>,
) -> AppResult<impl IntoResponse> {
    let execution =
        qa::start(&state.qa_tracker, state.qa_runner.clone(), &user, &input).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: execution })))
}

/// GET /api/v1/qa/executions/{id}
pub async fn get(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let execution = qa::get(&state.qa_tracker, id).await?;
    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/v1/qa/dashboard
///
/// Every catalogued service with its operations, their latest recorded
/// results and the coverage summary.
pub async fn dashboard(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let board = qa::dashboard(&state.services, &user).await?;
    Ok(Json(DataResponse { data: board }))
}

/// GET /api/v1/qa/coverage
pub async fn coverage(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = qa::coverage(&state.services, &user).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/qa/services
pub async fn services(_user: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: qa::available_services() }))
}

/// POST /api/v1/qa/test-runs
pub async fn save_test_run(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TestRunRequest>,
) -> AppResult<impl IntoResponse> {
    let run = qa::save_test_run(&state.services, &user, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: run })))
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub service: Option<String>,
}

/// GET /api/v1/qa/test-results?service=Lead
pub async fn latest_results(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> AppResult<impl IntoResponse> {
    let rows = qa::latest_results(&state.services, &user, query.service.as_deref()).await?;
    Ok(Json(DataResponse { data: rows }))
}
