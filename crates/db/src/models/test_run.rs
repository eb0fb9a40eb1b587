//! Recorded test runs and the latest result of each test.
//!
//! Clients post the results of a run they executed; every result also
//! replaces the stored latest result of the same test.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::qa as msg;
use bizhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::store::TenantEntity;

pub const DEFAULT_RUN_TYPE: &str = "SERVICE";
pub const DEFAULT_ENVIRONMENT: &str = "localhost";

pub mod result_statuses {
    pub const PASSED: &str = "PASSED";
    pub const FAILED: &str = "FAILED";
    pub const SKIPPED: &str = "SKIPPED";
}

pub mod run_statuses {
    pub const COMPLETED: &str = "COMPLETED";
}

/// One test outcome as posted by the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordedResult {
    #[serde(default)]
    pub method_name: String,
    pub test_method_name: String,
    pub display_name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub duration_ms: i64,
    pub error_message: Option<String>,
    pub stack_trace: Option<String>,
}

/// A row from the `test_runs` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TestRun {
    pub id: DbId,
    pub client_id: DbId,
    pub service_name: String,
    pub test_suite: String,
    pub run_type: String,
    pub environment: String,
    pub status: String,
    pub total_tests: i32,
    pub passed_count: i32,
    pub failed_count: i32,
    pub skipped_count: i32,
    pub total_duration_ms: i64,
    pub results: Json<Vec<RecordedResult>>,
    pub run_by_user_id: DbId,
    pub run_by: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TenantEntity for TestRun {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }

    fn client_id(&self) -> DbId {
        self.client_id
    }
}

/// A row from the `latest_test_results` table. One row per
/// (tenant, service, suite, test).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct LatestTestResult {
    pub id: DbId,
    pub client_id: DbId,
    pub service_name: String,
    pub test_suite: String,
    pub test_method_name: String,
    pub method_name: String,
    pub status: String,
    pub duration_ms: i64,
    pub error_message: Option<String>,
    pub stack_trace: Option<String>,
    pub test_run_id: DbId,
    pub run_by_user_id: DbId,
    pub run_by: String,
    pub last_run_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TenantEntity for LatestTestResult {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }

    fn client_id(&self) -> DbId {
        self.client_id
    }

    fn touch(&mut self, _actor: &str, now: Timestamp) {
        self.updated_at = now;
    }
}

/// Body of `POST /qa/test-runs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestRunRequest {
    pub service_name: Option<String>,
    pub run_type: Option<String>,
    pub environment: Option<String>,
    #[serde(default)]
    pub results: Vec<RecordedResult>,
}

impl TestRunRequest {
    /// Returns the trimmed service name.
    pub fn validate(&self) -> CoreResult<String> {
        let name = self
            .service_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::validation(msg::SERVICE_NAME_REQUIRED))?;
        if self.results.is_empty() {
            return Err(CoreError::validation(msg::RESULTS_REQUIRED));
        }
        Ok(name.to_string())
    }
}

/// Who recorded a run, and when.
#[derive(Debug, Clone, Copy)]
pub struct RunAuthor<'a> {
    pub client_id: DbId,
    pub user_id: DbId,
    pub login_name: &'a str,
    pub at: Timestamp,
}

impl TestRun {
    /// A completed run holding `req`'s results, with its counters filled in.
    pub fn completed(service_name: String, test_suite: String, req: TestRunRequest, by: RunAuthor<'_>) -> Self {
        let count = |status: &str| {
            req.results
                .iter()
                .filter(|r| r.status.eq_ignore_ascii_case(status))
                .count() as i32
        };
        let passed_count = count(result_statuses::PASSED);
        let failed_count = count(result_statuses::FAILED);
        let skipped_count = count(result_statuses::SKIPPED);
        let total_duration_ms = req.results.iter().map(|r| r.duration_ms.max(0)).sum();
        let non_blank = |v: Option<String>, default: &str| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            id: 0,
            client_id: by.client_id,
            service_name,
            test_suite,
            run_type: non_blank(req.run_type, DEFAULT_RUN_TYPE),
            environment: non_blank(req.environment, DEFAULT_ENVIRONMENT),
            status: run_statuses::COMPLETED.to_string(),
            total_tests: req.results.len() as i32,
            passed_count,
            failed_count,
            skipped_count,
            total_duration_ms,
            results: Json(req.results),
            run_by_user_id: by.user_id,
            run_by: by.login_name.to_string(),
            started_at: by.at,
            completed_at: Some(by.at),
            created_at: by.at,
            updated_at: by.at,
        }
    }
}

impl LatestTestResult {
    pub fn from_run(run: &TestRun, result: &RecordedResult) -> Self {
        Self {
            id: 0,
            client_id: run.client_id,
            service_name: run.service_name.clone(),
            test_suite: run.test_suite.clone(),
            test_method_name: result.test_method_name.trim().to_string(),
            method_name: String::new(),
            status: String::new(),
            duration_ms: 0,
            error_message: None,
            stack_trace: None,
            test_run_id: run.id,
            run_by_user_id: run.run_by_user_id,
            run_by: run.run_by.clone(),
            last_run_at: run.started_at,
            created_at: run.started_at,
            updated_at: run.started_at,
        }
        .refreshed(run, result)
    }

    /// Overwrite the outcome with `result` from `run`.
    pub fn refreshed(mut self, run: &TestRun, result: &RecordedResult) -> Self {
        self.method_name = result.method_name.trim().to_string();
        self.status = result.status.trim().to_uppercase();
        self.duration_ms = result.duration_ms.max(0);
        self.error_message = result.error_message.clone();
        self.stack_trace = result.stack_trace.clone();
        self.test_run_id = run.id;
        self.run_by_user_id = run.run_by_user_id;
        self.run_by = run.run_by.clone();
        self.last_run_at = run.started_at;
        self.updated_at = run.started_at;
        self
    }

    /// Whether this row records the same test as `result` in `run`.
    pub fn same_test(&self, run: &TestRun, result: &RecordedResult) -> bool {
        self.service_name == run.service_name
            && self.test_suite == run.test_suite
            && self.test_method_name == result.test_method_name.trim()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn result(name: &str, status: &str, ms: i64) -> RecordedResult {
        RecordedResult {
            method_name: "create".into(),
            test_method_name: name.into(),
            status: status.into(),
            duration_ms: ms,
            ..Default::default()
        }
    }

    fn author() -> RunAuthor<'static> {
        RunAuthor {
            client_id: 1,
            user_id: 2,
            login_name: "qa-bot",
            at: Utc::now(),
        }
    }

    #[test]
    fn test_request_needs_service_and_results() {
        let req = TestRunRequest::default();
        assert_matches!(req.validate(), Err(CoreError::Validation(m)) if m == msg::SERVICE_NAME_REQUIRED);

        let req = TestRunRequest {
            service_name: Some("LeadService".into()),
            ..Default::default()
        };
        assert_matches!(req.validate(), Err(CoreError::Validation(m)) if m == msg::RESULTS_REQUIRED);
    }

    #[test]
    fn test_completed_run_counts_outcomes_and_defaults() {
        let req = TestRunRequest {
            service_name: Some("LeadService".into()),
            run_type: Some("  ".into()),
            results: vec![
                result("creates_lead", "PASSED", 12),
                result("rejects_blank_email", "failed", 8),
                result("skips_import", "SKIPPED", 0),
            ],
            ..Default::default()
        };

        let run = TestRun::completed("LeadService".into(), "lead_tests".into(), req, author());

        assert_eq!(run.total_tests, 3);
        assert_eq!((run.passed_count, run.failed_count, run.skipped_count), (1, 1, 1));
        assert_eq!(run.total_duration_ms, 20);
        assert_eq!(run.run_type, DEFAULT_RUN_TYPE);
        assert_eq!(run.environment, DEFAULT_ENVIRONMENT);
        assert_eq!(run.status, run_statuses::COMPLETED);
    }
}
