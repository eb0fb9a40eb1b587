//! Test execution records, request scope and progress projection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::messages::qa as msg;
use crate::types::Timestamp;

/// Base duration assumed for any run before per-test time is added.
const EXPECTED_BASE_MS: i64 = 2000;
/// Assumed duration of a single test.
const EXPECTED_PER_TEST_MS: i64 = 400;
/// The time-based estimate never claims more than this share of the run.
const MAX_ESTIMATED_RATIO: f64 = 0.95;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of `POST /qa/executions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestExecutionRequest {
    #[serde(default)]
    pub run_all: bool,
    #[serde(default)]
    pub test_names: Vec<String>,
    pub test_target: Option<String>,
    pub method_name: Option<String>,
    pub service_name: Option<String>,
}

/// Which tests a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestScope {
    All,
    Named { target: String, names: Vec<String> },
    Method { prefix: String, method: String },
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TestExecutionRequest {
    /// Resolve the request to a scope. `run_all` wins over everything else.
    pub fn scope(&self) -> CoreResult<TestScope> {
        if self.run_all {
            return Ok(TestScope::All);
        }

        let names: Vec<String> = self
            .test_names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            let target = non_blank(&self.test_target)
                .ok_or_else(|| CoreError::validation(msg::TEST_TARGET_REQUIRED))?;
            return Ok(TestScope::Named {
                target: target.to_string(),
                names,
            });
        }

        if let Some(method) = non_blank(&self.method_name) {
            let prefix = non_blank(&self.test_target)
                .or_else(|| non_blank(&self.service_name))
                .ok_or_else(|| CoreError::validation(msg::SERVICE_OR_TARGET_REQUIRED))?;
            return Ok(TestScope::Method {
                prefix: prefix.to_string(),
                method: method.to_string(),
            });
        }

        Err(CoreError::validation(msg::SCOPE_REQUIRED))
    }
}

impl TestScope {
    /// Name filters handed to the test harness. Empty means every test.
    pub fn filters(&self) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Named { target, names } => {
                names.iter().map(|n| format!("{target}::{n}")).collect()
            }
            Self::Method { prefix, method } => vec![format!("{prefix}::{method}")],
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    CompletedWithFailures,
    Failed,
}

impl ExecutionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedWithFailures | Self::Failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestOutcome {
    Passed,
    Failed,
    Skipped,
}

/// Result of one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_name: String,
    pub outcome: TestOutcome,
}

/// State of one asynchronous test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestExecution {
    pub execution_id: Uuid,
    pub status: ExecutionStatus,
    pub filters: Vec<String>,
    pub total_tests: u32,
    pub completed_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
    pub skipped_tests: u32,
    pub progress_percentage: u8,
    pub results: Vec<TestResult>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub duration_ms: Option<i64>,
}

impl TestExecution {
    pub fn pending(filters: Vec<String>, now: Timestamp) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            filters,
            total_tests: 0,
            completed_tests: 0,
            passed_tests: 0,
            failed_tests: 0,
            skipped_tests: 0,
            progress_percentage: 0,
            results: Vec::new(),
            error_message: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            duration_ms: None,
        }
    }

    /// Count one finished test. The total grows if the harness under-announced.
    pub fn record(&mut self, result: TestResult) {
        match result.outcome {
            TestOutcome::Passed => self.passed_tests += 1,
            TestOutcome::Failed => self.failed_tests += 1,
            TestOutcome::Skipped => self.skipped_tests += 1,
        }
        self.completed_tests += 1;
        self.total_tests = self.total_tests.max(self.completed_tests);
        self.results.push(result);
    }

    /// Copy of the record as reported to clients at `now`.
    ///
    /// While running, completed counts are smoothed with a time-based
    /// estimate so the progress bar keeps moving between test binaries, but
    /// never reach the total until the run actually ends.
    pub fn snapshot(&self, now: Timestamp) -> Self {
        let mut snapshot = self.clone();
        if self.status == ExecutionStatus::Running
            && self.total_tests > 0
            && self.completed_tests < self.total_tests
        {
            if let Some(started_at) = self.started_at {
                let elapsed_ms = (now - started_at).num_milliseconds().max(0);
                snapshot.completed_tests =
                    projected_completed(self.total_tests, self.completed_tests, elapsed_ms);
                snapshot.duration_ms = Some(elapsed_ms);
            }
        }
        snapshot.progress_percentage = progress_percentage(
            snapshot.status,
            snapshot.completed_tests,
            snapshot.total_tests,
        );
        snapshot
    }
}

/// Completed count shown while a run with `total` tests is in flight.
pub fn projected_completed(total: u32, actual: u32, elapsed_ms: i64) -> u32 {
    let max_while_running = total.saturating_sub(1);
    let expected_ms = EXPECTED_BASE_MS + i64::from(total) * EXPECTED_PER_TEST_MS;
    let ratio = (elapsed_ms as f64 / expected_ms as f64).min(MAX_ESTIMATED_RATIO);
    let estimated = ((ratio * f64::from(total)).floor().max(0.0) as u32).min(max_while_running);
    actual.min(max_while_running).max(estimated)
}

/// Percentage complete; only a finished run reports 100.
pub fn progress_percentage(status: ExecutionStatus, completed: u32, total: u32) -> u8 {
    if status.is_terminal() {
        return 100;
    }
    if total == 0 {
        return 0;
    }
    let pct = u64::from(completed) * 100 / u64::from(total);
    pct.min(99) as u8
}
