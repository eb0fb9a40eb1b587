//! Table mappings for `test_runs` and `latest_test_results`.

use super::{PgRecord, RecordQuery};
use crate::models::test_run::{LatestTestResult, TestRun};

impl PgRecord for TestRun {
    const TABLE: &'static str = "test_runs";
    const SOFT_DELETE: bool = false;
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "service_name",
        "test_suite",
        "run_type",
        "environment",
        "status",
        "total_tests",
        "passed_count",
        "failed_count",
        "skipped_count",
        "total_duration_ms",
        "results",
        "run_by_user_id",
        "run_by",
        "started_at",
        "completed_at",
        "created_at",
        "updated_at",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.service_name)
            .bind(&self.test_suite)
            .bind(&self.run_type)
            .bind(&self.environment)
            .bind(&self.status)
            .bind(self.total_tests)
            .bind(self.passed_count)
            .bind(self.failed_count)
            .bind(self.skipped_count)
            .bind(self.total_duration_ms)
            .bind(&self.results)
            .bind(self.run_by_user_id)
            .bind(&self.run_by)
            .bind(self.started_at)
            .bind(self.completed_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}

impl PgRecord for LatestTestResult {
    const TABLE: &'static str = "latest_test_results";
    const SOFT_DELETE: bool = false;
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "service_name",
        "test_suite",
        "test_method_name",
        "method_name",
        "status",
        "duration_ms",
        "error_message",
        "stack_trace",
        "test_run_id",
        "run_by_user_id",
        "run_by",
        "last_run_at",
        "created_at",
        "updated_at",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.service_name)
            .bind(&self.test_suite)
            .bind(&self.test_method_name)
            .bind(&self.method_name)
            .bind(&self.status)
            .bind(self.duration_ms)
            .bind(&self.error_message)
            .bind(&self.stack_trace)
            .bind(self.test_run_id)
            .bind(self.run_by_user_id)
            .bind(&self.run_by)
            .bind(self.last_run_at)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
