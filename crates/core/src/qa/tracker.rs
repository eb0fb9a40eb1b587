//! In-memory registry of test executions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::execution::{ExecutionStatus, TestExecution, TestExecutionRequest};
use super::runner::{RunOutcome, TestEvent, TestRunError, TestRunner};
use crate::error::{CoreError, CoreResult};
use crate::messages::qa as msg;
use crate::types::Timestamp;

/// How long a finished execution stays queryable by default.
pub const DEFAULT_RETENTION_MINUTES: i64 = 60;

/// Shared, cloneable handle to every known execution.
///
/// Records are replaced wholesale on each change, so readers always see a
/// consistent copy. Finished records are dropped once they are older than
/// the retention window; running ones are never dropped.
#[derive(Clone)]
pub struct ExecutionTracker {
    executions: Arc<RwLock<HashMap<Uuid, TestExecution>>>,
    retention: Duration,
}

impl Default for ExecutionTracker {
    fn default() -> Self {
        Self::with_retention(Duration::minutes(DEFAULT_RETENTION_MINUTES))
    }
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            executions: Arc::default(),
            retention,
        }
    }

    /// Validate the request, register a PENDING record and run the tests in
    /// the background. Returns the record as first stored.
    pub async fn start(
        &self,
        request: &TestExecutionRequest,
        runner: Arc<dyn TestRunner>,
    ) -> CoreResult<TestExecution> {
        let scope = request.scope()?;
        let now = Utc::now();
        let record = TestExecution::pending(scope.filters(), now);
        let id = record.execution_id;
        {
            let mut executions = self.executions.write().await;
            evict_finished(&mut executions, now - self.retention);
            executions.insert(id, record.clone());
        }

        tracing::info!(execution_id = %id, filters = ?record.filters, "Test execution queued");

        let tracker = self.clone();
        tokio::spawn(async move {
            tracker.execute(id, runner).await;
        });

        Ok(record)
    }

    /// Current state of an execution with running progress projected to now.
    pub async fn get(&self, id: Uuid) -> CoreResult<TestExecution> {
        let executions = self.executions.read().await;
        executions
            .get(&id)
            .map(|record| record.snapshot(Utc::now()))
            .ok_or_else(|| CoreError::not_found(format!("{}{id}", msg::EXECUTION_NOT_FOUND_PREFIX)))
    }

    async fn execute(&self, id: Uuid, runner: Arc<dyn TestRunner>) {
        let filters = match self
            .update(id, |r| {
                r.status = ExecutionStatus::Running;
                r.started_at = Some(Utc::now());
            })
            .await
        {
            Some(record) => record.filters,
            None => return,
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let progress = {
            let tracker = self.clone();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    tracker.apply_event(id, event).await;
                }
            })
        };

        let result = runner.run(&filters, tx).await;
        // The sender is gone once `run` returns, so this drains and ends.
        let _ = progress.await;

        self.finish(id, result).await;
    }

    async fn apply_event(&self, id: Uuid, event: TestEvent) {
        self.update(id, |r| match event {
            TestEvent::Planned(count) => r.total_tests += count,
            TestEvent::Finished(result) => r.record(result),
        })
        .await;
    }

    async fn finish(&self, id: Uuid, result: Result<RunOutcome, TestRunError>) {
        let record = self
            .update(id, |r| {
                let now = Utc::now();
                r.completed_at = Some(now);
                r.duration_ms = r.started_at.map(|s| (now - s).num_milliseconds());
                match result {
                    Ok(outcome) if outcome.exit_code == 0 => {
                        r.status = ExecutionStatus::Completed;
                    }
                    Ok(outcome) if !r.results.is_empty() => {
                        r.status = ExecutionStatus::CompletedWithFailures;
                        if r.failed_tests == 0 {
                            r.error_message =
                                Some(format!("{}{}", msg::EXIT_CODE_PREFIX, outcome.exit_code));
                        }
                    }
                    Ok(outcome) => {
                        r.status = ExecutionStatus::Failed;
                        let tail = outcome.stderr_tail.trim();
                        r.error_message = Some(if tail.is_empty() {
                            format!("{}{}", msg::EXIT_CODE_PREFIX, outcome.exit_code)
                        } else {
                            tail.to_string()
                        });
                    }
                    Err(e) => {
                        r.status = ExecutionStatus::Failed;
                        r.error_message = Some(e.to_string());
                    }
                }
            })
            .await;

        if let Some(r) = record {
            tracing::info!(
                execution_id = %id,
                status = ?r.status,
                passed = r.passed_tests,
                failed = r.failed_tests,
                skipped = r.skipped_tests,
                "Test execution finished",
            );
        }
    }

    /// Apply `change` to a copy of the record and store the copy.
    async fn update<F>(&self, id: Uuid, change: F) -> Option<TestExecution>
    where
        F: FnOnce(&mut TestExecution),
    {
        let mut executions = self.executions.write().await;
        let mut record = executions.get(&id)?.clone();
        change(&mut record);
        executions.insert(id, record.clone());
        Some(record)
    }
}

/// Drop terminal records that completed at or before `cutoff`.
fn evict_finished(executions: &mut HashMap<Uuid, TestExecution>, cutoff: Timestamp) {
    let before = executions.len();
    executions.retain(|_, r| {
        !(r.status.is_terminal() && r.completed_at.is_some_and(|done| done <= cutoff))
    });
    let evicted = before - executions.len();
    if evicted > 0 {
        tracing::debug!(evicted, "Expired test executions dropped");
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use tokio::sync::mpsc::UnboundedSender;

    use super::*;
    use crate::qa::execution::{TestOutcome, TestResult};

    /// Emits a fixed event list and exits with `exit_code`.
    struct ScriptedRunner {
        events: Vec<TestEvent>,
        exit_code: i32,
    }

    #[async_trait]
    impl TestRunner for ScriptedRunner {
        async fn run(
            &self,
            _filters: &[String],
            events: UnboundedSender<TestEvent>,
        ) -> Result<RunOutcome, TestRunError> {
            for event in &self.events {
                let _ = events.send(event.clone());
            }
            Ok(RunOutcome {
                exit_code: self.exit_code,
                stderr_tail: "error: could not compile".into(),
                duration_ms: 1,
            })
        }
    }

    struct BrokenRunner;

    #[async_trait]
    impl TestRunner for BrokenRunner {
        async fn run(
            &self,
            _filters: &[String],
            _events: UnboundedSender<TestEvent>,
        ) -> Result<RunOutcome, TestRunError> {
            Err(TestRunError::Spawn(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "cargo",
            )))
        }
    }

    fn finished(name: &str, outcome: TestOutcome) -> TestEvent {
        TestEvent::Finished(TestResult {
            test_name: name.into(),
            outcome,
        })
    }

    fn run_all() -> TestExecutionRequest {
        TestExecutionRequest {
            run_all: true,
            ..Default::default()
        }
    }

    async fn wait_for_terminal(tracker: &ExecutionTracker, id: Uuid) -> TestExecution {
        for _ in 0..100 {
            let record = tracker.get(id).await.unwrap();
            if record.status.is_terminal() {
                return record;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("execution {id} did not finish");
    }

    #[tokio::test]
    async fn test_start_returns_pending_record() {
        let tracker = ExecutionTracker::new();
        let runner = Arc::new(ScriptedRunner {
            events: vec![],
            exit_code: 0,
        });
        let record = tracker.start(&run_all(), runner).await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Pending);
        assert!(tracker.get(record.execution_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_successful_run_completes() {
        let tracker = ExecutionTracker::new();
        let runner = Arc::new(ScriptedRunner {
            events: vec![
                TestEvent::Planned(2),
                finished("a", TestOutcome::Passed),
                finished("b", TestOutcome::Skipped),
            ],
            exit_code: 0,
        });
        let record = tracker.start(&run_all(), runner).await.unwrap();
        let done = wait_for_terminal(&tracker, record.execution_id).await;

        assert_eq!(done.status, ExecutionStatus::Completed);
        assert_eq!(done.total_tests, 2);
        assert_eq!((done.passed_tests, done.skipped_tests), (1, 1));
        assert_eq!(done.progress_percentage, 100);
    }

    #[tokio::test]
    async fn test_failures_complete_with_failures() {
        let tracker = ExecutionTracker::new();
        let runner = Arc::new(ScriptedRunner {
            events: vec![TestEvent::Planned(1), finished("a", TestOutcome::Failed)],
            exit_code: 101,
        });
        let record = tracker.start(&run_all(), runner).await.unwrap();
        let done = wait_for_terminal(&tracker, record.execution_id).await;
        assert_eq!(done.status, ExecutionStatus::CompletedWithFailures);
        assert_eq!(done.failed_tests, 1);
    }

    #[tokio::test]
    async fn test_no_results_and_nonzero_exit_fails_with_stderr() {
        let tracker = ExecutionTracker::new();
        let runner = Arc::new(ScriptedRunner {
            events: vec![],
            exit_code: 101,
        });
        let record = tracker.start(&run_all(), runner).await.unwrap();
        let done = wait_for_terminal(&tracker, record.execution_id).await;
        assert_eq!(done.status, ExecutionStatus::Failed);
        assert_eq!(done.error_message.as_deref(), Some("error: could not compile"));
    }

    #[tokio::test]
    async fn test_spawn_error_fails() {
        let tracker = ExecutionTracker::new();
        let record = tracker.start(&run_all(), Arc::new(BrokenRunner)).await.unwrap();
        let done = wait_for_terminal(&tracker, record.execution_id).await;
        assert_eq!(done.status, ExecutionStatus::Failed);
        assert!(done.error_message.unwrap().starts_with("Failed to start test command"));
    }

    #[tokio::test]
    async fn test_unknown_execution_is_not_found() {
        let tracker = ExecutionTracker::new();
        let id = Uuid::new_v4();
        assert_matches!(
            tracker.get(id).await,
            Err(CoreError::NotFound(m)) if m == format!("Test execution not found: {id}")
        );
    }

    #[tokio::test]
    async fn test_finished_runs_expire_after_retention() {
        let tracker = ExecutionTracker::with_retention(Duration::zero());
        let quick = || {
            Arc::new(ScriptedRunner {
                events: vec![],
                exit_code: 0,
            })
        };
        let first = tracker.start(&run_all(), quick()).await.unwrap();
        wait_for_terminal(&tracker, first.execution_id).await;

        let second = tracker.start(&run_all(), quick()).await.unwrap();

        assert_matches!(
            tracker.get(first.execution_id).await,
            Err(CoreError::NotFound(_))
        );
        assert!(tracker.get(second.execution_id).await.is_ok());
    }

    #[test]
    fn test_unfinished_runs_are_kept() {
        let now = Utc::now();
        let running = TestExecution::pending(Vec::new(), now - Duration::days(2));
        let mut done = TestExecution::pending(Vec::new(), now - Duration::days(2));
        done.status = ExecutionStatus::Completed;
        done.completed_at = Some(now - Duration::days(1));
        let mut executions = HashMap::from([
            (running.execution_id, running.clone()),
            (done.execution_id, done.clone()),
        ]);

        evict_finished(&mut executions, now - Duration::hours(1));

        assert!(executions.contains_key(&running.execution_id));
        assert!(!executions.contains_key(&done.execution_id));
    }

    #[tokio::test]
    async fn test_invalid_scope_is_rejected_before_storing() {
        let tracker = ExecutionTracker::new();
        let result = tracker
            .start(&TestExecutionRequest::default(), Arc::new(BrokenRunner))
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert!(tracker.executions.read().await.is_empty());
    }
}
