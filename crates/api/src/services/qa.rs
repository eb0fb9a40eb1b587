//! QA dashboard: test executions, recorded runs and coverage.
//!
//! Executions live in the process-wide tracker and are neither persisted
//! nor audited. Recorded runs are tenant data: each run is stored whole and
//! every result in it replaces the latest result of the same test.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use bizhub_core::pagination::{PageQuery, Predicate};
use bizhub_core::qa::catalog::{self, ServiceEntry};
use bizhub_core::qa::{ExecutionTracker, TestExecution, TestExecutionRequest, TestRunner};
use bizhub_db::models::test_run::{LatestTestResult, RunAuthor, TestRun, TestRunRequest};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

pub async fn start(
    tracker: &ExecutionTracker,
    runner: Arc<dyn TestRunner>,
    user: &AuthUser,
    req: &TestExecutionRequest,
) -> AppResult<TestExecution> {
    let execution = tracker.start(req, runner).await?;
    tracing::info!(
        execution_id = %execution.execution_id,
        requested_by = user.actor(),
        "Test execution started"
    );
    Ok(execution)
}

pub async fn get(tracker: &ExecutionTracker, id: Uuid) -> AppResult<TestExecution> {
    Ok(tracker.get(id).await?)
}

// ---------------------------------------------------------------------------
// Recorded runs
// ---------------------------------------------------------------------------

/// Store a finished run and refresh the latest result of every test in it.
pub async fn save_test_run(svc: &Services, user: &AuthUser, req: TestRunRequest) -> AppResult<TestRun> {
    let service_name = catalog::normalize_service_name(&req.validate()?);
    let test_suite = catalog::find_service(&service_name)
        .map(|s| s.test_suite.to_string())
        .unwrap_or_else(|| format!("{service_name}Test"));

    let author = RunAuthor {
        client_id: user.client_id(),
        user_id: user.user_id(),
        login_name: user.actor(),
        at: Utc::now(),
    };
    let run = TestRun::completed(service_name, test_suite, req, author);
    let run = svc.stores.test_runs.insert(&run).await?;

    let store = svc.stores.latest_test_results.as_ref();
    let query = PageQuery::matching(vec![
        Predicate::text_equals("service_name", run.service_name.clone()),
        Predicate::text_equals("test_suite", run.test_suite.clone()),
    ]);
    let mut known = store.page(user.client_id(), &query).await?.data;
    for result in run.results.iter() {
        match known.iter().position(|row| row.same_test(&run, result)) {
            Some(at) => {
                let row = known[at].clone().refreshed(&run, result);
                known[at] = store.save(&row).await?;
            }
            None => known.push(store.insert(&LatestTestResult::from_run(&run, result)).await?),
        }
    }

    tracing::info!(
        run_id = run.id,
        client_id = user.client_id(),
        service = %run.service_name,
        total = run.total_tests,
        failed = run.failed_count,
        "Test run recorded"
    );
    Ok(run)
}

/// Latest results of the tenant, optionally of one service, ordered by
/// service and then test name.
pub async fn latest_results(
    svc: &Services,
    user: &AuthUser,
    service: Option<&str>,
) -> AppResult<Vec<LatestTestResult>> {
    let predicates = service
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| vec![Predicate::text_equals("service_name", catalog::normalize_service_name(s))])
        .unwrap_or_default();
    let mut rows = svc
        .stores
        .latest_test_results
        .page(user.client_id(), &PageQuery::matching(predicates))
        .await?
        .data;
    rows.sort_by(|a, b| {
        a.service_name
            .cmp(&b.service_name)
            .then_with(|| a.test_method_name.cmp(&b.test_method_name))
    });
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCoverage {
    pub service_name: String,
    pub total_methods: usize,
    pub covered_methods: usize,
    pub total_tests: usize,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_services: usize,
    pub total_methods: usize,
    pub total_methods_with_coverage: usize,
    pub total_tests: usize,
    pub overall_coverage_percentage: f64,
    pub service_breakdown: Vec<ServiceCoverage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodStatus {
    pub method_name: String,
    pub api_route: String,
    pub covered: bool,
    pub latest_results: Vec<LatestTestResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub service_name: String,
    pub base_path: String,
    pub methods: Vec<MethodStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub services: Vec<ServiceStatus>,
    pub coverage: CoverageSummary,
    pub available_services: Vec<&'static str>,
}

/// Names of the services the dashboard reports on.
pub fn available_services() -> Vec<&'static str> {
    catalog::service_names()
}

fn by_service(rows: Vec<LatestTestResult>) -> BTreeMap<String, Vec<LatestTestResult>> {
    let mut grouped: BTreeMap<String, Vec<LatestTestResult>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.service_name.clone()).or_default().push(row);
    }
    grouped
}

fn service_coverage(entry: &ServiceEntry, results: &[LatestTestResult]) -> ServiceCoverage {
    let named: HashSet<&str> = results.iter().map(|r| r.method_name.as_str()).collect();
    let covered_methods = entry.methods.iter().filter(|m| named.contains(*m)).count();
    ServiceCoverage {
        service_name: entry.name.to_string(),
        total_methods: entry.methods.len(),
        covered_methods,
        total_tests: results.len(),
        coverage_percentage: catalog::coverage_percentage(covered_methods, entry.methods.len()),
    }
}

fn summarize(grouped: &BTreeMap<String, Vec<LatestTestResult>>) -> CoverageSummary {
    let service_breakdown: Vec<ServiceCoverage> = catalog::SERVICES
        .iter()
        .map(|entry| service_coverage(entry, grouped.get(entry.name).map_or(&[][..], Vec::as_slice)))
        .collect();
    let total_methods = service_breakdown.iter().map(|s| s.total_methods).sum();
    let covered = service_breakdown.iter().map(|s| s.covered_methods).sum();
    CoverageSummary {
        total_services: service_breakdown.len(),
        total_methods,
        total_methods_with_coverage: covered,
        total_tests: service_breakdown.iter().map(|s| s.total_tests).sum(),
        overall_coverage_percentage: catalog::coverage_percentage(covered, total_methods),
        service_breakdown,
    }
}

pub async fn coverage(svc: &Services, user: &AuthUser) -> AppResult<CoverageSummary> {
    let rows = latest_results(svc, user, None).await?;
    Ok(summarize(&by_service(rows)))
}

/// Every catalogued service with its operations and their latest results.
pub async fn dashboard(svc: &Services, user: &AuthUser) -> AppResult<Dashboard> {
    let grouped = by_service(latest_results(svc, user, None).await?);
    let services = catalog::SERVICES
        .iter()
        .map(|entry| {
            let results = grouped.get(entry.name).map_or(&[][..], Vec::as_slice);
            let methods = entry
                .methods
                .iter()
                .map(|&method| {
                    let latest_results: Vec<_> =
                        results.iter().filter(|r| r.method_name == method).cloned().collect();
                    MethodStatus {
                        method_name: method.to_string(),
                        api_route: entry.api_route(method),
                        covered: !latest_results.is_empty(),
                        latest_results,
                    }
                })
                .collect();
            ServiceStatus {
                service_name: entry.name.to_string(),
                base_path: entry.base_path.to_string(),
                methods,
            }
        })
        .collect();

    Ok(Dashboard {
        services,
        coverage: summarize(&grouped),
        available_services: available_services(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use bizhub_core::error::CoreError;
    use bizhub_core::messages::qa as msg;
    use bizhub_core::qa::{ExecutionStatus, RunOutcome, TestEvent, TestRunError};
    use tokio::sync::mpsc::UnboundedSender;

    use bizhub_db::models::test_run::{result_statuses, RecordedResult};

    use super::*;
    use crate::services::test_support::{caller, Harness};

    struct IdleRunner;

    #[async_trait]
    impl TestRunner for IdleRunner {
        async fn run(
            &self,
            _filters: &[String],
            _events: UnboundedSender<TestEvent>,
        ) -> Result<RunOutcome, TestRunError> {
            Ok(RunOutcome {
                exit_code: 0,
                stderr_tail: String::new(),
                duration_ms: 0,
            })
        }
    }

    #[tokio::test]
    async fn test_start_then_poll() {
        let tracker = ExecutionTracker::new();
        let req = TestExecutionRequest {
            test_names: vec!["test_create".into()],
            test_target: Some("services::promo".into()),
            ..Default::default()
        };

        let started = start(&tracker, Arc::new(IdleRunner), &caller(1, 1, "qa"), &req)
            .await
            .unwrap();
        assert_eq!(started.status, ExecutionStatus::Pending);
        assert_eq!(started.filters, vec!["services::promo::test_create"]);

        let polled = get(&tracker, started.execution_id).await.unwrap();
        assert_eq!(polled.execution_id, started.execution_id);
    }

    #[tokio::test]
    async fn test_unknown_execution() {
        let tracker = ExecutionTracker::new();
        let id = Uuid::new_v4();

        let err = get(&tracker, id).await.unwrap_err();

        assert_matches!(
            err.as_core(),
            Some(CoreError::NotFound(m)) if m == &format!("{}{id}", msg::EXECUTION_NOT_FOUND_PREFIX)
        );
    }

    fn result(method: &str, test: &str, status: &str) -> RecordedResult {
        RecordedResult {
            method_name: method.into(),
            test_method_name: test.into(),
            status: status.into(),
            duration_ms: 5,
            ..Default::default()
        }
    }

    fn run_of(service: &str, results: Vec<RecordedResult>) -> TestRunRequest {
        TestRunRequest {
            service_name: Some(service.into()),
            results,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_run_resolves_catalog_suite() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;

        let run = save_test_run(&h.svc, &me, run_of("Lead", vec![result("create", "test_create", "PASSED")]))
            .await
            .unwrap();
        assert_eq!(run.service_name, "LeadService");
        assert_eq!(run.test_suite, "lead_tests");
        assert_eq!(run.run_by, me.actor());

        let run = save_test_run(&h.svc, &me, run_of("Warehouse", vec![result("load", "test_load", "PASSED")]))
            .await
            .unwrap();
        assert_eq!(run.test_suite, "WarehouseServiceTest");
        assert_eq!(h.mem.test_runs.all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_later_run_replaces_latest_result() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        save_test_run(
            &h.svc,
            &me,
            run_of(
                "LeadService",
                vec![
                    result("create", "test_create", "FAILED"),
                    result("get", "test_get", "PASSED"),
                ],
            ),
        )
        .await
        .unwrap();

        let second =
            save_test_run(&h.svc, &me, run_of("LeadService", vec![result("create", "test_create", "passed")]))
                .await
                .unwrap();

        let latest = latest_results(&h.svc, &me, Some("Lead")).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].test_method_name, "test_create");
        assert_eq!(latest[0].status, result_statuses::PASSED);
        assert_eq!(latest[0].test_run_id, second.id);
        assert_eq!(latest[1].test_method_name, "test_get");
    }

    #[tokio::test]
    async fn test_latest_results_are_per_tenant() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let other = h.tenant("Globex").await;
        save_test_run(&h.svc, &me, run_of("Promo", vec![result("create", "test_create", "PASSED")]))
            .await
            .unwrap();

        assert!(latest_results(&h.svc, &other, None).await.unwrap().is_empty());
        assert_eq!(latest_results(&h.svc, &me, Some("  ")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_coverage_counts_named_operations() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        save_test_run(
            &h.svc,
            &me,
            run_of(
                "ShipmentService",
                vec![
                    result("create", "test_create", "PASSED"),
                    result("create", "test_create_rejects_pending", "FAILED"),
                    result("cancel", "test_cancel", "PASSED"),
                ],
            ),
        )
        .await
        .unwrap();

        let summary = coverage(&h.svc, &me).await.unwrap();

        assert_eq!(summary.total_services, catalog::SERVICES.len());
        assert_eq!(summary.total_tests, 3);
        assert_eq!(summary.total_methods_with_coverage, 2);
        let shipments = summary
            .service_breakdown
            .iter()
            .find(|s| s.service_name == "ShipmentService")
            .unwrap();
        assert_eq!((shipments.covered_methods, shipments.total_methods), (2, 4));
        assert_eq!(shipments.coverage_percentage, 50.0);
        assert_eq!(
            summary.overall_coverage_percentage,
            catalog::coverage_percentage(2, summary.total_methods)
        );
    }

    #[tokio::test]
    async fn test_dashboard_lists_routes_and_results() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        save_test_run(&h.svc, &me, run_of("Payment", vec![result("get", "test_get", "PASSED")]))
            .await
            .unwrap();

        let board = dashboard(&h.svc, &me).await.unwrap();

        assert_eq!(board.services.len(), board.available_services.len());
        let payments = board.services.iter().find(|s| s.service_name == "PaymentService").unwrap();
        let get_op = payments.methods.iter().find(|m| m.method_name == "get").unwrap();
        assert!(get_op.covered);
        assert_eq!(get_op.api_route, "/api/v1/payments/get");
        assert_eq!(get_op.latest_results.len(), 1);
        assert!(payments.methods.iter().filter(|m| m.method_name != "get").all(|m| !m.covered));
        assert_eq!(board.coverage.total_tests, 1);
    }
}
