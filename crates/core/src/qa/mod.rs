//! Asynchronous test execution for the QA dashboard.
//!
//! A client starts a run and polls for its state. The run itself executes in
//! a background task through a [`TestRunner`]; the [`ExecutionTracker`]
//! keeps the latest record of each run in memory.
//!
//! The dashboard side reports on the services listed in [`catalog`] and the
//! results clients record against them.

pub mod catalog;
pub mod execution;
pub mod runner;
pub mod tracker;

pub use catalog::{ServiceEntry, SERVICES};
pub use execution::{
    ExecutionStatus, TestExecution, TestExecutionRequest, TestOutcome, TestResult, TestScope,
};
pub use runner::{CommandTestRunner, RunOutcome, TestEvent, TestRunError, TestRunner};
pub use tracker::ExecutionTracker;
