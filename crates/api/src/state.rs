use std::sync::Arc;

use bizhub_core::integrations::{EmailScheduler, ShippingProvider};
use bizhub_core::qa::{ExecutionTracker, TestRunner};
use bizhub_db::{DbPool, Stores};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Stores and outbound integrations used by the services.
    pub services: Services,
    /// Connection pool behind the stores; `None` when running on in-memory stores.
    pub pool: Option<DbPool>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Registry of asynchronous test executions.
    pub qa_tracker: ExecutionTracker,
    /// Runner handed to each new test execution.
    pub qa_runner: Arc<dyn TestRunner>,
}

/// Everything a service call needs besides the caller.
#[derive(Clone)]
pub struct Services {
    pub stores: Stores,
    pub email: Arc<dyn EmailScheduler>,
    pub shipping: Arc<dyn ShippingProvider>,
}
