//! Business operations behind the HTTP handlers.
//!
//! Every mutation runs the same sequence: validate the request, look the row
//! up under the caller's tenant, mutate, persist, then append a user-log
//! entry. The helpers below carry the steps that do not depend on the
//! entity; each submodule adds its own rules and side effects.
//!
//! Services only see [`Services`] (store trait objects plus the outbound
//! integrations), so their tests run over in-memory stores and fakes.

pub mod address;
pub mod client;
pub mod lead;
pub mod login;
pub mod message;
pub mod package;
pub mod payment;
pub mod pickup_location;
pub mod product;
pub mod product_review;
pub mod promo;
pub mod purchase_order;
pub mod qa;
pub mod shipment;
pub mod todo;
pub mod user;
pub mod user_group;
pub mod user_log;

#[cfg(test)]
pub(crate) mod test_support;

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::integrations::IntegrationError;
use bizhub_core::pagination::{ColumnSpec, PaginatedResponse, PaginationRequest};
use bizhub_core::types::DbId;
use bizhub_db::models::user_log::UserLog;
use bizhub_db::{TenantEntity, TenantStore};
use chrono::Utc;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::Services;

// ---------------------------------------------------------------------------
// Tenant-scoped lookup
// ---------------------------------------------------------------------------

/// Live row under the caller's tenant. A row of another tenant is reported
/// with the same `not_found` message as a missing one.
pub(crate) async fn find_live<E: TenantEntity>(
    store: &dyn TenantStore<E>,
    id: DbId,
    user: &AuthUser,
    not_found: &str,
) -> AppResult<E> {
    store
        .find(id, user.client_id())
        .await?
        .ok_or_else(|| CoreError::not_found(not_found).into())
}

/// Like [`find_live`], but soft-deleted rows are returned too.
pub(crate) async fn find_any<E: TenantEntity>(
    store: &dyn TenantStore<E>,
    id: DbId,
    user: &AuthUser,
    not_found: &str,
) -> AppResult<E> {
    store
        .find_including_deleted(id, user.client_id())
        .await?
        .ok_or_else(|| CoreError::not_found(not_found).into())
}

/// Validate a page request against `columns` and run it for the caller's tenant.
pub(crate) async fn page<E: TenantEntity>(
    store: &dyn TenantStore<E>,
    user: &AuthUser,
    request: &PaginationRequest,
    columns: &[ColumnSpec],
) -> AppResult<PaginatedResponse<E>> {
    let query = request.validate(columns)?;
    Ok(store.page(user.client_id(), &query).await?)
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Flip the soft-delete flag of a row, deleted or not, and audit it.
pub(crate) async fn toggle<E: TenantEntity>(
    svc: &Services,
    store: &dyn TenantStore<E>,
    user: &AuthUser,
    id: DbId,
    not_found: &str,
    toggled: &str,
) -> AppResult<E> {
    let mut row = find_any(store, id, user, not_found).await?;
    row.set_deleted(!row.is_deleted());
    row.touch(user.actor(), Utc::now());
    let saved = store.save(&row).await?;

    record(svc, user, action_types::TOGGLE, audit::describe(toggled, id)).await;
    Ok(saved)
}

// ---------------------------------------------------------------------------
// Bulk import
// ---------------------------------------------------------------------------

/// Outcome of a bulk import. Items are processed independently.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkResult {
    pub success_count: usize,
    pub failure_count: usize,
    pub errors: Vec<BulkError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkError {
    /// Position of the item in the submitted list.
    pub index: usize,
    /// Natural key of the failed item, when it has one.
    pub key: Option<String>,
    pub error: String,
}

impl BulkResult {
    pub(crate) fn succeeded(&mut self) {
        self.success_count += 1;
    }

    pub(crate) fn failed(&mut self, index: usize, key: Option<String>, err: AppError) {
        self.failure_count += 1;
        self.errors.push(BulkError {
            index,
            key,
            error: err.to_string(),
        });
    }

    /// Log the outcome and, when anything was inserted, write one audit entry.
    pub(crate) async fn finish(self, svc: &Services, user: &AuthUser, entity: &str, done: &str) -> Self {
        tracing::info!(
            client_id = user.client_id(),
            entity,
            succeeded = self.success_count,
            failed = self.failure_count,
            "Bulk import finished"
        );
        if self.success_count > 0 {
            let detail = format!("Inserted: {}, Failed: {}", self.success_count, self.failure_count);
            record(svc, user, action_types::BULK_INSERT, audit::describe_plain(done, &detail)).await;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Audit
// ---------------------------------------------------------------------------

/// Append a user-log entry for a mutation that already succeeded.
///
/// A failed write is reported and swallowed; the mutation stands.
pub(crate) async fn record(svc: &Services, user: &AuthUser, action: &str, description: String) {
    let entry = UserLog::new(
        user.client_id(),
        user.user_id(),
        action,
        description,
        &user.route,
        Utc::now(),
    );
    if let Err(e) = svc.stores.user_logs.insert(&entry).await {
        tracing::warn!(
            client_id = user.client_id(),
            user_id = user.user_id(),
            action,
            error = %e,
            "Failed to write user log"
        );
    }
}

// ---------------------------------------------------------------------------
// Integrations
// ---------------------------------------------------------------------------

/// Outbound provider failures reach the caller as client errors.
pub(crate) fn integration_failure(prefix: &str, err: IntegrationError) -> AppError {
    CoreError::validation(format!("{prefix}{err}")).into()
}

/// Display name the tenant sends email under, when it has one.
pub(crate) async fn sender_name(svc: &Services, client_id: DbId) -> AppResult<Option<String>> {
    let client = svc.stores.clients.find(client_id, client_id).await?;
    Ok(client
        .map(|c| c.sendgrid_sender_name)
        .filter(|name| !name.trim().is_empty()))
}
