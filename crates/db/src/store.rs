//! Store traits every service depends on.
//!
//! All reads and writes are qualified by the caller's tenant key. A row that
//! exists under another tenant is indistinguishable from a missing one.

use async_trait::async_trait;
use bizhub_core::pagination::{PageQuery, PaginatedResponse};
use bizhub_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::models::message::Message;
use crate::models::user::User;

/// Store operations fail with the driver's error type; in-memory stores
/// report a missing row on save as [`sqlx::Error::RowNotFound`].
pub type StoreResult<T> = Result<T, sqlx::Error>;

/// A row owned by exactly one tenant.
pub trait TenantEntity: Clone + Serialize + Send + Sync + Unpin + 'static {
    fn id(&self) -> DbId;

    fn set_id(&mut self, id: DbId);

    fn client_id(&self) -> DbId;

    /// Rows without a soft-delete flag always report `false`.
    fn is_deleted(&self) -> bool {
        false
    }

    /// No-op for rows without a soft-delete flag.
    fn set_deleted(&mut self, _deleted: bool) {}

    /// Stamp `updated_at` and the modifying user.
    fn touch(&mut self, _actor: &str, _now: Timestamp) {}
}

#[async_trait]
pub trait TenantStore<E: TenantEntity>: Send + Sync {
    /// Live row by id.
    async fn find(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>>;

    /// Row by id, soft-deleted or not. Used by toggle to restore rows.
    async fn find_including_deleted(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>>;

    /// Live rows among `ids`. Unknown ids are skipped, so callers compare lengths.
    async fn find_many(&self, ids: &[DbId], client_id: DbId) -> StoreResult<Vec<E>>;

    /// Filtered page ordered by id descending, with the total match count.
    async fn page(&self, client_id: DbId, query: &PageQuery) -> StoreResult<PaginatedResponse<E>>;

    /// Insert a new row and return it with its assigned id.
    async fn insert(&self, entity: &E) -> StoreResult<E>;

    /// Overwrite an existing row of the same tenant.
    async fn save(&self, entity: &E) -> StoreResult<E>;

    /// Permanently remove a row. Returns whether anything was removed.
    async fn delete(&self, id: DbId, client_id: DbId) -> StoreResult<bool>;
}

/// Lookups that happen before a tenant is known.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// User by login name across all tenants, deleted users excluded.
    async fn find_by_login_name(&self, login_name: &str) -> StoreResult<Option<User>>;

    /// Live user by id across all tenants. Used by links that arrive without
    /// a session, such as email confirmation.
    async fn find_account(&self, user_id: DbId) -> StoreResult<Option<User>>;
}

/// Messages whose scheduled email must be handed to the scheduler again
/// after a restart.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Live email messages across all tenants that carry a batch id and a
    /// publish date after `now`, oldest publish date first.
    async fn pending_scheduled(&self, now: Timestamp) -> StoreResult<Vec<Message>>;
}
