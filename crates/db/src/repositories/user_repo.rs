//! Table mapping for `users`, plus the cross-tenant account lookups.

use async_trait::async_trait;
use bizhub_core::types::DbId;

use super::{PgRecord, PgStore, RecordQuery};
use crate::models::user::User;
use crate::store::{AccountStore, StoreResult};

impl PgRecord for User {
    const TABLE: &'static str = "users";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "login_name",
        "first_name",
        "last_name",
        "email",
        "phone",
        "password_hash",
        "email_confirmed",
        "confirmation_token",
        "locked",
        "login_attempts",
        "last_login_at",
        "role",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.login_name)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.phone)
            .bind(&self.password_hash)
            .bind(self.email_confirmed)
            .bind(&self.confirmation_token)
            .bind(self.locked)
            .bind(self.login_attempts)
            .bind(self.last_login_at)
            .bind(&self.role)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}

#[async_trait]
impl AccountStore for PgStore<User> {
    async fn find_by_login_name(&self, login_name: &str) -> StoreResult<Option<User>> {
        let query = format!(
            "SELECT {} FROM users \
             WHERE LOWER(login_name) = LOWER($1) AND is_deleted = FALSE \
             LIMIT 1",
            User::select_list()
        );
        sqlx::query_as::<_, User>(&query)
            .bind(login_name)
            .fetch_optional(self.pool())
            .await
    }

    async fn find_account(&self, user_id: DbId) -> StoreResult<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE id = $1 AND is_deleted = FALSE",
            User::select_list()
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_optional(self.pool())
            .await
    }
}
