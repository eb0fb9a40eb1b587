//! Audit log entity model.

use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::store::TenantEntity;

/// A row from the `user_logs` table. Append-only: rows are never updated
/// or soft-deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserLog {
    pub id: DbId,
    pub client_id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub description: String,
    pub route: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TenantEntity for UserLog {
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

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::number("user_id"),
    ColumnSpec::text("action"),
    ColumnSpec::text("description"),
    ColumnSpec::text("route"),
    ColumnSpec::date("created_at"),
];

impl UserLog {
    pub fn new(
        client_id: DbId,
        user_id: DbId,
        action: &str,
        description: String,
        route: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            id: 0,
            client_id,
            user_id,
            action: action.to_string(),
            description,
            route: route.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
