//! User group entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::user_group as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::require_text;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{tenant_entity, trimmed};

/// A row from the `user_groups` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserGroup {
    pub id: DbId,
    pub client_id: DbId,
    pub group_name: String,
    pub description: Option<String>,
    pub member_ids: Vec<DbId>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(UserGroup);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("group_name"),
    ColumnSpec::text("description"),
    ColumnSpec::date("created_at"),
];

/// Create/update body for a user group. The member list replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserGroupRequest {
    pub group_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

impl UserGroupRequest {
    /// Returns the trimmed name and the de-duplicated member ids.
    pub fn validate(&self) -> CoreResult<(String, Vec<DbId>)> {
        let name = require_text(self.group_name.as_deref(), msg::NAME_REQUIRED)?;
        if self.member_ids.is_empty() {
            return Err(CoreError::validation(msg::MEMBERS_REQUIRED));
        }
        if self.member_ids.iter().any(|id| *id <= 0) {
            return Err(CoreError::validation(msg::INVALID_MEMBER));
        }
        let mut members = self.member_ids.clone();
        members.sort_unstable();
        members.dedup();
        Ok((name.to_string(), members))
    }

    pub fn description(&self) -> Option<String> {
        trimmed(&self.description)
    }
}
