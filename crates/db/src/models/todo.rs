//! Todo entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::messages::todo as msg;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::{max_chars, require_text};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

pub const MAX_TASK_CHARS: usize = 500;

/// A row from the `todos` table. Todos belong to the user who created them.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Todo {
    pub id: DbId,
    pub client_id: DbId,
    pub task: String,
    pub is_done: bool,
    pub user_id: DbId,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Todo);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoRequest {
    pub task: Option<String>,
}

impl TodoRequest {
    /// Returns the trimmed task text.
    pub fn validate(&self) -> CoreResult<&str> {
        let task = require_text(self.task.as_deref(), msg::TASK_REQUIRED)?;
        max_chars(task, MAX_TASK_CHARS, msg::TASK_TOO_LONG)?;
        Ok(task)
    }
}

impl Todo {
    pub fn new(client_id: DbId, user_id: DbId, task: &str, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            task: task.to_string(),
            is_done: false,
            user_id,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}
