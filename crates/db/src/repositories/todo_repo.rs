//! Table mapping for `todos`.

use super::{PgRecord, RecordQuery};
use crate::models::todo::Todo;

impl PgRecord for Todo {
    const TABLE: &'static str = "todos";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "task",
        "is_done",
        "user_id",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.task)
            .bind(self.is_done)
            .bind(self.user_id)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
