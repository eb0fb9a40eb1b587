//! Table mapping for `user_groups`.

use super::{PgRecord, RecordQuery};
use crate::models::user_group::UserGroup;

impl PgRecord for UserGroup {
    const TABLE: &'static str = "user_groups";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "group_name",
        "description",
        "member_ids",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.group_name)
            .bind(&self.description)
            .bind(&self.member_ids)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
