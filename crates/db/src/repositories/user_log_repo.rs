//! Table mapping for `user_logs`, the append-only audit trail.

use super::{PgRecord, RecordQuery};
use crate::models::user_log::UserLog;

impl PgRecord for UserLog {
    const TABLE: &'static str = "user_logs";
    const SOFT_DELETE: bool = false;
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "user_id",
        "action",
        "description",
        "route",
        "created_at",
        "updated_at",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(self.user_id)
            .bind(&self.action)
            .bind(&self.description)
            .bind(&self.route)
            .bind(self.created_at)
            .bind(self.updated_at)
    }
}
