//! Table mapping for `messages`, plus the startup lookup of pending
//! scheduled emails.

use async_trait::async_trait;
use bizhub_core::types::Timestamp;

use super::{PgRecord, PgStore, RecordQuery};
use crate::models::message::Message;
use crate::store::{ScheduleStore, StoreResult};

impl PgRecord for Message {
    const TABLE: &'static str = "messages";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "title",
        "description_html",
        "send_as_email",
        "publish_date",
        "batch_id",
        "user_ids",
        "group_ids",
        "read_by_user_ids",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.title)
            .bind(&self.description_html)
            .bind(self.send_as_email)
            .bind(self.publish_date)
            .bind(&self.batch_id)
            .bind(&self.user_ids)
            .bind(&self.group_ids)
            .bind(&self.read_by_user_ids)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}

#[async_trait]
impl ScheduleStore for PgStore<Message> {
    async fn pending_scheduled(&self, now: Timestamp) -> StoreResult<Vec<Message>> {
        let query = format!(
            "SELECT {} FROM messages \
             WHERE is_deleted = FALSE AND send_as_email = TRUE \
               AND batch_id IS NOT NULL AND publish_date > $1 \
             ORDER BY publish_date ASC",
            Message::select_list()
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(now)
            .fetch_all(self.pool())
            .await
    }
}
