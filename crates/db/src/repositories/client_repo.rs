//! Table mapping for `clients`. A client row is its own tenant.

use super::{PgRecord, RecordQuery};
use crate::models::client::Client;

impl PgRecord for Client {
    const TABLE: &'static str = "clients";
    const TENANT_COLUMN: &'static str = "id";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "support_email",
        "website",
        "sendgrid_sender_name",
        "logo_url",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(&self.name)
            .bind(&self.description)
            .bind(&self.support_email)
            .bind(&self.website)
            .bind(&self.sendgrid_sender_name)
            .bind(&self.logo_url)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
