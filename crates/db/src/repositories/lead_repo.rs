//! Table mapping for `leads`.

use super::{PgRecord, RecordQuery};
use crate::models::lead::Lead;

impl PgRecord for Lead {
    const TABLE: &'static str = "leads";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "company",
        "company_size",
        "lead_status",
        "annual_revenue",
        "website",
        "notes",
        "address_id",
        "assigned_agent_id",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.phone)
            .bind(&self.company)
            .bind(self.company_size)
            .bind(&self.lead_status)
            .bind(self.annual_revenue)
            .bind(&self.website)
            .bind(&self.notes)
            .bind(self.address_id)
            .bind(self.assigned_agent_id)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
