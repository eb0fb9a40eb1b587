//! Table mapping for `purchase_orders`. Line items are stored as JSONB.

use super::{PgRecord, RecordQuery};
use crate::models::purchase_order::PurchaseOrder;

impl PgRecord for PurchaseOrder {
    const TABLE: &'static str = "purchase_orders";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "vendor_number",
        "status",
        "priority",
        "expected_delivery_date",
        "terms_conditions_html",
        "assigned_lead_id",
        "address_id",
        "payment_info_id",
        "line_items",
        "attachments",
        "approved_by",
        "approved_at",
        "rejected_by",
        "rejected_at",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.vendor_number)
            .bind(&self.status)
            .bind(&self.priority)
            .bind(self.expected_delivery_date)
            .bind(&self.terms_conditions_html)
            .bind(self.assigned_lead_id)
            .bind(self.address_id)
            .bind(self.payment_info_id)
            .bind(&self.line_items)
            .bind(&self.attachments)
            .bind(self.approved_by)
            .bind(self.approved_at)
            .bind(self.rejected_by)
            .bind(self.rejected_at)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
