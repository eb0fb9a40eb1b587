//! Table mapping for `payments`, which are never updated or deleted.

use super::{PgRecord, RecordQuery};
use crate::models::payment::Payment;

impl PgRecord for Payment {
    const TABLE: &'static str = "payments";
    const SOFT_DELETE: bool = false;
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "purchase_order_id",
        "amount",
        "amount_in_paise",
        "currency",
        "payment_method",
        "payment_status",
        "payment_date",
        "upi_transaction_id",
        "notes",
        "description",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(self.purchase_order_id)
            .bind(self.amount)
            .bind(self.amount_in_paise)
            .bind(&self.currency)
            .bind(&self.payment_method)
            .bind(&self.payment_status)
            .bind(self.payment_date)
            .bind(&self.upi_transaction_id)
            .bind(&self.notes)
            .bind(&self.description)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
