//! Table mapping for `payment_infos`.

use super::{PgRecord, RecordQuery};
use crate::models::payment_info::PaymentInfo;

impl PgRecord for PaymentInfo {
    const TABLE: &'static str = "payment_infos";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "total",
        "tax",
        "service_fee",
        "packaging_fee",
        "discount",
        "sub_total",
        "delivery_fee",
        "pending_amount",
        "payment_status",
        "promo_id",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(self.total)
            .bind(self.tax)
            .bind(self.service_fee)
            .bind(self.packaging_fee)
            .bind(self.discount)
            .bind(self.sub_total)
            .bind(self.delivery_fee)
            .bind(self.pending_amount)
            .bind(&self.payment_status)
            .bind(self.promo_id)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
