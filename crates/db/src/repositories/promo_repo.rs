//! Table mapping for `promos`.

use super::{PgRecord, RecordQuery};
use crate::models::promo::Promo;

impl PgRecord for Promo {
    const TABLE: &'static str = "promos";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "promo_code",
        "description",
        "discount_value",
        "is_percent",
        "start_date",
        "expiry_date",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.promo_code)
            .bind(&self.description)
            .bind(self.discount_value)
            .bind(self.is_percent)
            .bind(self.start_date)
            .bind(self.expiry_date)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
