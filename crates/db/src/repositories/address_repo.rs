//! Table mapping for `addresses`.

use super::{PgRecord, RecordQuery};
use crate::models::address::Address;

impl PgRecord for Address {
    const TABLE: &'static str = "addresses";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "address_type",
        "street_address",
        "street_address2",
        "street_address3",
        "city",
        "state",
        "postal_code",
        "country",
        "name_on_address",
        "email_on_address",
        "phone_on_address",
        "user_id",
        "is_primary",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.address_type)
            .bind(&self.street_address)
            .bind(&self.street_address2)
            .bind(&self.street_address3)
            .bind(&self.city)
            .bind(&self.state)
            .bind(&self.postal_code)
            .bind(&self.country)
            .bind(&self.name_on_address)
            .bind(&self.email_on_address)
            .bind(&self.phone_on_address)
            .bind(self.user_id)
            .bind(self.is_primary)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
