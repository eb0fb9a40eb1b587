//! Table mapping for `pickup_locations`.

use super::{PgRecord, RecordQuery};
use crate::models::pickup_location::PickupLocation;

impl PgRecord for PickupLocation {
    const TABLE: &'static str = "pickup_locations";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "address_nick_name",
        "address_id",
        "external_location_id",
        "is_default",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.address_nick_name)
            .bind(self.address_id)
            .bind(&self.external_location_id)
            .bind(self.is_default)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
