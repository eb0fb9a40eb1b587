//! Table mapping for `packages`.

use super::{PgRecord, RecordQuery};
use crate::models::package::Package;

impl PgRecord for Package {
    const TABLE: &'static str = "packages";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "package_name",
        "length",
        "breadth",
        "height",
        "max_weight",
        "standard_capacity",
        "price_per_unit",
        "package_type",
        "quantity",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.package_name)
            .bind(self.length)
            .bind(self.breadth)
            .bind(self.height)
            .bind(self.max_weight)
            .bind(self.standard_capacity)
            .bind(self.price_per_unit)
            .bind(&self.package_type)
            .bind(self.quantity)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
