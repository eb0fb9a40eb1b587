//! Table mapping for `shipments`.

use super::{PgRecord, RecordQuery};
use crate::models::shipment::Shipment;

impl PgRecord for Shipment {
    const TABLE: &'static str = "shipments";
    const SOFT_DELETE: bool = false;
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "purchase_order_id",
        "pickup_location_id",
        "total_weight_kgs",
        "total_quantity",
        "packaging_cost",
        "shipping_cost",
        "total_cost",
        "courier_name",
        "expected_delivery_date",
        "provider_order_id",
        "provider_shipment_id",
        "status",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(self.purchase_order_id)
            .bind(self.pickup_location_id)
            .bind(self.total_weight_kgs)
            .bind(self.total_quantity)
            .bind(self.packaging_cost)
            .bind(self.shipping_cost)
            .bind(self.total_cost)
            .bind(&self.courier_name)
            .bind(self.expected_delivery_date)
            .bind(&self.provider_order_id)
            .bind(&self.provider_shipment_id)
            .bind(&self.status)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
