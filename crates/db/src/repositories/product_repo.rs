//! Table mapping for `products`.

use super::{PgRecord, RecordQuery};
use crate::models::product::Product;

impl PgRecord for Product {
    const TABLE: &'static str = "products";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "title",
        "description_html",
        "brand",
        "color_label",
        "condition",
        "country_of_manufacture",
        "price",
        "discount",
        "is_discount_percent",
        "category_id",
        "weight_kgs",
        "length",
        "breadth",
        "height",
        "pickup_location_id",
        "item_available_from",
        "returns_allowed",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(&self.title)
            .bind(&self.description_html)
            .bind(&self.brand)
            .bind(&self.color_label)
            .bind(&self.condition)
            .bind(&self.country_of_manufacture)
            .bind(self.price)
            .bind(self.discount)
            .bind(self.is_discount_percent)
            .bind(self.category_id)
            .bind(self.weight_kgs)
            .bind(self.length)
            .bind(self.breadth)
            .bind(self.height)
            .bind(self.pickup_location_id)
            .bind(self.item_available_from)
            .bind(self.returns_allowed)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
