//! Table mapping for `product_reviews`.

use super::{PgRecord, RecordQuery};
use crate::models::product_review::ProductReview;

impl PgRecord for ProductReview {
    const TABLE: &'static str = "product_reviews";
    const WRITE_COLUMNS: &'static [&'static str] = &[
        "client_id",
        "product_id",
        "user_id",
        "parent_id",
        "ratings",
        "review",
        "score",
        "is_deleted",
        "created_at",
        "updated_at",
        "created_user",
        "modified_user",
    ];

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.client_id)
            .bind(self.product_id)
            .bind(self.user_id)
            .bind(self.parent_id)
            .bind(self.ratings)
            .bind(&self.review)
            .bind(self.score)
            .bind(self.is_deleted)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_user)
            .bind(&self.modified_user)
    }
}
