//! Product review entity model and DTOs.
//!
//! Reviews form threads: a reply points at its parent through `parent_id`.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::product_review as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::{require_id, require_text};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

pub const MAX_RATING: f64 = 5.0;

/// A row from the `product_reviews` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProductReview {
    pub id: DbId,
    pub client_id: DbId,
    pub product_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub ratings: f64,
    pub review: String,
    pub score: i32,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(ProductReview);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::number("user_id"),
    ColumnSpec::number("parent_id"),
    ColumnSpec::number("ratings"),
    ColumnSpec::text("review"),
    ColumnSpec::number("score"),
    ColumnSpec::date("created_at"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductReviewRequest {
    pub product_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub ratings: Option<f64>,
    pub review: Option<String>,
}

impl ProductReviewRequest {
    pub fn validate(&self) -> CoreResult<()> {
        match self.ratings {
            Some(r) if (0.0..=MAX_RATING).contains(&r) => {}
            _ => return Err(CoreError::validation(msg::INVALID_RATINGS)),
        }
        require_text(self.review.as_deref(), msg::REVIEW_REQUIRED)?;
        require_id(self.user_id, msg::INVALID_USER)?;
        require_id(self.product_id, msg::INVALID_PRODUCT)?;
        Ok(())
    }

    pub fn into_review(self, client_id: DbId, actor: &str, now: Timestamp) -> ProductReview {
        ProductReview {
            id: 0,
            client_id,
            product_id: self.product_id.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            parent_id: self.parent_id.filter(|id| *id > 0),
            ratings: self.ratings.unwrap_or_default(),
            review: self.review.as_deref().unwrap_or_default().trim().to_string(),
            score: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}

/// Vote on a review's helpfulness score.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub increase: bool,
}

impl ProductReview {
    /// Move the score one step. The score never drops below zero.
    pub fn vote(&mut self, increase: bool) {
        self.score = if increase {
            self.score.saturating_add(1)
        } else {
            (self.score - 1).max(0)
        };
    }
}
