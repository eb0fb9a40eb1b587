//! Product reviews and their reply threads.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::product_review as msg;
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::product_review::{ProductReview, ProductReviewRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, record, toggle};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

fn for_product(product_id: DbId) -> Predicate {
    Predicate::number_equals("product_id", product_id as f64)
}

pub async fn create(svc: &Services, user: &AuthUser, req: ProductReviewRequest) -> AppResult<ProductReview> {
    req.validate()?;
    let product_id = req.product_id.unwrap_or_default();
    find_live(svc.stores.products.as_ref(), product_id, user, msg::INVALID_PRODUCT).await?;
    find_live(svc.stores.users.as_ref(), req.user_id.unwrap_or_default(), user, msg::INVALID_USER).await?;
    if let Some(parent_id) = req.parent_id.filter(|id| *id > 0) {
        let parent = svc.stores.product_reviews.find(parent_id, user.client_id()).await?;
        if !parent.is_some_and(|p| p.product_id == product_id) {
            return Err(CoreError::validation(msg::INVALID_PARENT).into());
        }
    }

    let review = req.into_review(user.client_id(), user.actor(), Utc::now());
    let review = svc.stores.product_reviews.insert(&review).await?;

    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, review.id)).await;
    Ok(review)
}

/// Reviews of one product, newest first. Filters apply within the product.
pub async fn list_for_product(
    svc: &Services,
    user: &AuthUser,
    product_id: DbId,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<ProductReview>> {
    if product_id <= 0 {
        return Err(CoreError::validation(msg::INVALID_PRODUCT).into());
    }
    let query = req.validate(FILTER_COLUMNS)?.within(for_product(product_id));
    Ok(svc.stores.product_reviews.page(user.client_id(), &query).await?)
}

/// Soft-delete or restore a review. Deleting also deletes every reply
/// below it; restoring brings back the review alone.
pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<ProductReview> {
    let review =
        toggle(svc, svc.stores.product_reviews.as_ref(), user, id, msg::NOT_FOUND, msg::TOGGLED).await?;
    if review.is_deleted {
        let hidden = delete_replies(svc, user, &review).await?;
        if hidden > 0 {
            tracing::debug!(review_id = id, replies = hidden, "Deleted replies with review");
        }
    }
    Ok(review)
}

async fn delete_replies(svc: &Services, user: &AuthUser, root: &ProductReview) -> AppResult<usize> {
    let query = PageQuery {
        include_deleted: true,
        ..PageQuery::default()
    }
    .within(for_product(root.product_id));
    let thread = svc.stores.product_reviews.page(user.client_id(), &query).await?.data;

    let now = Utc::now();
    let mut parents = vec![root.id];
    let mut deleted = 0;
    while let Some(parent) = parents.pop() {
        for reply in thread.iter().filter(|r| r.parent_id == Some(parent)) {
            parents.push(reply.id);
            if reply.is_deleted {
                continue;
            }
            let mut reply = reply.clone();
            reply.is_deleted = true;
            reply.touch(user.actor(), now);
            svc.stores.product_reviews.save(&reply).await?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Raise or lower a live review's score by one.
pub async fn set_score(svc: &Services, user: &AuthUser, id: DbId, increase: bool) -> AppResult<ProductReview> {
    let mut review = find_live(svc.stores.product_reviews.as_ref(), id, user, msg::NOT_FOUND).await?;
    review.vote(increase);
    review.touch(user.actor(), Utc::now());
    let saved = svc.stores.product_reviews.save(&review).await?;

    record(svc, user, action_types::SCORE, audit::describe(msg::SCORE_UPDATED, id)).await;
    Ok(saved)
}
