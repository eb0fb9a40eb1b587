use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::promo as msg;
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::promo::{calculate_discount, ranges_overlap, round_cents};
use bizhub_db::models::promo::{DiscountRequest, Promo, PromoRequest, FILTER_COLUMNS};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{find_live, page, record, toggle, BulkResult};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountResult {
    pub discount: Money,
    pub total_after_discount: Money,
}

async fn live_with_code(svc: &Services, user: &AuthUser, code: &str) -> AppResult<Vec<Promo>> {
    let query = PageQuery::matching(vec![Predicate::text_equals("promo_code", code)]);
    Ok(svc.stores.promos.page(user.client_id(), &query).await?.data)
}

/// Validate, reject overlapping codes and insert, without auditing.
async fn insert_promo(
    svc: &Services,
    user: &AuthUser,
    req: &PromoRequest,
    now: Timestamp,
) -> AppResult<Promo> {
    let promo = req.into_promo(user.client_id(), user.actor(), now)?;

    let overlapping = live_with_code(svc, user, &promo.promo_code)
        .await?
        .iter()
        .any(|p| ranges_overlap(p.start_date, p.expiry_date, promo.start_date, promo.expiry_date));
    if overlapping {
        return Err(CoreError::validation(msg::OVERLAPPING_CODE).into());
    }

    Ok(svc.stores.promos.insert(&promo).await?)
}

pub async fn create(svc: &Services, user: &AuthUser, req: PromoRequest) -> AppResult<Promo> {
    let created = insert_promo(svc, user, &req, Utc::now()).await?;

    tracing::info!(promo_id = created.id, code = %created.promo_code, "Promo created");
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

/// Insert every promo that passes on its own. Earlier items of the same
/// batch count for the overlap check of later ones.
pub async fn bulk_create(
    svc: &Services,
    user: &AuthUser,
    items: Vec<PromoRequest>,
) -> AppResult<BulkResult> {
    if items.is_empty() {
        return Err(CoreError::validation(msg::BULK_EMPTY).into());
    }

    let now = Utc::now();
    let mut result = BulkResult::default();
    for (index, item) in items.iter().enumerate() {
        match insert_promo(svc, user, item, now).await {
            Ok(_) => result.succeeded(),
            Err(e) => result.failed(index, item.promo_code.clone(), e),
        }
    }
    Ok(result.finish(svc, user, "promo", msg::BULK_INSERTED).await)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Promo> {
    toggle(svc, svc.stores.promos.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Promo> {
    find_live(svc.stores.promos.as_ref(), id, user, msg::INVALID_ID).await
}

/// The promo currently active under `code`.
pub async fn get_by_code(svc: &Services, user: &AuthUser, code: &str) -> AppResult<Promo> {
    let now = Utc::now();
    live_with_code(svc, user, code.trim())
        .await?
        .into_iter()
        .find(|p| p.is_active_at(now))
        .ok_or_else(|| CoreError::not_found(msg::INVALID_CODE).into())
}

pub async fn discount(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: DiscountRequest,
) -> AppResult<DiscountResult> {
    let promo = find_live(svc.stores.promos.as_ref(), id, user, msg::INVALID_ID).await?;
    let discount = calculate_discount(req.total, promo.discount_value, promo.is_percent);
    Ok(DiscountResult {
        discount,
        total_after_discount: round_cents((req.total - discount).max(Decimal::ZERO)),
    })
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Promo>> {
    page(svc.stores.promos.as_ref(), user, req, FILTER_COLUMNS).await
}
