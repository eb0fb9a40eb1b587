//! Purchase orders with their shipping address and payment info.
//!
//! An order owns one payment-info row and points at a tenant address. Saving
//! an order saves the address (reusing an identical one when it exists), the
//! payment info and the order itself, in that order.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::{
    lead as lead_msg, promo as promo_msg, purchase_order as msg,
};
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::{DbId, Money};
use bizhub_core::validation::promo::calculate_discount;
use bizhub_core::validation::purchase_order::{line_items_total, statuses};
use bizhub_db::models::address::{Address, AddressFields};
use bizhub_db::models::payment_info::{PaymentInfo, PaymentInfoRequest};
use bizhub_db::models::purchase_order::{PurchaseOrder, PurchaseOrderRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{find_any, find_live, page, record, toggle};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// An order together with the rows it points at.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub address: Address,
    pub payment_info: PaymentInfo,
}

// ---------------------------------------------------------------------------
// Related rows
// ---------------------------------------------------------------------------

async fn ensure_references(svc: &Services, user: &AuthUser, req: &PurchaseOrderRequest, lead_id: DbId) -> AppResult<()> {
    find_live(svc.stores.leads.as_ref(), lead_id, user, lead_msg::INVALID_ID).await?;

    let mut product_ids: Vec<DbId> = req.line_items.iter().map(|i| i.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();
    let found = svc.stores.products.find_many(&product_ids, user.client_id()).await?;
    if found.len() != product_ids.len() {
        return Err(CoreError::validation(msg::INVALID_PRODUCT).into());
    }
    Ok(())
}

/// Promo discount on `sub_total`. The promo must be live and active now.
async fn promo_discount(
    svc: &Services,
    user: &AuthUser,
    charges: &PaymentInfoRequest,
    sub_total: Money,
) -> AppResult<Money> {
    let Some(promo_id) = charges.promo_id else {
        return Ok(Decimal::ZERO);
    };
    let promo = find_live(svc.stores.promos.as_ref(), promo_id, user, promo_msg::INVALID_ID).await?;
    if !promo.is_active_at(Utc::now()) {
        return Err(CoreError::validation(promo_msg::INVALID_CODE).into());
    }
    Ok(calculate_discount(sub_total, promo.discount_value, promo.is_percent))
}

/// Reuse a live tenant address holding exactly `fields`, else insert one.
async fn find_or_create_address(
    svc: &Services,
    user: &AuthUser,
    fields: AddressFields,
) -> AppResult<Address> {
    let query = PageQuery::matching(vec![
        Predicate::text_equals("street_address", fields.street_address.clone()),
        Predicate::text_equals("city", fields.city.clone()),
        Predicate::text_equals("postal_code", fields.postal_code.clone()),
    ]);
    let existing = svc
        .stores
        .addresses
        .page(user.client_id(), &query)
        .await?
        .data
        .into_iter()
        .find(|a| a.same_location(&fields));
    if let Some(address) = existing {
        return Ok(address);
    }

    let address = Address::new(user.client_id(), fields, user.actor(), Utc::now());
    Ok(svc.stores.addresses.insert(&address).await?)
}

pub(crate) async fn payment_of(svc: &Services, user: &AuthUser, order: &PurchaseOrder) -> AppResult<PaymentInfo> {
    svc.stores
        .payment_infos
        .find_including_deleted(order.payment_info_id, user.client_id())
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Purchase order {} has no payment info", order.id))
        })
}

async fn detail(svc: &Services, user: &AuthUser, order: PurchaseOrder) -> AppResult<PurchaseOrderDetail> {
    let payment_info = payment_of(svc, user, &order).await?;
    let address = svc
        .stores
        .addresses
        .find_including_deleted(order.address_id, user.client_id())
        .await?
        .ok_or_else(|| {
            AppError::InternalError(format!("Purchase order {} has no address", order.id))
        })?;
    Ok(PurchaseOrderDetail {
        order,
        address,
        payment_info,
    })
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn create(
    svc: &Services,
    user: &AuthUser,
    req: PurchaseOrderRequest,
) -> AppResult<PurchaseOrderDetail> {
    let valid = req.validate()?;
    ensure_references(svc, user, &req, valid.assigned_lead_id).await?;
    let sub_total = line_items_total(&req.line_items);
    let discount = promo_discount(svc, user, &req.payment, sub_total).await?;
    let now = Utc::now();

    let address = find_or_create_address(svc, user, valid.address.clone()).await?;

    let mut payment = PaymentInfo::new(user.client_id(), user.actor(), now);
    payment.recalculate(sub_total, discount, &req.payment);
    let payment = svc.stores.payment_infos.insert(&payment).await?;

    let mut order = PurchaseOrder::new(user.client_id(), user.actor(), now);
    req.apply_to(&mut order, &valid);
    order.address_id = address.id;
    order.payment_info_id = payment.id;
    let order = svc.stores.purchase_orders.insert(&order).await?;

    tracing::info!(
        order_id = order.id,
        client_id = user.client_id(),
        total = %payment.total,
        "Purchase order created"
    );
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, order.id)).await;
    Ok(PurchaseOrderDetail {
        order,
        address,
        payment_info: payment,
    })
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: PurchaseOrderRequest,
) -> AppResult<PurchaseOrderDetail> {
    let valid = req.validate()?;
    let mut order = find_live(svc.stores.purchase_orders.as_ref(), id, user, msg::INVALID_ID).await?;
    ensure_references(svc, user, &req, valid.assigned_lead_id).await?;
    let sub_total = line_items_total(&req.line_items);
    let discount = promo_discount(svc, user, &req.payment, sub_total).await?;
    let now = Utc::now();

    let address = find_or_create_address(svc, user, valid.address.clone()).await?;

    let mut payment = payment_of(svc, user, &order).await?;
    payment.recalculate(sub_total, discount, &req.payment);
    payment.touch(user.actor(), now);
    let payment = svc.stores.payment_infos.save(&payment).await?;

    req.apply_to(&mut order, &valid);
    order.address_id = address.id;
    order.touch(user.actor(), now);
    let order = svc.stores.purchase_orders.save(&order).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(PurchaseOrderDetail {
        order,
        address,
        payment_info: payment,
    })
}

fn is_approved(order: &PurchaseOrder) -> bool {
    order.status == statuses::APPROVED || order.status == statuses::APPROVED_WITH_PARTIAL_PAYMENT
}

fn ensure_undecided(order: &PurchaseOrder) -> AppResult<()> {
    if is_approved(order) {
        return Err(CoreError::validation(msg::ALREADY_APPROVED).into());
    }
    if order.status == statuses::REJECTED {
        return Err(CoreError::validation(msg::ALREADY_REJECTED).into());
    }
    Ok(())
}

/// Approve an undecided order. A partially paid order is approved with the
/// partial-payment status.
pub async fn approve(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<PurchaseOrder> {
    let mut order = find_live(svc.stores.purchase_orders.as_ref(), id, user, msg::INVALID_ID).await?;
    ensure_undecided(&order)?;
    let payment = payment_of(svc, user, &order).await?;
    let now = Utc::now();

    order.status = if payment.is_partially_paid() {
        statuses::APPROVED_WITH_PARTIAL_PAYMENT
    } else {
        statuses::APPROVED
    }
    .to_string();
    order.approved_by = Some(user.user_id());
    order.approved_at = Some(now);
    order.touch(user.actor(), now);
    let saved = svc.stores.purchase_orders.save(&order).await?;

    record(svc, user, action_types::APPROVE, audit::describe(msg::APPROVED, id)).await;
    Ok(saved)
}

pub async fn reject(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<PurchaseOrder> {
    let mut order = find_live(svc.stores.purchase_orders.as_ref(), id, user, msg::INVALID_ID).await?;
    ensure_undecided(&order)?;
    let now = Utc::now();

    order.status = statuses::REJECTED.to_string();
    order.rejected_by = Some(user.user_id());
    order.rejected_at = Some(now);
    order.touch(user.actor(), now);
    let saved = svc.stores.purchase_orders.save(&order).await?;

    record(svc, user, action_types::REJECT, audit::describe(msg::REJECTED, id)).await;
    Ok(saved)
}

/// Soft-delete or restore the order together with its payment info.
pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<PurchaseOrder> {
    let order = find_any(svc.stores.purchase_orders.as_ref(), id, user, msg::INVALID_ID).await?;
    let mut payment = payment_of(svc, user, &order).await?;
    payment.is_deleted = !order.is_deleted;
    payment.touch(user.actor(), Utc::now());
    svc.stores.payment_infos.save(&payment).await?;

    toggle(svc, svc.stores.purchase_orders.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<PurchaseOrderDetail> {
    let order = find_live(svc.stores.purchase_orders.as_ref(), id, user, msg::INVALID_ID).await?;
    detail(svc, user, order).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<PurchaseOrder>> {
    page(svc.stores.purchase_orders.as_ref(), user, req, FILTER_COLUMNS).await
}
