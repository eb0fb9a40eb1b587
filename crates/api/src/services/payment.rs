//! Payments recorded against purchase orders.
//!
//! A first payment approves a PENDING_APPROVAL order; follow-up payments
//! settle what an approved order still owes. Each payment lowers the
//! pending amount on the order's payment info and moves the order to
//! APPROVED once nothing is pending, APPROVED_WITH_PARTIAL_PAYMENT otherwise.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::{payment as msg, purchase_order as po_msg};
use bizhub_core::pagination::{PageQuery, Predicate};
use bizhub_core::types::DbId;
use bizhub_core::validation::fields::require_id;
use bizhub_core::validation::purchase_order::statuses;
use bizhub_db::models::payment::{CashPaymentRequest, Payment};
use bizhub_db::models::purchase_order::PurchaseOrder;
use bizhub_db::TenantEntity;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use super::purchase_order::payment_of;
use super::{find_live, record};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

/// Outcome of a recorded payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub purchase_order_id: DbId,
    pub purchase_order_status: String,
}

/// Which orders a payment may be recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    First,
    FollowUp,
}

impl Stage {
    fn allows(self, order: &PurchaseOrder) -> bool {
        match self {
            Stage::First => order.status == statuses::PENDING_APPROVAL,
            Stage::FollowUp => {
                order.status == statuses::APPROVED
                    || order.status == statuses::APPROVED_WITH_PARTIAL_PAYMENT
            }
        }
    }

    fn refusal(self) -> &'static str {
        match self {
            Stage::First => msg::ONLY_PENDING_APPROVAL,
            Stage::FollowUp => msg::FOLLOW_UP_STATUS,
        }
    }

    fn description(self, order: &PurchaseOrder) -> String {
        let label = match self {
            Stage::First => "Cash payment",
            Stage::FollowUp => "Follow-up cash payment",
        };
        format!("{label} for Purchase Order #{} ({})", order.id, order.vendor_number)
    }

    fn recorded(self) -> &'static str {
        match self {
            Stage::First => msg::RECORDED,
            Stage::FollowUp => msg::FOLLOW_UP_RECORDED,
        }
    }
}

async fn order_of(svc: &Services, user: &AuthUser, id: Option<DbId>) -> AppResult<PurchaseOrder> {
    let id = require_id(id, po_msg::INVALID_ID)?;
    find_live(svc.stores.purchase_orders.as_ref(), id, user, po_msg::INVALID_ID).await
}

async fn record_payment(
    svc: &Services,
    user: &AuthUser,
    req: CashPaymentRequest,
    stage: Stage,
) -> AppResult<PaymentReceipt> {
    let mut order = order_of(svc, user, req.purchase_order_id).await?;
    if !stage.allows(&order) {
        return Err(CoreError::validation(stage.refusal()).into());
    }
    let valid = req.validate()?;
    let amount = valid.1;

    let mut info = payment_of(svc, user, &order).await?;
    if amount > info.pending_amount {
        return Err(CoreError::validation(format!(
            "{}{}",
            msg::EXCEEDS_PENDING_PREFIX,
            info.pending_amount
        ))
        .into());
    }

    let now = Utc::now();
    let payment = Payment::captured(
        user.client_id(),
        order.id,
        &req,
        valid,
        stage.description(&order),
        user.actor(),
        now,
    );
    let payment = svc.stores.payments.insert(&payment).await?;

    info.apply_payment(amount);
    info.touch(user.actor(), now);
    let info = svc.stores.payment_infos.save(&info).await?;

    order.status = if info.pending_amount > Decimal::ZERO {
        statuses::APPROVED_WITH_PARTIAL_PAYMENT
    } else {
        statuses::APPROVED
    }
    .to_string();
    if stage == Stage::First {
        order.approved_by = Some(user.user_id());
        order.approved_at = Some(now);
    }
    order.touch(user.actor(), now);
    let order = svc.stores.purchase_orders.save(&order).await?;

    tracing::info!(
        payment_id = payment.id,
        order_id = order.id,
        client_id = user.client_id(),
        amount = %amount,
        method = %payment.payment_method,
        pending = %info.pending_amount,
        "Payment recorded"
    );
    record(svc, user, action_types::PAYMENT, audit::describe(stage.recorded(), payment.id)).await;
    Ok(PaymentReceipt {
        payment,
        purchase_order_id: order.id,
        purchase_order_status: order.status,
    })
}

/// Record a cash or UPI payment that approves a pending order.
pub async fn record_cash_payment(
    svc: &Services,
    user: &AuthUser,
    req: CashPaymentRequest,
) -> AppResult<PaymentReceipt> {
    record_payment(svc, user, req, Stage::First).await
}

/// Record a further payment on an order that is already approved.
pub async fn record_follow_up_payment(
    svc: &Services,
    user: &AuthUser,
    req: CashPaymentRequest,
) -> AppResult<PaymentReceipt> {
    record_payment(svc, user, req, Stage::FollowUp).await
}

async fn payments_of(svc: &Services, user: &AuthUser, order_id: DbId) -> AppResult<Vec<Payment>> {
    let query = PageQuery::matching(vec![Predicate::number_equals(
        "purchase_order_id",
        order_id as f64,
    )]);
    Ok(svc.stores.payments.page(user.client_id(), &query).await?.data)
}

/// Payments of one order, newest first.
pub async fn list_for_purchase_order(
    svc: &Services,
    user: &AuthUser,
    order_id: DbId,
) -> AppResult<Vec<Payment>> {
    let order = order_of(svc, user, Some(order_id)).await?;
    payments_of(svc, user, order.id).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Payment> {
    find_live(svc.stores.payments.as_ref(), id, user, msg::NOT_FOUND).await
}

/// Whether any captured payment exists for the order.
pub async fn is_purchase_order_paid(svc: &Services, user: &AuthUser, order_id: DbId) -> AppResult<bool> {
    let order = order_of(svc, user, Some(order_id)).await?;
    Ok(payments_of(svc, user, order.id)
        .await?
        .iter()
        .any(Payment::is_captured))
}
