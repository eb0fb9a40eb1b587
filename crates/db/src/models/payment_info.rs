//! Payment info entity model and DTOs.
//!
//! Payment rows are created and updated only through their purchase order.

use bizhub_core::error::CoreResult;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::promo::round_cents;
use bizhub_core::validation::purchase_order::validate_amounts;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

pub mod payment_statuses {
    pub const PENDING: &str = "PENDING";
    pub const PARTIALLY_PAID: &str = "PARTIALLY_PAID";
    pub const PAID: &str = "PAID";
}

/// A row from the `payment_infos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PaymentInfo {
    pub id: DbId,
    pub client_id: DbId,
    pub total: Money,
    pub tax: Money,
    pub service_fee: Money,
    pub packaging_fee: Money,
    pub discount: Money,
    pub sub_total: Money,
    pub delivery_fee: Money,
    pub pending_amount: Money,
    pub payment_status: String,
    pub promo_id: Option<DbId>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(PaymentInfo);

/// Charges entered with a purchase order. Absent amounts count as zero.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PaymentInfoRequest {
    pub tax: Option<Money>,
    pub service_fee: Option<Money>,
    pub packaging_fee: Option<Money>,
    pub delivery_fee: Option<Money>,
    pub amount_paid: Option<Money>,
    pub promo_id: Option<DbId>,
}

impl PaymentInfoRequest {
    pub fn validate(&self) -> CoreResult<()> {
        validate_amounts(&[
            self.tax,
            self.service_fee,
            self.packaging_fee,
            self.delivery_fee,
            self.amount_paid,
        ])
    }
}

impl PaymentInfo {
    pub fn new(client_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            total: Decimal::ZERO,
            tax: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            packaging_fee: Decimal::ZERO,
            discount: Decimal::ZERO,
            sub_total: Decimal::ZERO,
            delivery_fee: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
            payment_status: payment_statuses::PENDING.to_string(),
            promo_id: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }

    /// Recompute every amount from the order subtotal, the request charges
    /// and the promo discount already worked out by the caller.
    pub fn recalculate(&mut self, sub_total: Money, discount: Money, charges: &PaymentInfoRequest) {
        self.sub_total = round_cents(sub_total);
        self.discount = round_cents(discount);
        self.tax = charges.tax.unwrap_or_default();
        self.service_fee = charges.service_fee.unwrap_or_default();
        self.packaging_fee = charges.packaging_fee.unwrap_or_default();
        self.delivery_fee = charges.delivery_fee.unwrap_or_default();
        self.promo_id = charges.promo_id;
        self.total = round_cents(
            self.sub_total - self.discount
                + self.tax
                + self.service_fee
                + self.packaging_fee
                + self.delivery_fee,
        )
        .max(Decimal::ZERO);

        let paid = charges.amount_paid.unwrap_or_default();
        self.pending_amount = round_cents((self.total - paid).max(Decimal::ZERO));
        self.refresh_status(paid);
    }

    /// Apply a recorded payment of `amount` against the pending balance.
    pub fn apply_payment(&mut self, amount: Money) {
        let paid_before = self.total - self.pending_amount;
        self.pending_amount = round_cents((self.pending_amount - amount).max(Decimal::ZERO));
        self.refresh_status(paid_before + amount);
    }

    fn refresh_status(&mut self, paid: Money) {
        self.payment_status = if paid <= Decimal::ZERO && self.total > Decimal::ZERO {
            payment_statuses::PENDING
        } else if self.pending_amount > Decimal::ZERO {
            payment_statuses::PARTIALLY_PAID
        } else {
            payment_statuses::PAID
        }
        .to_string();
    }

    pub fn is_partially_paid(&self) -> bool {
        self.payment_status == payment_statuses::PARTIALLY_PAID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(units: i64, scale: u32) -> Money {
        Decimal::new(units, scale)
    }

    #[test]
    fn test_recalculate_totals() {
        let mut info = PaymentInfo::new(1, "ops", chrono::Utc::now());
        let charges = PaymentInfoRequest {
            tax: Some(money(18, 0)),
            delivery_fee: Some(money(25, 1)),
            amount_paid: Some(money(50, 0)),
            ..Default::default()
        };
        info.recalculate(money(100, 0), money(10, 0), &charges);
        assert_eq!(info.total, money(1105, 1));
        assert_eq!(info.pending_amount, money(605, 1));
        assert_eq!(info.payment_status, payment_statuses::PARTIALLY_PAID);
    }

    #[test]
    fn test_unpaid_and_paid_status() {
        let mut info = PaymentInfo::new(1, "ops", chrono::Utc::now());
        info.recalculate(money(40, 0), Decimal::ZERO, &PaymentInfoRequest::default());
        assert_eq!(info.payment_status, payment_statuses::PENDING);

        let paid = PaymentInfoRequest {
            amount_paid: Some(money(40, 0)),
            ..Default::default()
        };
        info.recalculate(money(40, 0), Decimal::ZERO, &paid);
        assert_eq!(info.payment_status, payment_statuses::PAID);
        assert_eq!(info.pending_amount, Decimal::ZERO);
    }

    #[test]
    fn test_apply_payment_moves_status() {
        let mut info = PaymentInfo::new(1, "ops", chrono::Utc::now());
        info.recalculate(money(1000, 0), Decimal::ZERO, &PaymentInfoRequest::default());

        info.apply_payment(money(40050, 2));
        assert_eq!(info.pending_amount, money(59950, 2));
        assert_eq!(info.payment_status, payment_statuses::PARTIALLY_PAID);

        info.apply_payment(money(59950, 2));
        assert_eq!(info.pending_amount, Decimal::ZERO);
        assert_eq!(info.payment_status, payment_statuses::PAID);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let req = PaymentInfoRequest {
            tax: Some(money(-1, 0)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
