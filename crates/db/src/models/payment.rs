//! Recorded payments against purchase orders.
//!
//! Payments are append-only. The purchase order's payment info carries the
//! running pending amount; each row here is one settled payment.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::payment as msg;
use bizhub_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::trimmed;
use crate::store::TenantEntity;

pub mod methods {
    pub const CASH: &str = "CASH";
    pub const UPI: &str = "UPI";
}

pub mod statuses {
    pub const CAPTURED: &str = "CAPTURED";
}

pub const CURRENCY: &str = "INR";

/// A row from the `payments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub client_id: DbId,
    pub purchase_order_id: DbId,
    pub amount: Money,
    pub amount_in_paise: i64,
    pub currency: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_date: Timestamp,
    pub upi_transaction_id: Option<String>,
    pub notes: Option<String>,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

impl TenantEntity for Payment {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }

    fn client_id(&self) -> DbId {
        self.client_id
    }

    fn touch(&mut self, actor: &str, now: Timestamp) {
        self.modified_user = actor.to_string();
        self.updated_at = now;
    }
}

/// Body of a cash or UPI payment recorded by staff.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CashPaymentRequest {
    pub purchase_order_id: Option<DbId>,
    pub amount: Option<Money>,
    pub payment_date: Option<NaiveDate>,
    pub upi_transaction_id: Option<String>,
    pub notes: Option<String>,
}

impl CashPaymentRequest {
    /// Date and amount checks that need no stored rows. Returns both.
    pub fn validate(&self) -> CoreResult<(NaiveDate, Money)> {
        let date = self
            .payment_date
            .ok_or_else(|| CoreError::validation(msg::DATE_REQUIRED))?;
        match self.amount {
            Some(amount) if amount > Decimal::ZERO => Ok((date, amount)),
            _ => Err(CoreError::validation(msg::AMOUNT_REQUIRED)),
        }
    }

    /// UPI when a transaction id was given, cash otherwise.
    pub fn method(&self) -> &'static str {
        if trimmed(&self.upi_transaction_id).is_some() {
            methods::UPI
        } else {
            methods::CASH
        }
    }
}

impl Payment {
    /// A captured payment dated at the start of `date` (UTC).
    pub fn captured(
        client_id: DbId,
        purchase_order_id: DbId,
        req: &CashPaymentRequest,
        (date, amount): (NaiveDate, Money),
        description: String,
        actor: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            id: 0,
            client_id,
            purchase_order_id,
            amount,
            amount_in_paise: to_paise(amount),
            currency: CURRENCY.to_string(),
            payment_method: req.method().to_string(),
            payment_status: statuses::CAPTURED.to_string(),
            payment_date: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            upi_transaction_id: trimmed(&req.upi_transaction_id),
            notes: trimmed(&req.notes),
            description,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }

    pub fn is_captured(&self) -> bool {
        self.payment_status == statuses::CAPTURED
    }
}

/// Whole paise in `amount`; fractions of a paisa are dropped.
pub fn to_paise(amount: Money) -> i64 {
    (amount * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn request(amount: Option<Money>) -> CashPaymentRequest {
        CashPaymentRequest {
            purchase_order_id: Some(4),
            amount,
            payment_date: NaiveDate::from_ymd_opt(2026, 3, 14),
            ..Default::default()
        }
    }

    #[test]
    fn test_amount_must_be_positive() {
        for amount in [None, Some(Decimal::ZERO), Some(Decimal::new(-5, 0))] {
            let err = request(amount).validate().unwrap_err();
            assert_matches!(err, CoreError::Validation(m) if m == msg::AMOUNT_REQUIRED);
        }
    }

    #[test]
    fn test_date_checked_first() {
        let mut req = request(None);
        req.payment_date = None;
        assert_matches!(req.validate(), Err(CoreError::Validation(m)) if m == msg::DATE_REQUIRED);
    }

    #[test]
    fn test_method_follows_upi_reference() {
        let mut req = request(Some(Decimal::TEN));
        assert_eq!(req.method(), methods::CASH);
        req.upi_transaction_id = Some("   ".into());
        assert_eq!(req.method(), methods::CASH);
        req.upi_transaction_id = Some("UPI-88213".into());
        assert_eq!(req.method(), methods::UPI);
    }

    #[test]
    fn test_captured_row_in_paise_at_midnight() {
        let req = request(Some(Decimal::new(125075, 2)));
        let valid = req.validate().unwrap();
        let row = Payment::captured(1, 4, &req, valid, "memo".into(), "ops", chrono::Utc::now());

        assert_eq!(row.amount_in_paise, 125075);
        assert_eq!(row.currency, CURRENCY);
        assert_eq!(row.payment_date.to_rfc3339(), "2026-03-14T00:00:00+00:00");
        assert!(row.is_captured());
    }
}
