//! Promo entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::promo::{
    normalize_code, validate_dates, validate_description, validate_discount,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

/// A row from the `promos` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Promo {
    pub id: DbId,
    pub client_id: DbId,
    pub promo_code: String,
    pub description: String,
    pub discount_value: Money,
    pub is_percent: bool,
    pub start_date: Timestamp,
    pub expiry_date: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Promo);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("promo_code"),
    ColumnSpec::text("description"),
    ColumnSpec::number("discount_value"),
    ColumnSpec::boolean("is_percent"),
    ColumnSpec::date("start_date"),
    ColumnSpec::date("expiry_date"),
    ColumnSpec::date("created_at"),
];

/// Body of `POST /promos` and one item of `POST /promos/bulk`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PromoRequest {
    pub promo_code: Option<String>,
    pub description: Option<String>,
    pub discount_value: Option<Money>,
    #[serde(default)]
    pub is_percent: bool,
    pub start_date: Option<Timestamp>,
    pub expiry_date: Option<Timestamp>,
}

/// Body of `POST /promos/{id}/discount`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountRequest {
    pub total: Money,
}

impl PromoRequest {
    /// Validate and build the row for `client_id`.
    pub fn into_promo(&self, client_id: DbId, actor: &str, now: Timestamp) -> CoreResult<Promo> {
        let promo_code = normalize_code(self.promo_code.as_deref())?;
        let description = validate_description(self.description.as_deref())?;
        let discount_value = validate_discount(self.discount_value, self.is_percent)?;
        let (start_date, expiry_date) = validate_dates(self.start_date, self.expiry_date)?;
        Ok(Promo {
            id: 0,
            client_id,
            promo_code,
            description: description.to_string(),
            discount_value,
            is_percent: self.is_percent,
            start_date,
            expiry_date,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        })
    }
}

impl Promo {
    /// Active on `at`: started, not expired.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.start_date <= at && self.expiry_date.is_none_or(|end| at <= end)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bizhub_core::error::CoreError;
    use bizhub_core::messages::promo as msg;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn test_into_promo_uppercases_code() {
        let now = Utc::now();
        let req = PromoRequest {
            promo_code: Some("diwali10".into()),
            description: Some("Festive offer".into()),
            discount_value: Some(Money::TEN),
            is_percent: true,
            start_date: Some(now),
            expiry_date: Some(now + Duration::days(5)),
        };
        let promo = req.into_promo(1, "ops", now).unwrap();
        assert_eq!(promo.promo_code, "DIWALI10");
        assert!(promo.is_active_at(now + Duration::days(1)));
        assert!(!promo.is_active_at(now + Duration::days(6)));
    }

    #[test]
    fn test_description_checked_after_code() {
        let req = PromoRequest {
            promo_code: Some("OK10".into()),
            description: None,
            discount_value: Some(Money::TEN),
            ..Default::default()
        };
        assert_matches!(
            req.into_promo(1, "ops", Utc::now()),
            Err(CoreError::Validation(m)) if m == msg::DESCRIPTION_REQUIRED
        );
    }
}
