//! Purchase order statuses, priorities and line-item rules.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::messages::purchase_order as msg;
use crate::types::{DbId, Money};
use crate::validation::fields::{require_id, require_text};
use crate::validation::formats::is_valid_url;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

pub mod statuses {
    pub const DRAFT: &str = "DRAFT";
    pub const PENDING_APPROVAL: &str = "PENDING_APPROVAL";
    pub const APPROVED: &str = "APPROVED";
    pub const APPROVED_WITH_PARTIAL_PAYMENT: &str = "APPROVED_WITH_PARTIAL_PAYMENT";
    pub const REJECTED: &str = "REJECTED";
    pub const SENT_TO_VENDOR: &str = "SENT_TO_VENDOR";
    pub const ACKNOWLEDGED: &str = "ACKNOWLEDGED";
    pub const IN_PRODUCTION: &str = "IN_PRODUCTION";
    pub const SHIPPED: &str = "SHIPPED";
    pub const PARTIALLY_RECEIVED: &str = "PARTIALLY_RECEIVED";
    pub const RECEIVED: &str = "RECEIVED";
    pub const COMPLETED: &str = "COMPLETED";
    pub const CANCELLED: &str = "CANCELLED";
    pub const ON_HOLD: &str = "ON_HOLD";

    pub const ALL: &[&str] = &[
        DRAFT,
        PENDING_APPROVAL,
        APPROVED,
        APPROVED_WITH_PARTIAL_PAYMENT,
        REJECTED,
        SENT_TO_VENDOR,
        ACKNOWLEDGED,
        IN_PRODUCTION,
        SHIPPED,
        PARTIALLY_RECEIVED,
        RECEIVED,
        COMPLETED,
        CANCELLED,
        ON_HOLD,
    ];
}

pub const PRIORITIES: &[&str] = &["LOW", "MEDIUM", "HIGH", "URGENT"];

pub const MAX_ATTACHMENTS: usize = 30;

/// One ordered product, stored in the order's `line_items` JSONB column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: DbId,
    pub quantity: i32,
    pub price_per_unit: Money,
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Returns the canonical uppercase status.
pub fn normalize_status(raw: Option<&str>) -> CoreResult<&'static str> {
    let status = require_text(raw, msg::STATUS_REQUIRED)?.to_ascii_uppercase();
    statuses::ALL
        .iter()
        .copied()
        .find(|s| *s == status)
        .ok_or_else(|| CoreError::validation(msg::INVALID_STATUS))
}

pub fn normalize_priority(raw: Option<&str>) -> CoreResult<&'static str> {
    let priority = raw.map(|p| p.trim().to_ascii_uppercase()).unwrap_or_default();
    PRIORITIES
        .iter()
        .copied()
        .find(|p| *p == priority)
        .ok_or_else(|| CoreError::validation(msg::INVALID_PRIORITY))
}

pub fn validate_assigned_lead(lead_id: Option<DbId>) -> CoreResult<DbId> {
    require_id(lead_id, msg::ASSIGNED_LEAD_REQUIRED)
}

/// Every product appears at most once, with a positive quantity and a
/// non-negative unit price.
pub fn validate_line_items(items: &[LineItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::validation(msg::PRODUCTS_REQUIRED));
    }
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.product_id <= 0 || item.quantity <= 0 {
            return Err(CoreError::validation(msg::INVALID_PRODUCT));
        }
        if item.price_per_unit < Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "{}{}",
                msg::NEGATIVE_PRICE_PREFIX,
                item.product_id
            )));
        }
        if !seen.insert(item.product_id) {
            return Err(CoreError::validation(format!(
                "{}{}",
                msg::DUPLICATE_PRODUCT_PREFIX,
                item.product_id
            )));
        }
    }
    Ok(())
}

pub fn validate_attachments(urls: &[String]) -> CoreResult<()> {
    if urls.len() > MAX_ATTACHMENTS {
        return Err(CoreError::validation(msg::MAX_ATTACHMENTS));
    }
    if urls.iter().any(|u| !is_valid_url(u)) {
        return Err(CoreError::validation(msg::INVALID_ATTACHMENT));
    }
    Ok(())
}

/// Payment amounts that are present must be zero or more.
pub fn validate_amounts(amounts: &[Option<Money>]) -> CoreResult<()> {
    if amounts.iter().flatten().any(|a| *a < Decimal::ZERO) {
        return Err(CoreError::validation(msg::INVALID_AMOUNT));
    }
    Ok(())
}

/// Sum of `quantity * price_per_unit` across the line items.
pub fn line_items_total(items: &[LineItem]) -> Money {
    items
        .iter()
        .map(|i| Decimal::from(i.quantity) * i.price_per_unit)
        .sum()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// `price_cents` is the unit price in hundredths.
    fn item(product_id: DbId, quantity: i32, price_cents: i64) -> LineItem {
        LineItem {
            product_id,
            quantity,
            price_per_unit: Decimal::new(price_cents, 2),
        }
    }

    #[test]
    fn test_status_is_case_insensitive() {
        assert_eq!(normalize_status(Some("on_hold")).unwrap(), statuses::ON_HOLD);
        assert_matches!(
            normalize_status(Some("LOST")),
            Err(CoreError::Validation(m)) if m == msg::INVALID_STATUS
        );
        assert_matches!(
            normalize_status(Some(" ")),
            Err(CoreError::Validation(m)) if m == msg::STATUS_REQUIRED
        );
    }

    #[test]
    fn test_priority() {
        assert_eq!(normalize_priority(Some("urgent")).unwrap(), "URGENT");
        assert!(normalize_priority(None).is_err());
    }

    #[test]
    fn test_line_items_must_not_be_empty() {
        assert_matches!(
            validate_line_items(&[]),
            Err(CoreError::Validation(m)) if m == msg::PRODUCTS_REQUIRED
        );
    }

    #[test]
    fn test_line_item_rules() {
        assert!(validate_line_items(&[item(1, 2, 0), item(2, 1, 950)]).is_ok());
        assert_matches!(
            validate_line_items(&[item(1, 0, 500)]),
            Err(CoreError::Validation(m)) if m == msg::INVALID_PRODUCT
        );
        assert_matches!(
            validate_line_items(&[item(7, 1, -100)]),
            Err(CoreError::Validation(m)) if m.ends_with("productId 7")
        );
        assert_matches!(
            validate_line_items(&[item(3, 1, 100), item(3, 2, 100)]),
            Err(CoreError::Validation(m)) if m == format!("{}3", msg::DUPLICATE_PRODUCT_PREFIX)
        );
    }

    #[test]
    fn test_attachment_limit() {
        let urls: Vec<String> = (0..=MAX_ATTACHMENTS)
            .map(|i| format!("https://files.example.com/{i}.pdf"))
            .collect();
        assert_matches!(
            validate_attachments(&urls),
            Err(CoreError::Validation(m)) if m == msg::MAX_ATTACHMENTS
        );
        assert!(validate_attachments(&urls[..MAX_ATTACHMENTS]).is_ok());
        assert!(validate_attachments(&["invoice".to_string()]).is_err());
    }

    #[test]
    fn test_total() {
        assert_eq!(
            line_items_total(&[item(1, 2, 250), item(2, 1, 1000)]),
            Decimal::new(15, 0)
        );
        assert!(validate_amounts(&[Some(Decimal::ONE), None, Some(Decimal::ZERO)]).is_ok());
        assert!(validate_amounts(&[Some(Decimal::new(-1, 2))]).is_err());
    }
}
