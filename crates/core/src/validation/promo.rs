//! Promo code rules and discount arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CoreError, CoreResult};
use crate::messages::promo as msg;
use crate::types::{Money, Timestamp};
use crate::validation::fields::{max_chars, require_positive, require_text};
use crate::validation::formats::is_valid_promo_code;

pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Validate and normalize a promo code to its stored uppercase form.
pub fn normalize_code(raw: Option<&str>) -> CoreResult<String> {
    let code = require_text(raw, msg::CODE_REQUIRED)?;
    if !is_valid_promo_code(code) {
        return Err(CoreError::validation(msg::CODE_FORMAT));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_description(raw: Option<&str>) -> CoreResult<&str> {
    let description = require_text(raw, msg::DESCRIPTION_REQUIRED)?;
    max_chars(description, MAX_DESCRIPTION_CHARS, msg::DESCRIPTION_TOO_LONG)?;
    Ok(description)
}

/// A percentage discount may not exceed 100.
pub fn validate_discount(value: Option<Money>, is_percent: bool) -> CoreResult<Money> {
    let value = require_positive(value, msg::INVALID_DISCOUNT)?;
    if is_percent && value > Decimal::ONE_HUNDRED {
        return Err(CoreError::validation(msg::INVALID_PERCENTAGE));
    }
    Ok(value)
}

/// An absent expiry date means the promo never expires.
pub fn validate_dates(
    start: Option<Timestamp>,
    expiry: Option<Timestamp>,
) -> CoreResult<(Timestamp, Option<Timestamp>)> {
    let start = start.ok_or_else(|| CoreError::validation(msg::START_DATE_REQUIRED))?;
    if let Some(expiry) = expiry {
        if expiry < start {
            return Err(CoreError::validation(msg::EXPIRY_BEFORE_START));
        }
    }
    Ok((start, expiry))
}

/// Whether two promo validity windows share at least one instant.
pub fn ranges_overlap(
    a_start: Timestamp,
    a_expiry: Option<Timestamp>,
    b_start: Timestamp,
    b_expiry: Option<Timestamp>,
) -> bool {
    let a_before_b_ends = b_expiry.is_none_or(|end| a_start <= end);
    let b_before_a_ends = a_expiry.is_none_or(|end| b_start <= end);
    a_before_b_ends && b_before_a_ends
}

/// Discount granted on `total`.
///
/// Percentages are rounded half away from zero to two decimals; flat amounts
/// never exceed the total.
pub fn calculate_discount(total: Money, value: Money, is_percent: bool) -> Money {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if is_percent {
        round_cents(total * value / Decimal::ONE_HUNDRED)
    } else {
        value.min(total)
    }
}

pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
