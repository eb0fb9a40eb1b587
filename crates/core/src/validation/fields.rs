//! Small field-level checks shared by all request validators.

use crate::error::{CoreError, CoreResult};

/// Fail with `message` unless `value` holds non-whitespace text.
pub fn require_text<'a>(value: Option<&'a str>, message: &str) -> CoreResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::validation(message)),
    }
}

/// Fail with `message` when `value` is longer than `max` characters.
pub fn max_chars(value: &str, max: usize, message: &str) -> CoreResult<()> {
    if value.chars().count() > max {
        return Err(CoreError::validation(message));
    }
    Ok(())
}

/// Fail with `message` unless `value` is present and strictly positive.
pub fn require_positive<T>(value: Option<T>, message: &str) -> CoreResult<T>
where
    T: PartialOrd + Default,
{
    match value {
        Some(v) if v > T::default() => Ok(v),
        _ => Err(CoreError::validation(message)),
    }
}

/// Fail with `message` unless `value` is present and zero or more.
pub fn require_non_negative<T>(value: Option<T>, message: &str) -> CoreResult<T>
where
    T: PartialOrd + Default,
{
    match value {
        Some(v) if v >= T::default() => Ok(v),
        _ => Err(CoreError::validation(message)),
    }
}

/// Fail with `message` unless `value` is a present, positive id.
pub fn require_id(value: Option<i64>, message: &str) -> CoreResult<i64> {
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(CoreError::validation(message)),
    }
}

/// Fail with `message` when `condition` is false.
pub fn ensure(condition: bool, message: &str) -> CoreResult<()> {
    if condition {
        Ok(())
    } else {
        Err(CoreError::validation(message))
    }
}
