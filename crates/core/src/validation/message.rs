//! Message content and email-scheduling rules.
//!
//! A message may be emailed to its recipients. With a publish date the email
//! is scheduled (under a batch id) inside a 72-hour window; without one it is
//! sent immediately. Once emailing is enabled it cannot be switched off, and a
//! scheduled date cannot be moved.

use chrono::Duration;

use crate::error::{CoreError, CoreResult};
use crate::messages::message as msg;
use crate::types::{DbId, Timestamp};
use crate::validation::fields::{max_chars, require_text};

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// How far ahead an email may be scheduled.
pub const SCHEDULE_WINDOW_HOURS: i64 = 72;

/// Validate title, body and recipients. Returns the trimmed title and body.
pub fn validate_content<'a>(
    title: Option<&'a str>,
    description_html: Option<&'a str>,
    user_ids: &[DbId],
    group_ids: &[DbId],
) -> CoreResult<(&'a str, &'a str)> {
    let title = require_text(title, msg::TITLE_REQUIRED)?;
    max_chars(title, MAX_TITLE_CHARS, msg::TITLE_TOO_LONG)?;
    let description = require_text(description_html, msg::DESCRIPTION_REQUIRED)?;
    if user_ids.is_empty() && group_ids.is_empty() {
        return Err(CoreError::validation(msg::RECIPIENTS_REQUIRED));
    }
    if user_ids.iter().chain(group_ids).any(|id| *id <= 0) {
        return Err(CoreError::validation(msg::INVALID_RECIPIENT));
    }
    Ok((title, description))
}

/// Validate the requested email settings on their own.
pub fn validate_schedule(
    send_as_email: bool,
    publish_date: Option<Timestamp>,
    now: Timestamp,
) -> CoreResult<()> {
    let Some(publish_date) = publish_date else {
        return Ok(());
    };
    if !send_as_email {
        return Err(CoreError::validation(msg::PUBLISH_DATE_REQUIRES_EMAIL));
    }
    if publish_date <= now {
        return Err(CoreError::validation(msg::PUBLISH_DATE_IN_PAST));
    }
    if publish_date > now + Duration::hours(SCHEDULE_WINDOW_HOURS) {
        return Err(CoreError::validation(msg::PUBLISH_DATE_BEYOND_WINDOW));
    }
    Ok(())
}

/// Stored email settings of an existing message.
#[derive(Debug, Clone, Copy)]
pub struct EmailState {
    pub send_as_email: bool,
    pub publish_date: Option<Timestamp>,
}

impl EmailState {
    pub fn is_scheduled(&self) -> bool {
        self.send_as_email && self.publish_date.is_some()
    }
}

/// Validate a change of email settings against the stored ones.
///
/// The already-sent check comes first: once the scheduled time has passed the
/// message is frozen regardless of what else changed.
pub fn validate_schedule_change(
    existing: EmailState,
    send_as_email: bool,
    publish_date: Option<Timestamp>,
    now: Timestamp,
) -> CoreResult<()> {
    if let (true, Some(scheduled)) = (existing.send_as_email, existing.publish_date) {
        if scheduled <= now {
            return Err(CoreError::validation(msg::ALREADY_SENT));
        }
    }

    if existing.send_as_email && !send_as_email {
        let message = if existing.is_scheduled() {
            msg::CANNOT_DISABLE_SCHEDULED_EMAIL
        } else {
            msg::CANNOT_DISABLE_EMAIL
        };
        return Err(CoreError::validation(message));
    }

    if existing.is_scheduled() && publish_date != existing.publish_date {
        return Err(CoreError::validation(msg::CANNOT_MODIFY_SCHEDULED_DATE));
    }

    if existing.send_as_email && existing.publish_date.is_none() && publish_date.is_some() {
        return Err(CoreError::validation(msg::CANNOT_ADD_PUBLISH_DATE_AFTER_SENT));
    }

    validate_schedule(send_as_email, publish_date, now)
}

/// What the service must do with the outbound email after saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailPlan {
    /// No email.
    Skip,
    /// Deliver right away, without a batch id.
    SendNow,
    /// Schedule under a fresh batch id.
    Schedule(Timestamp),
}

pub fn plan_for_create(send_as_email: bool, publish_date: Option<Timestamp>) -> EmailPlan {
    match (send_as_email, publish_date) {
        (false, _) => EmailPlan::Skip,
        (true, Some(at)) => EmailPlan::Schedule(at),
        (true, None) => EmailPlan::SendNow,
    }
}

/// An immediate email that already went out is not sent again on edit.
/// A scheduled one is rescheduled so the recipients get the edited content.
pub fn plan_for_update(
    existing: EmailState,
    send_as_email: bool,
    publish_date: Option<Timestamp>,
) -> EmailPlan {
    match plan_for_create(send_as_email, publish_date) {
        EmailPlan::SendNow if existing.send_as_email => EmailPlan::Skip,
        plan => plan,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn rejected_with(result: CoreResult<()>, expected: &str) {
        assert_eq!(result, Err(CoreError::validation(expected)));
    }

    #[test]
    fn test_content_requires_title_body_and_recipients() {
        assert_matches!(
            validate_content(Some(" "), Some("<p>x</p>"), &[1], &[]),
            Err(CoreError::Validation(m)) if m == msg::TITLE_REQUIRED
        );
        assert_matches!(
            validate_content(Some("Hi"), None, &[1], &[]),
            Err(CoreError::Validation(m)) if m == msg::DESCRIPTION_REQUIRED
        );
        assert_matches!(
            validate_content(Some("Hi"), Some("<p>x</p>"), &[], &[]),
            Err(CoreError::Validation(m)) if m == msg::RECIPIENTS_REQUIRED
        );
        assert_eq!(
            validate_content(Some(" Hi "), Some("<p>x</p>"), &[], &[4]).unwrap(),
            ("Hi", "<p>x</p>")
        );
    }

    #[test]
    fn test_title_longer_than_500_chars_is_rejected() {
        let title = "t".repeat(MAX_TITLE_CHARS + 1);
        assert_matches!(
            validate_content(Some(&title), Some("<p>x</p>"), &[1], &[]),
            Err(CoreError::Validation(m)) if m == msg::TITLE_TOO_LONG
        );
    }

    #[test]
    fn test_publish_date_requires_send_as_email() {
        let now = Utc::now();
        rejected_with(
            validate_schedule(false, Some(now + Duration::hours(1)), now),
            msg::PUBLISH_DATE_REQUIRES_EMAIL,
        );
    }

    #[test]
    fn test_publish_date_window() {
        let now = Utc::now();
        assert!(validate_schedule(true, Some(now + Duration::hours(1)), now).is_ok());
        assert!(validate_schedule(true, Some(now + Duration::hours(72)), now).is_ok());
        rejected_with(
            validate_schedule(true, Some(now + Duration::hours(74)), now),
            msg::PUBLISH_DATE_BEYOND_WINDOW,
        );
        rejected_with(
            validate_schedule(true, Some(now - Duration::minutes(1)), now),
            msg::PUBLISH_DATE_IN_PAST,
        );
        assert!(validate_schedule(true, None, now).is_ok());
    }

    #[test]
    fn test_cannot_disable_email_once_enabled() {
        let now = Utc::now();
        let sent = EmailState { send_as_email: true, publish_date: None };
        rejected_with(
            validate_schedule_change(sent, false, None, now),
            msg::CANNOT_DISABLE_EMAIL,
        );

        let scheduled = EmailState {
            send_as_email: true,
            publish_date: Some(now + Duration::hours(5)),
        };
        rejected_with(
            validate_schedule_change(scheduled, false, None, now),
            msg::CANNOT_DISABLE_SCHEDULED_EMAIL,
        );
    }

    #[test]
    fn test_scheduled_date_cannot_move() {
        let now = Utc::now();
        let at = now + Duration::hours(5);
        let scheduled = EmailState { send_as_email: true, publish_date: Some(at) };
        rejected_with(
            validate_schedule_change(scheduled, true, Some(at + Duration::hours(1)), now),
            msg::CANNOT_MODIFY_SCHEDULED_DATE,
        );
        assert!(validate_schedule_change(scheduled, true, Some(at), now).is_ok());
    }

    #[test]
    fn test_past_scheduled_message_is_frozen() {
        let now = Utc::now();
        let sent = EmailState {
            send_as_email: true,
            publish_date: Some(now - Duration::hours(1)),
        };
        rejected_with(
            validate_schedule_change(sent, true, sent.publish_date, now),
            msg::ALREADY_SENT,
        );
    }

    #[test]
    fn test_cannot_add_date_after_immediate_send() {
        let now = Utc::now();
        let sent = EmailState { send_as_email: true, publish_date: None };
        rejected_with(
            validate_schedule_change(sent, true, Some(now + Duration::hours(2)), now),
            msg::CANNOT_ADD_PUBLISH_DATE_AFTER_SENT,
        );
    }

    #[test]
    fn test_plans() {
        let at = Utc::now() + Duration::hours(3);
        assert_eq!(plan_for_create(false, None), EmailPlan::Skip);
        assert_eq!(plan_for_create(true, None), EmailPlan::SendNow);
        assert_eq!(plan_for_create(true, Some(at)), EmailPlan::Schedule(at));

        let sent = EmailState { send_as_email: true, publish_date: None };
        assert_eq!(plan_for_update(sent, true, None), EmailPlan::Skip);
        let fresh = EmailState { send_as_email: false, publish_date: None };
        assert_eq!(plan_for_update(fresh, true, None), EmailPlan::SendNow);
    }
}
