//! Audit log constants and description helpers.
//!
//! Every mutating service call writes one user-log entry after its primary
//! write succeeds. The action tag groups entries; the description is the
//! human-readable line shown in the activity feed.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action tags for user-log entries.
pub mod action_types {
    pub const INSERT: &str = "insert";
    pub const UPDATE: &str = "update";
    pub const TOGGLE: &str = "toggle";
    pub const DELETE: &str = "delete";
    pub const BULK_INSERT: &str = "bulk_insert";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
    pub const MARK_READ: &str = "mark_read";
    pub const LOGIN: &str = "login";
    pub const CONFIRM_EMAIL: &str = "confirm_email";
    pub const RESET_PASSWORD: &str = "reset_password";
    pub const PAYMENT: &str = "payment";
    pub const CANCEL: &str = "cancel";
    pub const SCORE: &str = "score";
}

/// Maximum stored length of a description; longer text is truncated.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Build the description for an entity mutation, e.g.
/// `"Successfully inserted address. Id: 7"`.
pub fn describe(summary: &str, id: DbId) -> String {
    truncate_description(format!("{summary} Id: {id}"))
}

/// Build a description without an entity id (bulk and login entries).
pub fn describe_plain(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        truncate_description(summary.to_string())
    } else {
        truncate_description(format!("{summary} {detail}"))
    }
}

fn truncate_description(mut text: String) -> String {
    if text.chars().count() > MAX_DESCRIPTION_LEN {
        text = text.chars().take(MAX_DESCRIPTION_LEN).collect();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_appends_id() {
        assert_eq!(
            describe("Successfully inserted address.", 7),
            "Successfully inserted address. Id: 7"
        );
    }

    #[test]
    fn test_describe_plain_without_detail() {
        assert_eq!(describe_plain("Successfully signed in.", ""), "Successfully signed in.");
    }

    #[test]
    fn test_long_descriptions_are_truncated() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 50);
        assert_eq!(describe_plain(&long, "").chars().count(), MAX_DESCRIPTION_LEN);
    }
}
