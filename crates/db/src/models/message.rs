//! Message entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::message::{validate_content, validate_schedule, EmailState};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

/// A row from the `messages` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub description_html: String,
    pub send_as_email: bool,
    pub publish_date: Option<Timestamp>,
    /// Set while a scheduled email is pending with the email provider.
    pub batch_id: Option<String>,
    pub user_ids: Vec<DbId>,
    pub group_ids: Vec<DbId>,
    pub read_by_user_ids: Vec<DbId>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Message);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("title"),
    ColumnSpec::boolean("send_as_email"),
    ColumnSpec::date("publish_date"),
    ColumnSpec::text("batch_id"),
    ColumnSpec::date("created_at"),
];

impl Message {
    pub fn email_state(&self) -> EmailState {
        EmailState {
            send_as_email: self.send_as_email,
            publish_date: self.publish_date,
        }
    }

    pub fn is_read_by(&self, user_id: DbId) -> bool {
        self.read_by_user_ids.contains(&user_id)
    }

    /// Whether `user_id` is a direct recipient or a member of `group_member_ids`.
    pub fn addresses(&self, user_id: DbId, group_member_ids: &[DbId]) -> bool {
        self.user_ids.contains(&user_id) || group_member_ids.contains(&user_id)
    }
}

/// Create/update body for a message. Recipient lists replace the stored ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageRequest {
    pub title: Option<String>,
    pub description_html: Option<String>,
    #[serde(default)]
    pub send_as_email: bool,
    pub publish_date: Option<Timestamp>,
    #[serde(default)]
    pub user_ids: Vec<DbId>,
    #[serde(default)]
    pub group_ids: Vec<DbId>,
}

impl MessageRequest {
    /// Content plus stand-alone schedule rules. Updates additionally check
    /// the change against the stored message.
    pub fn validate(&self, now: Timestamp) -> CoreResult<()> {
        validate_content(
            self.title.as_deref(),
            self.description_html.as_deref(),
            &self.user_ids,
            &self.group_ids,
        )?;
        validate_schedule(self.send_as_email, self.publish_date, now)
    }

    /// Copy request-owned fields onto `message`. The batch id is left alone.
    pub fn apply_to(&self, message: &mut Message) {
        message.title = self.title.as_deref().unwrap_or_default().trim().to_string();
        message.description_html = self
            .description_html
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string();
        message.send_as_email = self.send_as_email;
        message.publish_date = self.publish_date;
        message.user_ids = dedup(&self.user_ids);
        message.group_ids = dedup(&self.group_ids);
    }
}

fn dedup(ids: &[DbId]) -> Vec<DbId> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl Message {
    pub fn new(client_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            title: String::new(),
            description_html: String::new(),
            send_as_email: false,
            publish_date: None,
            batch_id: None,
            user_ids: Vec::new(),
            group_ids: Vec::new(),
            read_by_user_ids: Vec::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bizhub_core::error::CoreError;
    use bizhub_core::messages::message as msg;
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn test_validate_combines_content_and_schedule() {
        let now = Utc::now();
        let mut req = MessageRequest {
            title: Some("Stock update".into()),
            description_html: Some("<p>New arrivals</p>".into()),
            send_as_email: false,
            publish_date: Some(now + Duration::hours(1)),
            user_ids: vec![2],
            group_ids: vec![],
        };
        assert_matches!(
            req.validate(now),
            Err(CoreError::Validation(m)) if m == msg::PUBLISH_DATE_REQUIRES_EMAIL
        );
        req.send_as_email = true;
        assert!(req.validate(now).is_ok());
    }

    #[test]
    fn test_apply_dedups_recipients() {
        let req = MessageRequest {
            title: Some(" Hi ".into()),
            description_html: Some("<p>x</p>".into()),
            user_ids: vec![3, 1, 3],
            ..Default::default()
        };
        let mut message = Message::new(1, "ops", Utc::now());
        req.apply_to(&mut message);
        assert_eq!(message.title, "Hi");
        assert_eq!(message.user_ids, vec![1, 3]);
    }
}
