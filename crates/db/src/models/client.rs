//! Client (tenant) entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::messages::client as msg;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::require_text;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::trimmed;
use crate::store::TenantEntity;

/// A row from the `clients` table. Its own `id` is the tenant key.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub support_email: String,
    pub website: String,
    pub sendgrid_sender_name: String,
    pub logo_url: Option<String>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

impl TenantEntity for Client {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }

    fn client_id(&self) -> DbId {
        self.id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn touch(&mut self, actor: &str, now: Timestamp) {
        self.modified_user = actor.to_string();
        self.updated_at = now;
    }
}

/// Body of `PUT /clients/current`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub description: Option<String>,
    pub support_email: Option<String>,
    pub website: Option<String>,
    pub sendgrid_sender_name: Option<String>,
    pub logo_url: Option<String>,
}

impl UpdateClient {
    pub fn validate(&self) -> CoreResult<()> {
        require_text(self.name.as_deref(), msg::NAME_REQUIRED)?;
        require_text(self.description.as_deref(), msg::DESCRIPTION_REQUIRED)?;
        require_text(self.support_email.as_deref(), msg::SUPPORT_EMAIL_REQUIRED)?;
        require_text(self.website.as_deref(), msg::WEBSITE_REQUIRED)?;
        require_text(self.sendgrid_sender_name.as_deref(), msg::SENDER_NAME_REQUIRED)?;
        Ok(())
    }

    /// Copy the validated fields onto `client`.
    pub fn apply_to(&self, client: &mut Client) {
        let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        client.name = text(&self.name);
        client.description = text(&self.description);
        client.support_email = text(&self.support_email);
        client.website = text(&self.website);
        client.sendgrid_sender_name = text(&self.sendgrid_sender_name);
        client.logo_url = trimmed(&self.logo_url);
    }
}
