//! Lead entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::lead as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::fields::require_text;
use bizhub_core::validation::formats::{is_valid_email, is_valid_phone, normalize_phone};
use bizhub_core::validation::vocab::{is_lead_status, LEAD_STATUSES};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::address::{AddressFields, AddressRequest};
use super::{tenant_entity, trimmed};

/// A row from the `leads` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub client_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub company_size: Option<i32>,
    pub lead_status: String,
    pub annual_revenue: Option<Money>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub address_id: DbId,
    pub assigned_agent_id: Option<DbId>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Lead);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("first_name"),
    ColumnSpec::text("last_name"),
    ColumnSpec::text("email"),
    ColumnSpec::text("phone"),
    ColumnSpec::text("company"),
    ColumnSpec::number("company_size"),
    ColumnSpec::text("lead_status"),
    ColumnSpec::number("annual_revenue"),
    ColumnSpec::number("assigned_agent_id"),
    ColumnSpec::date("created_at"),
];

/// Create/update body for a lead. Either `address` or `address_id` is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub company_size: Option<i32>,
    pub lead_status: Option<String>,
    pub annual_revenue: Option<Money>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub address: Option<AddressRequest>,
    pub address_id: Option<DbId>,
    pub assigned_agent_id: Option<DbId>,
}

/// Where a validated lead's address comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadAddress {
    New(AddressFields),
    Existing(DbId),
}

fn invalid_status() -> CoreError {
    CoreError::validation(format!("{}{}", msg::INVALID_STATUS_PREFIX, LEAD_STATUSES.join(", ")))
}

impl LeadRequest {
    pub fn validate(&self) -> CoreResult<LeadAddress> {
        let email = require_text(self.email.as_deref(), msg::EMAIL_REQUIRED)?;
        if !is_valid_email(email) {
            return Err(CoreError::validation(msg::INVALID_EMAIL));
        }
        require_text(self.first_name.as_deref(), msg::FIRST_NAME_REQUIRED)?;
        require_text(self.last_name.as_deref(), msg::LAST_NAME_REQUIRED)?;
        let phone = require_text(self.phone.as_deref(), msg::PHONE_REQUIRED)?;
        if !is_valid_phone(phone) {
            return Err(CoreError::validation(msg::INVALID_PHONE));
        }
        match self.lead_status.as_deref() {
            Some(status) if is_lead_status(status) => {}
            _ => return Err(invalid_status()),
        }

        let address = match (&self.address, self.address_id) {
            (Some(address), _) => LeadAddress::New(address.validate()?),
            (None, Some(id)) if id > 0 => LeadAddress::Existing(id),
            _ => return Err(CoreError::validation(msg::ADDRESS_REQUIRED)),
        };

        if self.company_size.is_some_and(|size| size <= 0) {
            return Err(CoreError::validation(msg::INVALID_COMPANY_SIZE));
        }
        if self.assigned_agent_id.is_some_and(|id| id <= 0) {
            return Err(CoreError::validation(msg::INVALID_AGENT));
        }
        Ok(address)
    }

    /// Copy request-owned fields onto `lead`; the address id is set by the caller.
    pub fn apply_to(&self, lead: &mut Lead) {
        let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        lead.first_name = text(&self.first_name);
        lead.last_name = text(&self.last_name);
        lead.email = text(&self.email).to_lowercase();
        lead.phone = normalize_phone(&text(&self.phone));
        lead.company = trimmed(&self.company);
        lead.company_size = self.company_size;
        lead.lead_status = text(&self.lead_status);
        lead.annual_revenue = self.annual_revenue;
        lead.website = trimmed(&self.website);
        lead.notes = trimmed(&self.notes);
        lead.assigned_agent_id = self.assigned_agent_id;
    }
}

impl Lead {
    pub fn new(client_id: DbId, address_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: None,
            company_size: None,
            lead_status: String::new(),
            annual_revenue: None,
            website: None,
            notes: None,
            address_id,
            assigned_agent_id: None,
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

    use super::*;

    fn request() -> LeadRequest {
        LeadRequest {
            first_name: Some("Meera".into()),
            last_name: Some("Iyer".into()),
            email: Some("Meera@Example.com".into()),
            phone: Some("+91 98200 01234".into()),
            lead_status: Some("Not Contacted".into()),
            address_id: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_existing_address_id_accepted() {
        assert_eq!(request().validate().unwrap(), LeadAddress::Existing(4));
    }

    #[test]
    fn test_address_required() {
        let mut req = request();
        req.address_id = None;
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m == msg::ADDRESS_REQUIRED
        );
    }

    #[test]
    fn test_status_must_be_listed() {
        let mut req = request();
        req.lead_status = Some("Hot".into());
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m.starts_with(msg::INVALID_STATUS_PREFIX)
        );
    }

    #[test]
    fn test_email_format_checked_before_names() {
        let mut req = request();
        req.email = Some("meera@".into());
        req.first_name = None;
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m == msg::INVALID_EMAIL
        );
    }

    #[test]
    fn test_company_size_must_be_positive() {
        let mut req = request();
        req.company_size = Some(0);
        assert_matches!(
            req.validate(),
            Err(CoreError::Validation(m)) if m == msg::INVALID_COMPANY_SIZE
        );
    }

    #[test]
    fn test_apply_normalizes_email_and_phone() {
        let req = request();
        let mut lead = Lead::new(1, 4, "ops", chrono::Utc::now());
        req.apply_to(&mut lead);
        assert_eq!(lead.email, "meera@example.com");
        assert_eq!(lead.phone, "+919820001234");
    }
}
