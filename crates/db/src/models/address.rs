//! Address entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::address as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::require_text;
use bizhub_core::validation::formats::is_valid_postal_code;
use bizhub_core::validation::vocab::normalize_address_type;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{tenant_entity, trimmed};

/// A row from the `addresses` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Address {
    pub id: DbId,
    pub client_id: DbId,
    pub address_type: String,
    pub street_address: String,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub name_on_address: Option<String>,
    pub email_on_address: Option<String>,
    pub phone_on_address: Option<String>,
    pub user_id: Option<DbId>,
    pub is_primary: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Address);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("address_type"),
    ColumnSpec::text("street_address"),
    ColumnSpec::text("city"),
    ColumnSpec::text("state"),
    ColumnSpec::text("postal_code"),
    ColumnSpec::text("country"),
    ColumnSpec::text("name_on_address"),
    ColumnSpec::number("user_id"),
    ColumnSpec::boolean("is_primary"),
    ColumnSpec::date("created_at"),
];

/// Create/update body for an address, also embedded in lead, pickup
/// location and purchase order requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AddressRequest {
    pub address_type: Option<String>,
    pub street_address: Option<String>,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub name_on_address: Option<String>,
    pub email_on_address: Option<String>,
    pub phone_on_address: Option<String>,
    pub user_id: Option<DbId>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Validated address fields, trimmed and with the type in stored form.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFields {
    pub address_type: String,
    pub street_address: String,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub name_on_address: Option<String>,
    pub email_on_address: Option<String>,
    pub phone_on_address: Option<String>,
    pub user_id: Option<DbId>,
    pub is_primary: bool,
}

impl AddressRequest {
    pub fn validate(&self) -> CoreResult<AddressFields> {
        let street_address = require_text(self.street_address.as_deref(), msg::STREET_REQUIRED)?;
        let city = require_text(self.city.as_deref(), msg::CITY_REQUIRED)?;
        let state = require_text(self.state.as_deref(), msg::STATE_REQUIRED)?;
        let postal_code = require_text(self.postal_code.as_deref(), msg::POSTAL_CODE_REQUIRED)?;
        if !is_valid_postal_code(postal_code) {
            return Err(CoreError::validation(msg::INVALID_POSTAL_CODE));
        }
        let country = require_text(self.country.as_deref(), msg::COUNTRY_REQUIRED)?;
        let address_type = self
            .address_type
            .as_deref()
            .and_then(normalize_address_type)
            .ok_or_else(|| CoreError::validation(msg::INVALID_TYPE))?;

        Ok(AddressFields {
            address_type: address_type.to_string(),
            street_address: street_address.to_string(),
            street_address2: trimmed(&self.street_address2),
            street_address3: trimmed(&self.street_address3),
            city: city.to_string(),
            state: state.to_string(),
            postal_code: postal_code.to_string(),
            country: country.to_string(),
            name_on_address: trimmed(&self.name_on_address),
            email_on_address: trimmed(&self.email_on_address),
            phone_on_address: trimmed(&self.phone_on_address),
            user_id: self.user_id,
            is_primary: self.is_primary,
        })
    }
}

impl Address {
    pub fn new(client_id: DbId, fields: AddressFields, actor: &str, now: Timestamp) -> Self {
        let mut address = Self {
            id: 0,
            client_id,
            address_type: String::new(),
            street_address: String::new(),
            street_address2: None,
            street_address3: None,
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            country: String::new(),
            name_on_address: None,
            email_on_address: None,
            phone_on_address: None,
            user_id: None,
            is_primary: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        };
        address.apply(fields);
        address
    }

    pub fn apply(&mut self, fields: AddressFields) {
        self.address_type = fields.address_type;
        self.street_address = fields.street_address;
        self.street_address2 = fields.street_address2;
        self.street_address3 = fields.street_address3;
        self.city = fields.city;
        self.state = fields.state;
        self.postal_code = fields.postal_code;
        self.country = fields.country;
        self.name_on_address = fields.name_on_address;
        self.email_on_address = fields.email_on_address;
        self.phone_on_address = fields.phone_on_address;
        self.user_id = fields.user_id;
        self.is_primary = fields.is_primary;
    }

    /// Whether this row already holds exactly `fields`, ignoring ownership flags.
    pub fn same_location(&self, fields: &AddressFields) -> bool {
        self.address_type == fields.address_type
            && self.street_address == fields.street_address
            && self.street_address2 == fields.street_address2
            && self.street_address3 == fields.street_address3
            && self.city == fields.city
            && self.state == fields.state
            && self.postal_code == fields.postal_code
            && self.country == fields.country
            && self.name_on_address == fields.name_on_address
            && self.email_on_address == fields.email_on_address
            && self.phone_on_address == fields.phone_on_address
    }
}
