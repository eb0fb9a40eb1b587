//! Pickup location entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::messages::pickup_location as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::{max_chars, require_text};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::address::{AddressFields, AddressRequest};
use super::tenant_entity;

/// Longest nickname the shipping provider accepts.
pub const MAX_NICKNAME_CHARS: usize = 36;

/// A row from the `pickup_locations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PickupLocation {
    pub id: DbId,
    pub client_id: DbId,
    pub address_nick_name: String,
    pub address_id: DbId,
    /// Provider-side id, set once registration succeeds.
    pub external_location_id: Option<String>,
    pub is_default: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(PickupLocation);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("address_nick_name"),
    ColumnSpec::number("address_id"),
    ColumnSpec::text("external_location_id"),
    ColumnSpec::boolean("is_default"),
    ColumnSpec::date("created_at"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PickupLocationRequest {
    pub address_nick_name: Option<String>,
    pub address: Option<AddressRequest>,
    #[serde(default)]
    pub is_default: bool,
}

impl PickupLocationRequest {
    /// Returns the trimmed nickname and the validated address.
    pub fn validate(&self) -> CoreResult<(String, AddressFields)> {
        let nickname = require_text(self.address_nick_name.as_deref(), msg::NICKNAME_REQUIRED)?;
        max_chars(nickname, MAX_NICKNAME_CHARS, msg::NICKNAME_TOO_LONG)?;
        let address = self.address.clone().unwrap_or_default().validate()?;
        Ok((nickname.to_string(), address))
    }
}

impl PickupLocation {
    pub fn new(
        client_id: DbId,
        nickname: String,
        address_id: DbId,
        is_default: bool,
        actor: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            id: 0,
            client_id,
            address_nick_name: nickname,
            address_id,
            external_location_id: None,
            is_default,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}
