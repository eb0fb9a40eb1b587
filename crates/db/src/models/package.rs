//! Package entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::package as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::fields::{require_non_negative, require_positive, require_text};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

/// A row from the `packages` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Package {
    pub id: DbId,
    pub client_id: DbId,
    pub package_name: String,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub max_weight: f64,
    pub standard_capacity: f64,
    pub price_per_unit: Money,
    pub package_type: String,
    pub quantity: i32,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Package);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("package_name"),
    ColumnSpec::number("length"),
    ColumnSpec::number("breadth"),
    ColumnSpec::number("height"),
    ColumnSpec::number("max_weight"),
    ColumnSpec::number("standard_capacity"),
    ColumnSpec::number("price_per_unit"),
    ColumnSpec::text("package_type"),
    ColumnSpec::number("quantity"),
    ColumnSpec::date("created_at"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageRequest {
    pub package_name: Option<String>,
    pub length: Option<f64>,
    pub breadth: Option<f64>,
    pub height: Option<f64>,
    pub max_weight: Option<f64>,
    pub standard_capacity: Option<f64>,
    pub price_per_unit: Option<Money>,
    pub package_type: Option<String>,
    pub quantity: Option<i32>,
}

impl PackageRequest {
    pub fn validate(&self) -> CoreResult<()> {
        require_text(self.package_name.as_deref(), msg::NAME_REQUIRED)?;
        require_positive(self.length, msg::INVALID_LENGTH)?;
        require_positive(self.breadth, msg::INVALID_BREADTH)?;
        require_positive(self.height, msg::INVALID_HEIGHT)?;
        require_non_negative(self.max_weight, msg::INVALID_MAX_WEIGHT)?;
        require_positive(self.standard_capacity, msg::INVALID_STANDARD_CAPACITY)?;
        require_non_negative(self.price_per_unit, msg::INVALID_PRICE_PER_UNIT)?;
        require_text(self.package_type.as_deref(), msg::TYPE_REQUIRED)?;
        if !self.quantity.is_some_and(|q| q > 0) {
            return Err(CoreError::validation(msg::INVALID_QUANTITY));
        }
        Ok(())
    }

    /// Copy validated fields onto `package`.
    pub fn apply_to(&self, package: &mut Package) {
        package.package_name = self.package_name.as_deref().unwrap_or_default().trim().to_string();
        package.length = self.length.unwrap_or_default();
        package.breadth = self.breadth.unwrap_or_default();
        package.height = self.height.unwrap_or_default();
        package.max_weight = self.max_weight.unwrap_or_default();
        package.standard_capacity = self.standard_capacity.unwrap_or_default();
        package.price_per_unit = self.price_per_unit.unwrap_or_default();
        package.package_type = self.package_type.as_deref().unwrap_or_default().trim().to_string();
        package.quantity = self.quantity.unwrap_or_default();
    }
}

impl Package {
    pub fn new(client_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            package_name: String::new(),
            length: 0.0,
            breadth: 0.0,
            height: 0.0,
            max_weight: 0.0,
            standard_capacity: 0.0,
            price_per_unit: Money::ZERO,
            package_type: String::new(),
            quantity: 0,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }

    /// Same box: dimensions and type match.
    pub fn same_dimensions(&self, other: &Package) -> bool {
        self.length == other.length
            && self.breadth == other.breadth
            && self.height == other.height
            && self.package_type.eq_ignore_ascii_case(&other.package_type)
    }
}
