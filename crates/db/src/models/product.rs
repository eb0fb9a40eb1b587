//! Product entity model and DTOs.

use bizhub_core::error::{CoreError, CoreResult};
use bizhub_core::messages::product as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::fields::{require_id, require_non_negative, require_text};
use bizhub_core::validation::vocab::{normalize_product_condition, PRODUCT_CONDITIONS};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tenant_entity;

/// A row from the `products` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub description_html: String,
    pub brand: String,
    pub color_label: String,
    pub condition: String,
    pub country_of_manufacture: String,
    pub price: Money,
    pub discount: Option<Money>,
    pub is_discount_percent: bool,
    pub category_id: DbId,
    pub weight_kgs: Option<f64>,
    pub length: Option<f64>,
    pub breadth: Option<f64>,
    pub height: Option<f64>,
    pub pickup_location_id: DbId,
    pub item_available_from: Option<Timestamp>,
    /// Whether buyers may return the product. Changed only by its own toggle.
    pub returns_allowed: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(Product);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("title"),
    ColumnSpec::text("brand"),
    ColumnSpec::text("color_label"),
    ColumnSpec::text("condition"),
    ColumnSpec::text("country_of_manufacture"),
    ColumnSpec::number("price"),
    ColumnSpec::number("category_id"),
    ColumnSpec::number("pickup_location_id"),
    ColumnSpec::date("item_available_from"),
    ColumnSpec::boolean("returns_allowed"),
    ColumnSpec::date("created_at"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRequest {
    pub title: Option<String>,
    pub description_html: Option<String>,
    pub brand: Option<String>,
    pub color_label: Option<String>,
    pub condition: Option<String>,
    pub country_of_manufacture: Option<String>,
    pub price: Option<Money>,
    pub discount: Option<Money>,
    #[serde(default)]
    pub is_discount_percent: bool,
    pub category_id: Option<DbId>,
    pub weight_kgs: Option<f64>,
    pub length: Option<f64>,
    pub breadth: Option<f64>,
    pub height: Option<f64>,
    pub pickup_location_id: Option<DbId>,
    pub item_available_from: Option<Timestamp>,
}

impl ProductRequest {
    /// Returns the condition in its stored spelling.
    pub fn validate(&self) -> CoreResult<&'static str> {
        require_text(self.title.as_deref(), msg::TITLE_REQUIRED)?;
        require_text(self.description_html.as_deref(), msg::DESCRIPTION_REQUIRED)?;
        require_text(self.brand.as_deref(), msg::BRAND_REQUIRED)?;
        require_text(self.color_label.as_deref(), msg::COLOR_LABEL_REQUIRED)?;
        let condition = require_text(self.condition.as_deref(), msg::CONDITION_REQUIRED)?;
        let condition = normalize_product_condition(condition).ok_or_else(|| {
            CoreError::validation(format!(
                "{}{}",
                msg::INVALID_CONDITION_PREFIX,
                PRODUCT_CONDITIONS.join(", ")
            ))
        })?;
        require_text(self.country_of_manufacture.as_deref(), msg::COUNTRY_REQUIRED)?;
        require_non_negative(self.price, msg::INVALID_PRICE)?;
        if self.category_id.is_none() {
            return Err(CoreError::validation(msg::CATEGORY_REQUIRED));
        }
        if self.weight_kgs.is_some_and(|w| w < 0.0) {
            return Err(CoreError::validation(msg::INVALID_WEIGHT));
        }
        if [self.length, self.breadth, self.height]
            .iter()
            .flatten()
            .any(|d| *d <= 0.0)
        {
            return Err(CoreError::validation(msg::INVALID_DIMENSIONS));
        }
        require_id(self.pickup_location_id, msg::PICKUP_LOCATION_REQUIRED)?;
        Ok(condition)
    }

    pub fn apply_to(&self, product: &mut Product, condition: &str) {
        let text = |v: &Option<String>| v.as_deref().unwrap_or_default().trim().to_string();
        product.title = text(&self.title);
        product.description_html = text(&self.description_html);
        product.brand = text(&self.brand);
        product.color_label = text(&self.color_label);
        product.condition = condition.to_string();
        product.country_of_manufacture = text(&self.country_of_manufacture);
        product.price = self.price.unwrap_or_default();
        product.discount = self.discount;
        product.is_discount_percent = self.is_discount_percent;
        product.category_id = self.category_id.unwrap_or_default();
        product.weight_kgs = self.weight_kgs;
        product.length = self.length;
        product.breadth = self.breadth;
        product.height = self.height;
        product.pickup_location_id = self.pickup_location_id.unwrap_or_default();
        product.item_available_from = self.item_available_from;
    }
}

impl Product {
    pub fn new(client_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            title: String::new(),
            description_html: String::new(),
            brand: String::new(),
            color_label: String::new(),
            condition: String::new(),
            country_of_manufacture: String::new(),
            price: Money::ZERO,
            discount: None,
            is_discount_percent: false,
            category_id: 0,
            weight_kgs: None,
            length: None,
            breadth: None,
            height: None,
            pickup_location_id: 0,
            item_available_from: None,
            returns_allowed: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }
}
