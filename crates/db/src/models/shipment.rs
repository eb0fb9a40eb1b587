//! Shipment entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::messages::shipment as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Money, Timestamp};
use bizhub_core::validation::fields::{require_id, require_non_negative, require_positive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::trimmed;
use crate::store::TenantEntity;

pub mod statuses {
    pub const CREATED: &str = "CREATED";
    pub const CANCELLED: &str = "CANCELLED";
}

/// A row from the `shipments` table. Shipments are cancelled, never deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Shipment {
    pub id: DbId,
    pub client_id: DbId,
    pub purchase_order_id: DbId,
    pub pickup_location_id: DbId,
    pub total_weight_kgs: f64,
    pub total_quantity: i32,
    pub packaging_cost: Money,
    pub shipping_cost: Money,
    pub total_cost: Money,
    pub courier_name: Option<String>,
    pub expected_delivery_date: Option<Timestamp>,
    /// Provider-side ids, set when the provider accepted the order.
    pub provider_order_id: Option<String>,
    pub provider_shipment_id: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

impl TenantEntity for Shipment {
    fn id(&self) -> DbId {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = id;
    }

    fn client_id(&self) -> DbId {
        self.client_id
    }

    fn touch(&mut self, actor: &str, now: Timestamp) {
        self.modified_user = actor.to_string();
        self.updated_at = now;
    }
}

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::number("purchase_order_id"),
    ColumnSpec::number("pickup_location_id"),
    ColumnSpec::number("total_weight_kgs"),
    ColumnSpec::number("total_quantity"),
    ColumnSpec::number("total_cost"),
    ColumnSpec::text("courier_name"),
    ColumnSpec::text("provider_order_id"),
    ColumnSpec::text("status"),
    ColumnSpec::date("expected_delivery_date"),
    ColumnSpec::date("created_at"),
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentRequest {
    pub purchase_order_id: Option<DbId>,
    pub pickup_location_id: Option<DbId>,
    pub total_weight_kgs: Option<f64>,
    pub total_quantity: Option<i32>,
    pub packaging_cost: Option<Money>,
    pub shipping_cost: Option<Money>,
    pub courier_name: Option<String>,
    pub expected_delivery_date: Option<Timestamp>,
}

impl ShipmentRequest {
    pub fn validate(&self) -> CoreResult<()> {
        require_id(self.purchase_order_id, msg::ORDER_REQUIRED)?;
        require_id(self.pickup_location_id, msg::PICKUP_LOCATION_REQUIRED)?;
        require_non_negative(self.total_weight_kgs, msg::INVALID_WEIGHT)?;
        require_positive(self.total_quantity, msg::INVALID_QUANTITY)?;
        require_non_negative(Some(self.packaging_cost.unwrap_or_default()), msg::INVALID_PACKAGING_COST)?;
        require_non_negative(Some(self.shipping_cost.unwrap_or_default()), msg::INVALID_SHIPPING_COST)?;
        Ok(())
    }
}

impl Shipment {
    /// A new shipment from a validated request. Ids the provider assigns are
    /// filled in by the caller.
    pub fn from_request(client_id: DbId, req: &ShipmentRequest, actor: &str, now: Timestamp) -> Self {
        let packaging_cost = req.packaging_cost.unwrap_or_default();
        let shipping_cost = req.shipping_cost.unwrap_or_default();
        Self {
            id: 0,
            client_id,
            purchase_order_id: req.purchase_order_id.unwrap_or_default(),
            pickup_location_id: req.pickup_location_id.unwrap_or_default(),
            total_weight_kgs: req.total_weight_kgs.unwrap_or_default(),
            total_quantity: req.total_quantity.unwrap_or_default(),
            packaging_cost,
            shipping_cost,
            total_cost: packaging_cost + shipping_cost,
            courier_name: trimmed(&req.courier_name),
            expected_delivery_date: req.expected_delivery_date,
            provider_order_id: None,
            provider_shipment_id: None,
            status: statuses::CREATED.to_string(),
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == statuses::CANCELLED
    }

    /// Shipments never placed with the provider are not shown to callers.
    pub fn is_placed(&self) -> bool {
        self.provider_order_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }

    /// Declared value for the provider: what the shipment costs to send.
    pub fn declared_value(&self) -> Money {
        self.total_cost.max(Decimal::ZERO)
    }
}
