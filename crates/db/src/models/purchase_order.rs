//! Purchase order entity model and DTOs.

use bizhub_core::error::CoreResult;
use bizhub_core::messages::purchase_order as msg;
use bizhub_core::pagination::ColumnSpec;
use bizhub_core::types::{DbId, Timestamp};
use bizhub_core::validation::fields::require_text;
use bizhub_core::validation::purchase_order::{
    normalize_priority, normalize_status, validate_assigned_lead, validate_attachments,
    validate_line_items, LineItem,
};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::address::{AddressFields, AddressRequest};
use super::payment_info::PaymentInfoRequest;
use super::{tenant_entity, trimmed};

/// A row from the `purchase_orders` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PurchaseOrder {
    pub id: DbId,
    pub client_id: DbId,
    pub vendor_number: String,
    pub status: String,
    pub priority: String,
    pub expected_delivery_date: Option<Timestamp>,
    pub terms_conditions_html: Option<String>,
    pub assigned_lead_id: DbId,
    pub address_id: DbId,
    pub payment_info_id: DbId,
    pub line_items: Json<Vec<LineItem>>,
    pub attachments: Vec<String>,
    pub approved_by: Option<DbId>,
    pub approved_at: Option<Timestamp>,
    pub rejected_by: Option<DbId>,
    pub rejected_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_user: String,
    pub modified_user: String,
}

tenant_entity!(PurchaseOrder);

pub const FILTER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::number("id"),
    ColumnSpec::text("vendor_number"),
    ColumnSpec::text("status"),
    ColumnSpec::text("priority"),
    ColumnSpec::date("expected_delivery_date"),
    ColumnSpec::number("assigned_lead_id"),
    ColumnSpec::number("approved_by"),
    ColumnSpec::date("approved_at"),
    ColumnSpec::date("created_at"),
];

/// Create/update body. Line items, attachments and charges replace the
/// stored ones on update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseOrderRequest {
    pub vendor_number: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub expected_delivery_date: Option<Timestamp>,
    pub terms_conditions_html: Option<String>,
    pub assigned_lead_id: Option<DbId>,
    pub address: Option<AddressRequest>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub payment: PaymentInfoRequest,
}

/// Canonical values produced by [`PurchaseOrderRequest::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPurchaseOrder {
    pub status: &'static str,
    pub priority: &'static str,
    pub assigned_lead_id: DbId,
    pub address: AddressFields,
}

impl PurchaseOrderRequest {
    pub fn validate(&self) -> CoreResult<ValidPurchaseOrder> {
        require_text(self.vendor_number.as_deref(), msg::VENDOR_NUMBER_REQUIRED)?;
        let status = normalize_status(self.status.as_deref())?;
        let priority = normalize_priority(self.priority.as_deref())?;
        let assigned_lead_id = validate_assigned_lead(self.assigned_lead_id)?;
        validate_line_items(&self.line_items)?;
        validate_attachments(&self.attachments)?;
        let address = self.address.clone().unwrap_or_default().validate()?;
        self.payment.validate()?;
        Ok(ValidPurchaseOrder {
            status,
            priority,
            assigned_lead_id,
            address,
        })
    }

    /// Copy request-owned fields onto `order`. Foreign keys are set by the caller.
    pub fn apply_to(&self, order: &mut PurchaseOrder, valid: &ValidPurchaseOrder) {
        order.vendor_number = self.vendor_number.as_deref().unwrap_or_default().trim().to_string();
        order.status = valid.status.to_string();
        order.priority = valid.priority.to_string();
        order.expected_delivery_date = self.expected_delivery_date;
        order.terms_conditions_html = trimmed(&self.terms_conditions_html);
        order.assigned_lead_id = valid.assigned_lead_id;
        order.line_items = Json(self.line_items.clone());
        order.attachments = self.attachments.iter().map(|a| a.trim().to_string()).collect();
    }
}

impl PurchaseOrder {
    pub fn new(client_id: DbId, actor: &str, now: Timestamp) -> Self {
        Self {
            id: 0,
            client_id,
            vendor_number: String::new(),
            status: String::new(),
            priority: String::new(),
            expected_delivery_date: None,
            terms_conditions_html: None,
            assigned_lead_id: 0,
            address_id: 0,
            payment_info_id: 0,
            line_items: Json(Vec::new()),
            attachments: Vec::new(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: actor.to_string(),
            modified_user: actor.to_string(),
        }
    }

    pub fn product_ids(&self) -> Vec<DbId> {
        self.line_items.iter().map(|i| i.product_id).collect()
    }
}
