//! Seams to outbound collaborators.
//!
//! Services depend on these traits only. Concrete SMTP and HTTP adapters live
//! in the `bizhub-integrations` crate; tests substitute in-process fakes.

use async_trait::async_trait;

use crate::types::{DbId, Money, Timestamp};

/// Failure reported by an outbound provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationError {
    /// The provider is not configured in this deployment.
    #[error("provider not configured")]
    NotConfigured,

    /// The provider answered but refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The request never got a usable answer.
    #[error("transport error: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub client_id: DbId,
    /// Display name of the sending tenant, when it has one.
    pub sender_name: Option<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Delivers message emails now or at a scheduled time.
///
/// Scheduled deliveries are grouped under a batch id so they can be
/// cancelled until they go out.
#[async_trait]
pub trait EmailScheduler: Send + Sync {
    fn generate_batch_id(&self) -> String;

    async fn schedule(
        &self,
        batch_id: &str,
        email: OutboundEmail,
        send_at: Timestamp,
    ) -> Result<(), IntegrationError>;

    async fn send_now(&self, email: OutboundEmail) -> Result<(), IntegrationError>;

    /// Cancelling an unknown or already delivered batch is not an error.
    async fn cancel(&self, batch_id: &str) -> Result<(), IntegrationError>;
}

// ---------------------------------------------------------------------------
// Shipping
// ---------------------------------------------------------------------------

/// Pickup address as registered with the shipping provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PickupRegistration {
    pub nickname: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

/// One outbound shipment to be placed with the provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ShipmentOrder {
    /// Our reference for the order, unique per tenant.
    pub reference: String,
    /// Provider-side nickname of the pickup location.
    pub pickup_location: String,
    pub courier_name: Option<String>,
    pub weight_kgs: f64,
    pub quantity: i32,
    pub declared_value: Money,
}

/// Ids the provider assigned to a placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderShipment {
    pub order_id: String,
    pub shipment_id: String,
}

#[async_trait]
pub trait ShippingProvider: Send + Sync {
    /// Register a pickup location and return the provider's id for it.
    async fn register_pickup_location(
        &self,
        registration: &PickupRegistration,
    ) -> Result<String, IntegrationError>;

    async fn create_order(&self, order: &ShipmentOrder) -> Result<ProviderShipment, IntegrationError>;

    /// Cancel orders by the provider's order ids.
    async fn cancel_orders(&self, order_ids: &[String]) -> Result<(), IntegrationError>;
}
