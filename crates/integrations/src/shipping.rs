//! Shipping provider adapter.
//!
//! [`HttpShippingProvider`] registers pickup locations and places and
//! cancels shipment orders through the provider's REST API. Configuration is loaded from environment variables; if
//! `SHIPPING_API_URL` is not set, [`ShippingConfig::from_env`] returns `None`
//! and the provider rejects every call.

use std::time::Duration;

use async_trait::async_trait;
use bizhub_core::integrations::{
    IntegrationError, PickupRegistration, ProviderShipment, ShipmentOrder, ShippingProvider,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const ADD_PICKUP_PATH: &str = "/settings/company/addpickup";
const CREATE_ORDER_PATH: &str = "/orders/create/adhoc";
const CANCEL_ORDERS_PATH: &str = "/orders/cancel";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ShippingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Shipping provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The provider accepted the request but sent no usable pickup id.
    #[error("Shipping provider returned an invalid pickup location id: {0}")]
    InvalidPickupId(i64),

    /// The provider accepted an order but sent no usable order id.
    #[error("Shipping provider returned an invalid order id: {0}")]
    InvalidOrderId(i64),

    /// Order ids we hold are the provider's numeric ids as text.
    #[error("Order id is not numeric: {0}")]
    NonNumericOrderId(String),
}

impl From<ShippingError> for IntegrationError {
    fn from(err: ShippingError) -> Self {
        match err {
            ShippingError::Request(e) => IntegrationError::Transport(e.to_string()),
            other => IntegrationError::Rejected(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// ShippingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Base URL of the provider API, without a trailing slash.
    pub api_url: String,
    pub api_token: Option<String>,
}

impl ShippingConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default |
    /// |----------------------|----------|---------|
    /// | `SHIPPING_API_URL`   | yes      |         |
    /// | `SHIPPING_API_TOKEN` | no       |         |
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("SHIPPING_API_URL").ok()?;
        Some(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: std::env::var("SHIPPING_API_TOKEN").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AddPickupRequest<'a> {
    pickup_location: &'a str,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    address: &'a str,
    address_2: Option<&'a str>,
    city: &'a str,
    state: &'a str,
    country: &'a str,
    pin_code: &'a str,
}

impl<'a> From<&'a PickupRegistration> for AddPickupRequest<'a> {
    fn from(reg: &'a PickupRegistration) -> Self {
        Self {
            pickup_location: &reg.nickname,
            name: &reg.contact_name,
            email: &reg.email,
            phone: &reg.phone,
            address: &reg.address_line1,
            address_2: reg.address_line2.as_deref(),
            city: &reg.city,
            state: &reg.state,
            country: &reg.country,
            pin_code: &reg.postal_code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddPickupResponse {
    #[serde(default)]
    pickup_id: i64,
}

fn pickup_id(response: &AddPickupResponse) -> Result<String, ShippingError> {
    if response.pickup_id <= 0 {
        return Err(ShippingError::InvalidPickupId(response.pickup_id));
    }
    Ok(response.pickup_id.to_string())
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    order_id: &'a str,
    pickup_location: &'a str,
    courier_name: Option<&'a str>,
    weight: f64,
    quantity: i32,
    sub_total: f64,
}

impl<'a> From<&'a ShipmentOrder> for CreateOrderRequest<'a> {
    fn from(order: &'a ShipmentOrder) -> Self {
        Self {
            order_id: &order.reference,
            pickup_location: &order.pickup_location,
            courier_name: order.courier_name.as_deref(),
            weight: order.weight_kgs,
            quantity: order.quantity,
            sub_total: order.declared_value.try_into().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    #[serde(default)]
    order_id: i64,
    #[serde(default)]
    shipment_id: i64,
}

fn provider_shipment(response: &CreateOrderResponse) -> Result<ProviderShipment, ShippingError> {
    if response.order_id <= 0 {
        return Err(ShippingError::InvalidOrderId(response.order_id));
    }
    Ok(ProviderShipment {
        order_id: response.order_id.to_string(),
        shipment_id: response.shipment_id.to_string(),
    })
}

#[derive(Debug, Serialize)]
struct CancelOrdersRequest {
    ids: Vec<i64>,
}

fn numeric_ids(order_ids: &[String]) -> Result<Vec<i64>, ShippingError> {
    order_ids
        .iter()
        .map(|id| {
            id.trim()
                .parse()
                .map_err(|_| ShippingError::NonNumericOrderId(id.clone()))
        })
        .collect()
}

/// Cancel answers carry nothing we use.
#[derive(Debug, Deserialize)]
struct Ignored {}

// ---------------------------------------------------------------------------
// HttpShippingProvider
// ---------------------------------------------------------------------------

pub struct HttpShippingProvider {
    client: reqwest::Client,
    config: Option<ShippingConfig>,
}

impl HttpShippingProvider {
    pub fn new(config: Option<ShippingConfig>) -> Result<Self, ShippingError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, config })
    }

    fn config(&self) -> Result<&ShippingConfig, IntegrationError> {
        self.config.as_ref().ok_or(IntegrationError::NotConfigured)
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        config: &ShippingConfig,
        path: &str,
        body: &B,
    ) -> Result<R, ShippingError> {
        let url = format!("{}{path}", config.api_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(token) = &config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShippingError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ShippingProvider for HttpShippingProvider {
    async fn register_pickup_location(
        &self,
        registration: &PickupRegistration,
    ) -> Result<String, IntegrationError> {
        let config = self.config()?;
        let result = self
            .post::<_, AddPickupResponse>(config, ADD_PICKUP_PATH, &AddPickupRequest::from(registration))
            .await
            .and_then(|r| pickup_id(&r));

        match result {
            Ok(id) => {
                tracing::info!(nickname = %registration.nickname, pickup_id = %id, "Pickup location registered");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(nickname = %registration.nickname, error = %e, "Pickup location registration failed");
                Err(e.into())
            }
        }
    }

    async fn create_order(&self, order: &ShipmentOrder) -> Result<ProviderShipment, IntegrationError> {
        let config = self.config()?;
        let result = self
            .post::<_, CreateOrderResponse>(config, CREATE_ORDER_PATH, &CreateOrderRequest::from(order))
            .await
            .and_then(|r| provider_shipment(&r));

        match result {
            Ok(placed) => {
                tracing::info!(reference = %order.reference, order_id = %placed.order_id, "Shipment order placed");
                Ok(placed)
            }
            Err(e) => {
                tracing::warn!(reference = %order.reference, error = %e, "Shipment order failed");
                Err(e.into())
            }
        }
    }

    async fn cancel_orders(&self, order_ids: &[String]) -> Result<(), IntegrationError> {
        let config = self.config()?;
        let ids = numeric_ids(order_ids)?;
        self.post::<_, Ignored>(config, CANCEL_ORDERS_PATH, &CancelOrdersRequest { ids })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Shipment cancel failed");
                IntegrationError::from(e)
            })?;
        tracing::info!(count = order_ids.len(), "Shipment orders cancelled");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
