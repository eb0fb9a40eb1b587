//! Shared helpers for the HTTP integration tests.
//!
//! Every test runs the production router over in-memory stores, so no
//! database is needed. Outbound email is dropped by an unconfigured
//! dispatcher and shipping calls go to [`StubShipping`].

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use bizhub_core::integrations::{
    IntegrationError, PickupRegistration, ProviderShipment, ShipmentOrder, ShippingProvider,
};
use bizhub_core::qa::{CommandTestRunner, ExecutionTracker};
use bizhub_core::types::{DbId, TenantContext};
use bizhub_db::models::client::Client;
use bizhub_db::models::user::{CreateUser, User};
use bizhub_db::{MemoryStores, TenantStore};
use bizhub_integrations::ScheduledEmailDispatcher;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;

use bizhub_api::auth::jwt::{generate_access_token, JwtConfig};
use bizhub_api::auth::password::hash_password;
use bizhub_api::config::{QaConfig, ServerConfig};
use bizhub_api::router::build_app_router;
use bizhub_api::state::{AppState, Services};

pub const PASSWORD: &str = "correct horse battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        qa: QaConfig::default(),
    }
}

/// Registers every location and places every order under fixed provider ids.
pub struct StubShipping;

#[async_trait]
impl ShippingProvider for StubShipping {
    async fn register_pickup_location(
        &self,
        registration: &PickupRegistration,
    ) -> Result<String, IntegrationError> {
        if registration.postal_code == "000000" {
            return Err(IntegrationError::Rejected("pincode not serviceable".into()));
        }
        Ok("7001".to_string())
    }

    async fn create_order(&self, _order: &ShipmentOrder) -> Result<ProviderShipment, IntegrationError> {
        Ok(ProviderShipment {
            order_id: "8801".to_string(),
            shipment_id: "9901".to_string(),
        })
    }

    async fn cancel_orders(&self, _order_ids: &[String]) -> Result<(), IntegrationError> {
        Ok(())
    }
}

/// Router plus the stores behind it, for seeding and inspection.
pub struct TestApp {
    pub router: Router,
    pub mem: MemoryStores,
    pub config: ServerConfig,
}

pub fn build_test_app() -> TestApp {
    let config = test_config();
    let mem = MemoryStores::default();
    // `true` always exits 0 without output, so runs finish immediately.
    let runner = CommandTestRunner::from_command_line("true", None, Duration::from_secs(5))
        .expect("runner command");

    let state = AppState {
        services: Services {
            stores: mem.stores(),
            email: Arc::new(ScheduledEmailDispatcher::new(None)),
            shipping: Arc::new(StubShipping),
        },
        pool: None,
        config: Arc::new(config.clone()),
        qa_tracker: ExecutionTracker::new(),
        qa_runner: Arc::new(runner),
    };

    TestApp {
        router: build_app_router(state, &config),
        mem,
        config,
    }
}

impl TestApp {
    pub async fn seed_client(&self, name: &str) -> DbId {
        let now = Utc::now();
        let client = Client {
            id: 0,
            name: name.to_string(),
            description: "integration tenant".to_string(),
            support_email: format!("support@{}.test", name.to_lowercase()),
            website: format!("https://{}.test", name.to_lowercase()),
            sendgrid_sender_name: format!("{name} Team"),
            logo_url: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: "seed".to_string(),
            modified_user: "seed".to_string(),
        };
        self.mem.clients.insert(&client).await.expect("seed client").id
    }

    /// Seed a confirmed user whose password is [`PASSWORD`].
    pub async fn seed_user(&self, client_id: DbId, login_name: &str) -> User {
        let hash = hash_password(PASSWORD).expect("hash");
        let mut user = CreateUser {
            login_name: Some(login_name.to_string()),
            first_name: Some("Meera".to_string()),
            last_name: Some("Iyer".to_string()),
            email: Some(format!("{login_name}@example.com")),
            password: Some(PASSWORD.to_string()),
            ..Default::default()
        }
        .into_user(client_id, hash, "seed", Utc::now());
        user.email_confirmed = true;
        self.mem.users.insert(&user).await.expect("seed user")
    }

    /// Seed a tenant with one user and return a bearer token for that user.
    pub async fn tenant(&self, name: &str) -> (DbId, User, String) {
        let client_id = self.seed_client(name).await;
        let user = self
            .seed_user(client_id, &format!("{}-admin", name.to_lowercase()))
            .await;
        let token = self.token_for(&user);
        (client_id, user, token)
    }

    pub fn token_for(&self, user: &User) -> String {
        let tenant = TenantContext::new(user.client_id, user.id, user.login_name.clone());
        generate_access_token(&tenant, &user.role, &self.config.jwt).expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response")
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: serde_json::Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::PATCH, uri, Some(token), None).await
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn address_json(street: &str) -> serde_json::Value {
    serde_json::json!({
        "address_type": "shipping",
        "street_address": street,
        "city": "Pune",
        "state": "MH",
        "postal_code": "411001",
        "country": "India",
    })
}
