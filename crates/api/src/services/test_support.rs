//! In-memory harness and integration fakes for service tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bizhub_core::integrations::{
    EmailScheduler, IntegrationError, OutboundEmail, PickupRegistration, ProviderShipment,
    ShipmentOrder, ShippingProvider,
};
use bizhub_core::types::{DbId, TenantContext, Timestamp};
use bizhub_db::models::client::Client;
use bizhub_db::models::user::{CreateUser, User};
use bizhub_db::{MemoryStores, TenantStore};
use chrono::Utc;

use crate::middleware::auth::AuthUser;
use crate::state::Services;

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct FakeEmail {
    pub scheduled: Mutex<Vec<(String, OutboundEmail, Timestamp)>>,
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub cancelled: Mutex<Vec<String>>,
    pub fail_cancel: AtomicBool,
    pub fail_send: AtomicBool,
    batches: AtomicUsize,
}

impl FakeEmail {
    pub fn scheduled_ids(&self) -> Vec<String> {
        self.scheduled.lock().unwrap().iter().map(|(id, _, _)| id.clone()).collect()
    }
}

#[async_trait]
impl EmailScheduler for FakeEmail {
    fn generate_batch_id(&self) -> String {
        format!("batch-{}", self.batches.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn schedule(
        &self,
        batch_id: &str,
        email: OutboundEmail,
        send_at: Timestamp,
    ) -> Result<(), IntegrationError> {
        self.scheduled
            .lock()
            .unwrap()
            .push((batch_id.to_string(), email, send_at));
        Ok(())
    }

    async fn send_now(&self, email: OutboundEmail) -> Result<(), IntegrationError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(IntegrationError::Rejected("mailbox unavailable".into()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }

    async fn cancel(&self, batch_id: &str) -> Result<(), IntegrationError> {
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(IntegrationError::Transport("connection reset".into()));
        }
        self.cancelled.lock().unwrap().push(batch_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Shipping
// ---------------------------------------------------------------------------

pub(crate) struct FakeShipping {
    pub response: Mutex<Result<String, IntegrationError>>,
    pub registrations: Mutex<Vec<PickupRegistration>>,
    pub orders: Mutex<Vec<ShipmentOrder>>,
    pub cancelled: Mutex<Vec<String>>,
    pub fail_orders: AtomicBool,
}

impl Default for FakeShipping {
    fn default() -> Self {
        Self {
            response: Mutex::new(Ok("9001".to_string())),
            registrations: Mutex::default(),
            orders: Mutex::default(),
            cancelled: Mutex::default(),
            fail_orders: AtomicBool::new(false),
        }
    }
}

impl FakeShipping {
    pub fn reject_with(&self, err: IntegrationError) {
        *self.response.lock().unwrap() = Err(err);
    }

    pub fn calls(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }
}

#[async_trait]
impl ShippingProvider for FakeShipping {
    async fn register_pickup_location(
        &self,
        registration: &PickupRegistration,
    ) -> Result<String, IntegrationError> {
        self.registrations.lock().unwrap().push(registration.clone());
        self.response.lock().unwrap().clone()
    }

    async fn create_order(&self, order: &ShipmentOrder) -> Result<ProviderShipment, IntegrationError> {
        if self.fail_orders.load(Ordering::SeqCst) {
            return Err(IntegrationError::Rejected("courier unavailable".into()));
        }
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(ProviderShipment {
            order_id: format!("{}", 500 + orders.len()),
            shipment_id: format!("{}", 900 + orders.len()),
        })
    }

    async fn cancel_orders(&self, order_ids: &[String]) -> Result<(), IntegrationError> {
        if self.fail_orders.load(Ordering::SeqCst) {
            return Err(IntegrationError::Transport("connection reset".into()));
        }
        self.cancelled.lock().unwrap().extend_from_slice(order_ids);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub(crate) struct Harness {
    pub svc: Services,
    pub mem: MemoryStores,
    pub email: Arc<FakeEmail>,
    pub shipping: Arc<FakeShipping>,
}

impl Harness {
    pub fn new() -> Self {
        let mem = MemoryStores::default();
        let email = Arc::new(FakeEmail::default());
        let shipping = Arc::new(FakeShipping::default());
        let svc = Services {
            stores: mem.stores(),
            email: email.clone(),
            shipping: shipping.clone(),
        };
        Self {
            svc,
            mem,
            email,
            shipping,
        }
    }

    /// Seed a client with one user and return that user as the caller.
    pub async fn tenant(&self, name: &str) -> AuthUser {
        let client_id = self.client(name).await;
        let user = self.user(client_id, &format!("{}-admin", name.to_lowercase())).await;
        caller(client_id, user.id, &user.login_name)
    }

    pub async fn client(&self, name: &str) -> DbId {
        let now = Utc::now();
        let client = Client {
            id: 0,
            name: name.to_string(),
            description: "test tenant".to_string(),
            support_email: "support@example.com".to_string(),
            website: "https://example.com".to_string(),
            sendgrid_sender_name: format!("{name} Team"),
            logo_url: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
            created_user: "seed".to_string(),
            modified_user: "seed".to_string(),
        };
        self.mem.clients.insert(&client).await.unwrap().id
    }

    pub async fn user(&self, client_id: DbId, login_name: &str) -> User {
        self.user_with_hash(client_id, login_name, "unused-hash").await
    }

    pub async fn user_with_hash(&self, client_id: DbId, login_name: &str, hash: &str) -> User {
        let user = CreateUser {
            login_name: Some(login_name.to_string()),
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            email: Some(format!("{login_name}@example.com")),
            password: Some("placeholder".to_string()),
            ..Default::default()
        }
        .into_user(client_id, hash.to_string(), "seed", Utc::now());
        self.mem.users.insert(&user).await.unwrap()
    }

    /// Actions of every user-log entry written so far, oldest first.
    pub async fn logged_actions(&self) -> Vec<String> {
        self.mem
            .user_logs
            .all()
            .await
            .into_iter()
            .map(|log| log.action)
            .collect()
    }
}

pub(crate) fn caller(client_id: DbId, user_id: DbId, login_name: &str) -> AuthUser {
    AuthUser {
        tenant: TenantContext::new(client_id, user_id, login_name),
        role: "admin".to_string(),
        route: "/api/v1/test".to_string(),
    }
}
