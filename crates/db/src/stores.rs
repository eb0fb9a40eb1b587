//! The full set of stores a running service needs.

use std::sync::Arc;

use crate::memory::MemoryStore;
use crate::models::{
    address::Address, client::Client, lead::Lead, message::Message, package::Package,
    payment::Payment, payment_info::PaymentInfo, pickup_location::PickupLocation,
    product::Product, product_review::ProductReview, promo::Promo,
    purchase_order::PurchaseOrder, shipment::Shipment, test_run::LatestTestResult,
    test_run::TestRun, todo::Todo, user::User, user_group::UserGroup, user_log::UserLog,
};
use crate::repositories::{PgRecord, PgStore};
use crate::store::{AccountStore, ScheduleStore, TenantStore};
use crate::DbPool;

/// Shared store handles, one per entity. Cloning is cheap.
#[derive(Clone)]
pub struct Stores {
    pub addresses: Arc<dyn TenantStore<Address>>,
    pub clients: Arc<dyn TenantStore<Client>>,
    pub users: Arc<dyn TenantStore<User>>,
    pub accounts: Arc<dyn AccountStore>,
    pub user_groups: Arc<dyn TenantStore<UserGroup>>,
    pub leads: Arc<dyn TenantStore<Lead>>,
    pub messages: Arc<dyn TenantStore<Message>>,
    pub scheduled_messages: Arc<dyn ScheduleStore>,
    pub promos: Arc<dyn TenantStore<Promo>>,
    pub packages: Arc<dyn TenantStore<Package>>,
    pub products: Arc<dyn TenantStore<Product>>,
    pub pickup_locations: Arc<dyn TenantStore<PickupLocation>>,
    pub purchase_orders: Arc<dyn TenantStore<PurchaseOrder>>,
    pub payment_infos: Arc<dyn TenantStore<PaymentInfo>>,
    pub payments: Arc<dyn TenantStore<Payment>>,
    pub shipments: Arc<dyn TenantStore<Shipment>>,
    pub product_reviews: Arc<dyn TenantStore<ProductReview>>,
    pub test_runs: Arc<dyn TenantStore<TestRun>>,
    pub latest_test_results: Arc<dyn TenantStore<LatestTestResult>>,
    pub todos: Arc<dyn TenantStore<Todo>>,
    pub user_logs: Arc<dyn TenantStore<UserLog>>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DbPool) -> Self {
        let users = Arc::new(PgStore::<User>::new(pool.clone()));
        let messages = Arc::new(PgStore::<Message>::new(pool.clone()));
        Self {
            addresses: pg(&pool),
            clients: pg(&pool),
            users: users.clone(),
            accounts: users,
            user_groups: pg(&pool),
            leads: pg(&pool),
            messages: messages.clone(),
            scheduled_messages: messages,
            promos: pg(&pool),
            packages: pg(&pool),
            products: pg(&pool),
            pickup_locations: pg(&pool),
            purchase_orders: pg(&pool),
            payment_infos: pg(&pool),
            payments: pg(&pool),
            shipments: pg(&pool),
            product_reviews: pg(&pool),
            test_runs: pg(&pool),
            latest_test_results: pg(&pool),
            todos: pg(&pool),
            user_logs: pg(&pool),
        }
    }

    /// Empty in-process stores.
    pub fn in_memory() -> Self {
        MemoryStores::default().stores()
    }
}

fn pg<E: PgRecord>(pool: &DbPool) -> Arc<dyn TenantStore<E>> {
    Arc::new(PgStore::<E>::new(pool.clone()))
}

/// Typed in-memory stores, for tests that seed rows or inspect writes
/// behind the [`Stores`] trait objects.
#[derive(Clone, Default)]
pub struct MemoryStores {
    pub addresses: Arc<MemoryStore<Address>>,
    pub clients: Arc<MemoryStore<Client>>,
    pub users: Arc<MemoryStore<User>>,
    pub user_groups: Arc<MemoryStore<UserGroup>>,
    pub leads: Arc<MemoryStore<Lead>>,
    pub messages: Arc<MemoryStore<Message>>,
    pub promos: Arc<MemoryStore<Promo>>,
    pub packages: Arc<MemoryStore<Package>>,
    pub products: Arc<MemoryStore<Product>>,
    pub pickup_locations: Arc<MemoryStore<PickupLocation>>,
    pub purchase_orders: Arc<MemoryStore<PurchaseOrder>>,
    pub payment_infos: Arc<MemoryStore<PaymentInfo>>,
    pub payments: Arc<MemoryStore<Payment>>,
    pub shipments: Arc<MemoryStore<Shipment>>,
    pub product_reviews: Arc<MemoryStore<ProductReview>>,
    pub test_runs: Arc<MemoryStore<TestRun>>,
    pub latest_test_results: Arc<MemoryStore<LatestTestResult>>,
    pub todos: Arc<MemoryStore<Todo>>,
    pub user_logs: Arc<MemoryStore<UserLog>>,
}

impl MemoryStores {
    pub fn stores(&self) -> Stores {
        Stores {
            addresses: self.addresses.clone(),
            clients: self.clients.clone(),
            users: self.users.clone(),
            accounts: self.users.clone(),
            user_groups: self.user_groups.clone(),
            leads: self.leads.clone(),
            messages: self.messages.clone(),
            scheduled_messages: self.messages.clone(),
            promos: self.promos.clone(),
            packages: self.packages.clone(),
            products: self.products.clone(),
            pickup_locations: self.pickup_locations.clone(),
            purchase_orders: self.purchase_orders.clone(),
            payment_infos: self.payment_infos.clone(),
            payments: self.payments.clone(),
            shipments: self.shipments.clone(),
            product_reviews: self.product_reviews.clone(),
            test_runs: self.test_runs.clone(),
            latest_test_results: self.latest_test_results.clone(),
            todos: self.todos.clone(),
            user_logs: self.user_logs.clone(),
        }
    }
}
