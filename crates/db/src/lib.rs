//! Persistence for the bizhub backend.
//!
//! Entity rows and request DTOs live in [`models`]. Services talk to the
//! [`store`] traits only; [`repositories`] implements them on PostgreSQL and
//! [`memory`] implements them in process for tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;
pub mod stores;

pub use store::{AccountStore, ScheduleStore, StoreResult, TenantEntity, TenantStore};
pub use stores::{MemoryStores, Stores};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Connectivity check used at startup and by `/health`.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
