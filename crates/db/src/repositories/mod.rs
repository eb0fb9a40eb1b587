//! PostgreSQL implementations of the store traits.
//!
//! One generic [`PgStore`] serves every entity. Each entity describes its
//! table through [`PgRecord`] in its `*_repo` module: the table name, the
//! writable column list and how to bind its fields in that order.

use std::marker::PhantomData;

use async_trait::async_trait;
use bizhub_core::pagination::{PageQuery, PaginatedResponse};
use bizhub_core::types::DbId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

use crate::store::{StoreResult, TenantEntity, TenantStore};

mod filter;

pub mod address_repo;
pub mod client_repo;
pub mod lead_repo;
pub mod message_repo;
pub mod package_repo;
pub mod payment_info_repo;
pub mod payment_repo;
pub mod pickup_location_repo;
pub mod product_repo;
pub mod product_review_repo;
pub mod promo_repo;
pub mod purchase_order_repo;
pub mod shipment_repo;
pub mod test_run_repo;
pub mod todo_repo;
pub mod user_group_repo;
pub mod user_log_repo;
pub mod user_repo;

pub(crate) use filter::{bind_values, bind_values_scalar, build_filter, BindValue};

/// Query builder type every [`PgRecord::bind_fields`] receives.
pub type RecordQuery<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

// ---------------------------------------------------------------------------
// Table description
// ---------------------------------------------------------------------------

/// Table mapping for an entity stored through [`PgStore`].
pub trait PgRecord: TenantEntity + for<'r> FromRow<'r, PgRow> {
    const TABLE: &'static str;

    /// Every column except `id`, in the order [`bind_fields`](Self::bind_fields)
    /// binds them. INSERT and UPDATE both use this list.
    const WRITE_COLUMNS: &'static [&'static str];

    /// Column holding the tenant key.
    const TENANT_COLUMN: &'static str = "client_id";

    /// Whether the table has an `is_deleted` column.
    const SOFT_DELETE: bool = true;

    fn bind_fields<'q>(&'q self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self>;

    /// `id` followed by the writable columns.
    fn select_list() -> String {
        let mut columns = Vec::with_capacity(Self::WRITE_COLUMNS.len() + 1);
        columns.push("id");
        columns.extend_from_slice(Self::WRITE_COLUMNS);
        columns.join(", ")
    }

    /// `AND is_deleted = FALSE` for soft-deleting tables, empty otherwise.
    fn live_clause(include_deleted: bool) -> &'static str {
        if Self::SOFT_DELETE && !include_deleted {
            " AND is_deleted = FALSE"
        } else {
            ""
        }
    }
}

// ---------------------------------------------------------------------------
// PgStore
// ---------------------------------------------------------------------------

/// Tenant-scoped store over one table.
pub struct PgStore<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PgStore<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> PgStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<E: PgRecord> PgStore<E> {
    async fn find_one(&self, id: DbId, client_id: DbId, include_deleted: bool) -> StoreResult<Option<E>> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND {} = $2{}",
            E::select_list(),
            E::TABLE,
            E::TENANT_COLUMN,
            E::live_clause(include_deleted),
        );
        sqlx::query_as::<_, E>(&query)
            .bind(id)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
    }
}

#[async_trait]
impl<E: PgRecord> TenantStore<E> for PgStore<E> {
    async fn find(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>> {
        self.find_one(id, client_id, false).await
    }

    async fn find_including_deleted(&self, id: DbId, client_id: DbId) -> StoreResult<Option<E>> {
        self.find_one(id, client_id, true).await
    }

    async fn find_many(&self, ids: &[DbId], client_id: DbId) -> StoreResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM {} WHERE id = ANY($1) AND {} = $2{} ORDER BY id DESC",
            E::select_list(),
            E::TABLE,
            E::TENANT_COLUMN,
            E::live_clause(false),
        );
        sqlx::query_as::<_, E>(&query)
            .bind(ids)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn page(&self, client_id: DbId, query: &PageQuery) -> StoreResult<PaginatedResponse<E>> {
        let (where_clause, values, next_idx) =
            build_filter(E::TENANT_COLUMN, E::SOFT_DELETE, client_id, query);

        let count_sql = format!("SELECT COUNT(*)::BIGINT FROM {} {where_clause}", E::TABLE);
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_sql), &values)
            .fetch_one(&self.pool)
            .await?;

        let mut select_sql = format!(
            "SELECT {} FROM {} {where_clause} ORDER BY id DESC",
            E::select_list(),
            E::TABLE,
        );
        let mut page_values = values;
        if let Some(limit) = query.limit {
            select_sql.push_str(&format!(" LIMIT ${next_idx}"));
            page_values.push(BindValue::Id(limit.max(0)));
            select_sql.push_str(&format!(" OFFSET ${}", next_idx + 1));
        } else {
            select_sql.push_str(&format!(" OFFSET ${next_idx}"));
        }
        page_values.push(BindValue::Id(query.offset.max(0)));

        let data = bind_values(sqlx::query_as::<_, E>(&select_sql), &page_values)
            .fetch_all(&self.pool)
            .await?;

        Ok(PaginatedResponse {
            data,
            total_data_count: total,
        })
    }

    async fn insert(&self, entity: &E) -> StoreResult<E> {
        let placeholders: Vec<String> =
            (1..=E::WRITE_COLUMNS.len()).map(|i| format!("${i}")).collect();
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            E::TABLE,
            E::WRITE_COLUMNS.join(", "),
            placeholders.join(", "),
            E::select_list(),
        );
        let row = entity
            .bind_fields(sqlx::query_as::<_, E>(&query))
            .fetch_one(&self.pool)
            .await?;
        tracing::debug!(table = E::TABLE, id = row.id(), client_id = row.client_id(), "Row inserted");
        Ok(row)
    }

    async fn save(&self, entity: &E) -> StoreResult<E> {
        let assignments: Vec<String> = E::WRITE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ${}", i + 1))
            .collect();
        let id_idx = E::WRITE_COLUMNS.len() + 1;
        let query = format!(
            "UPDATE {} SET {} WHERE id = ${id_idx} AND {} = ${} RETURNING {}",
            E::TABLE,
            assignments.join(", "),
            E::TENANT_COLUMN,
            id_idx + 1,
            E::select_list(),
        );
        let row = entity
            .bind_fields(sqlx::query_as::<_, E>(&query))
            .bind(entity.id())
            .bind(entity.client_id())
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                tracing::debug!(table = E::TABLE, id = row.id(), "Row saved");
                Ok(row)
            }
            None => {
                tracing::warn!(
                    table = E::TABLE,
                    id = entity.id(),
                    client_id = entity.client_id(),
                    "Save matched no row"
                );
                Err(sqlx::Error::RowNotFound)
            }
        }
    }

    async fn delete(&self, id: DbId, client_id: DbId) -> StoreResult<bool> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 AND {} = $2",
            E::TABLE,
            E::TENANT_COLUMN,
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(table = E::TABLE, id, rows = result.rows_affected(), "Row deleted");
        Ok(result.rows_affected() > 0)
    }
}
