use sqlx::PgPool;

/// Every `id` column is BIGINT.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(data_type, "bigint", "Table {table}.id should be bigint");
    }
}

/// Every table carries `created_at` and `updated_at` as timestamptz.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Tenant-owned tables all carry a `client_id`. All but the append-only
/// ones also carry an `is_deleted` flag.
#[sqlx::test(migrations = "./migrations")]
async fn test_tenant_tables_have_scoping_columns(pool: PgPool) {
    let tables = [
        "users",
        "user_groups",
        "addresses",
        "leads",
        "messages",
        "todos",
        "promos",
        "packages",
        "pickup_locations",
        "products",
        "payment_infos",
        "purchase_orders",
        "product_reviews",
        "payments",
        "shipments",
        "test_runs",
        "latest_test_results",
        "user_logs",
    ];
    let append_only = ["payments", "shipments", "test_runs", "latest_test_results", "user_logs"];

    for table in tables {
        let columns: Vec<(String,)> = sqlx::query_as(
            "SELECT column_name
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1",
        )
        .bind(table)
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = columns.iter().map(|(c,)| c.as_str()).collect();

        assert!(names.contains(&"client_id"), "{table} has no client_id");
        assert_eq!(
            names.contains(&"is_deleted"),
            !append_only.contains(&table),
            "{table} soft-delete column mismatch"
        );
    }
}

/// No VARCHAR columns; TEXT everywhere.
#[sqlx::test(migrations = "./migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        rows.is_empty(),
        "Found VARCHAR columns (should use TEXT): {:?}",
        rows
    );
}

/// Unique indexes follow the `uq_` naming the API maps to 409 Conflict.
#[sqlx::test(migrations = "./migrations")]
async fn test_unique_indexes_use_uq_prefix(pool: PgPool) {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT indexname
         FROM pg_indexes
         WHERE schemaname = 'public'
           AND indexdef LIKE 'CREATE UNIQUE INDEX%'
           AND indexname NOT LIKE '%_pkey'
           AND tablename != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (name,) in &rows {
        assert!(name.starts_with("uq_"), "unique index {name} should start with uq_");
    }
}
