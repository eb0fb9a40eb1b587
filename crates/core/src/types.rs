/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Money amounts, stored as PostgreSQL NUMERIC.
pub type Money = rust_decimal::Decimal;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Identity of the authenticated caller, resolved from the access token.
///
/// Every service call receives one of these; `client_id` is the tenant key
/// that scopes all reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub client_id: DbId,
    pub user_id: DbId,
    pub login_name: String,
}

impl TenantContext {
    pub fn new(client_id: DbId, user_id: DbId, login_name: impl Into<String>) -> Self {
        Self {
            client_id,
            user_id,
            login_name: login_name.into(),
        }
    }
}
