//! Entity rows and request DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` request DTOs whose `validate()` runs before any store call
//! - `FILTER_COLUMNS`, the allow-list for paginated filtering, for entities
//!   that are listed page by page

pub mod address;
pub mod client;
pub mod lead;
pub mod message;
pub mod package;
pub mod payment;
pub mod payment_info;
pub mod pickup_location;
pub mod product;
pub mod product_review;
pub mod promo;
pub mod purchase_order;
pub mod shipment;
pub mod test_run;
pub mod todo;
pub mod user;
pub mod user_group;
pub mod user_log;

/// Implement [`crate::store::TenantEntity`] for a row with the standard
/// `id`, `client_id`, `is_deleted` and modification-stamp columns.
macro_rules! tenant_entity {
    ($name:ty) => {
        impl $crate::store::TenantEntity for $name {
            fn id(&self) -> bizhub_core::types::DbId {
                self.id
            }

            fn set_id(&mut self, id: bizhub_core::types::DbId) {
                self.id = id;
            }

            fn client_id(&self) -> bizhub_core::types::DbId {
                self.client_id
            }

            fn is_deleted(&self) -> bool {
                self.is_deleted
            }

            fn set_deleted(&mut self, deleted: bool) {
                self.is_deleted = deleted;
            }

            fn touch(&mut self, actor: &str, now: bizhub_core::types::Timestamp) {
                self.modified_user = actor.to_string();
                self.updated_at = now;
            }
        }
    };
}

pub(crate) use tenant_entity;

/// Trim an optional string, mapping blank to `None`.
pub(crate) fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
