use bizhub_core::audit::{self, action_types};
use bizhub_core::messages::address as msg;
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::address::{Address, AddressRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, page, record, toggle};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

pub async fn create(svc: &Services, user: &AuthUser, req: AddressRequest) -> AppResult<Address> {
    let fields = req.validate()?;
    let address = Address::new(user.client_id(), fields, user.actor(), Utc::now());
    let created = svc.stores.addresses.insert(&address).await?;

    tracing::info!(address_id = created.id, client_id = user.client_id(), "Address created");
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: AddressRequest,
) -> AppResult<Address> {
    let fields = req.validate()?;
    let mut address = find_live(svc.stores.addresses.as_ref(), id, user, msg::INVALID_ID).await?;
    address.apply(fields);
    address.touch(user.actor(), Utc::now());
    let saved = svc.stores.addresses.save(&address).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Address> {
    toggle(svc, svc.stores.addresses.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Address> {
    find_live(svc.stores.addresses.as_ref(), id, user, msg::INVALID_ID).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Address>> {
    page(svc.stores.addresses.as_ref(), user, req, FILTER_COLUMNS).await
}

/// Live addresses attached to one user of the caller's tenant.
pub async fn list_for_user(
    svc: &Services,
    user: &AuthUser,
    user_id: DbId,
) -> AppResult<Vec<Address>> {
    let query = PageQuery::matching(vec![Predicate::number_equals("user_id", user_id as f64)]);
    let found = svc.stores.addresses.page(user.client_id(), &query).await?;
    Ok(found.data)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use bizhub_core::error::CoreError;

    use super::*;
    use crate::error::AppError;
    use crate::services::test_support::Harness;

    fn request() -> AddressRequest {
        AddressRequest {
            address_type: Some("home".into()),
            street_address: Some("4 Lake View".into()),
            city: Some("Nashik".into()),
            state: Some("MH".into()),
            postal_code: Some("422001".into()),
            country: Some("India".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_stamps_tenant_and_audits() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;

        let created = create(&h.svc, &caller, request()).await.unwrap();

        assert_eq!(created.client_id, caller.client_id());
        assert_eq!(created.address_type, "HOME");
        assert_eq!(created.created_user, caller.actor());
        assert_eq!(h.logged_actions().await, vec![action_types::INSERT]);
    }

    #[tokio::test]
    async fn test_invalid_request_writes_nothing() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        let mut req = request();
        req.city = Some("  ".into());

        let err = create(&h.svc, &caller, req).await.unwrap_err();

        assert_matches!(err, AppError::Core(CoreError::Validation(m)) if m == msg::CITY_REQUIRED);
        assert!(h.mem.addresses.all().await.is_empty());
        assert!(h.logged_actions().await.is_empty());
    }

    #[tokio::test]
    async fn test_other_tenant_row_is_not_found() {
        let h = Harness::new();
        let owner = h.tenant("Acme").await;
        let stranger = h.tenant("Globex").await;
        let created = create(&h.svc, &owner, request()).await.unwrap();

        let err = update(&h.svc, &stranger, created.id, request()).await.unwrap_err();

        assert_matches!(err, AppError::Core(CoreError::NotFound(m)) if m == msg::INVALID_ID);
        assert_eq!(h.mem.addresses.save_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        let created = create(&h.svc, &caller, request()).await.unwrap();

        let deleted = toggle_deleted(&h.svc, &caller, created.id).await.unwrap();
        assert!(deleted.is_deleted);
        assert!(get(&h.svc, &caller, created.id).await.is_err());

        let restored = toggle_deleted(&h.svc, &caller, created.id).await.unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(
            h.logged_actions().await,
            vec![action_types::INSERT, action_types::TOGGLE, action_types::TOGGLE]
        );
    }

    #[tokio::test]
    async fn test_list_for_user_filters_by_owner() {
        let h = Harness::new();
        let caller = h.tenant("Acme").await;
        let mut mine = request();
        mine.user_id = Some(caller.user_id());
        create(&h.svc, &caller, mine).await.unwrap();
        create(&h.svc, &caller, request()).await.unwrap();

        let found = list_for_user(&h.svc, &caller, caller.user_id()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, Some(caller.user_id()));
    }
}
