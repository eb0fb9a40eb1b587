use bizhub_core::audit::{self, action_types};
use bizhub_core::messages::{pickup_location as pickup_msg, product as msg};
use bizhub_core::pagination::{PaginatedResponse, PaginationRequest};
use bizhub_core::types::DbId;
use bizhub_db::models::product::{Product, ProductRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, page, record, toggle};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

async fn ensure_pickup_location(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<()> {
    find_live(svc.stores.pickup_locations.as_ref(), id, user, pickup_msg::INVALID_ID).await?;
    Ok(())
}

pub async fn create(svc: &Services, user: &AuthUser, req: ProductRequest) -> AppResult<Product> {
    let condition = req.validate()?;
    let mut product = Product::new(user.client_id(), user.actor(), Utc::now());
    req.apply_to(&mut product, condition);
    ensure_pickup_location(svc, user, product.pickup_location_id).await?;

    let created = svc.stores.products.insert(&product).await?;
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: ProductRequest,
) -> AppResult<Product> {
    let condition = req.validate()?;
    let mut product = find_live(svc.stores.products.as_ref(), id, user, msg::INVALID_ID).await?;
    req.apply_to(&mut product, condition);
    ensure_pickup_location(svc, user, product.pickup_location_id).await?;
    product.touch(user.actor(), Utc::now());
    let saved = svc.stores.products.save(&product).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Product> {
    toggle(svc, svc.stores.products.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

/// Flip whether the product may be returned.
pub async fn toggle_return(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Product> {
    let mut product = find_live(svc.stores.products.as_ref(), id, user, msg::INVALID_ID).await?;
    product.returns_allowed = !product.returns_allowed;
    product.touch(user.actor(), Utc::now());
    let saved = svc.stores.products.save(&product).await?;

    record(svc, user, action_types::TOGGLE, audit::describe(msg::RETURN_TOGGLED, id)).await;
    Ok(saved)
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Product> {
    find_live(svc.stores.products.as_ref(), id, user, msg::INVALID_ID).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Product>> {
    page(svc.stores.products.as_ref(), user, req, FILTER_COLUMNS).await
}

#[cfg(test)]
pub(crate) mod tests {
    use assert_matches::assert_matches;
    use bizhub_core::error::CoreError;
    use rust_decimal::Decimal;

    use super::*;
    use crate::services::pickup_location;
    use crate::services::test_support::Harness;

    pub(crate) fn request(pickup_location_id: DbId) -> ProductRequest {
        ProductRequest {
            title: Some("Steel water bottle".into()),
            description_html: Some("<p>1 litre</p>".into()),
            brand: Some("Hydra".into()),
            color_label: Some("Silver".into()),
            condition: Some("new".into()),
            country_of_manufacture: Some("India".into()),
            price: Some(Decimal::new(449, 0)),
            category_id: Some(12),
            pickup_location_id: Some(pickup_location_id),
            ..Default::default()
        }
    }

    pub(crate) async fn seed(h: &Harness, user: &AuthUser) -> Product {
        let location =
            pickup_location::create(&h.svc, user, pickup_location::tests::request("Main WH"))
                .await
                .unwrap();
        create(&h.svc, user, request(location.id)).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_normalizes_condition() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;

        let product = seed(&h, &me).await;

        assert_eq!(product.condition, "New");
        assert_eq!(product.client_id, me.client_id());
    }

    #[tokio::test]
    async fn test_pickup_location_must_exist_in_tenant() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let other = h.tenant("Globex").await;
        let theirs =
            pickup_location::create(&h.svc, &other, pickup_location::tests::request("Their WH"))
                .await
                .unwrap();

        let err = create(&h.svc, &me, request(theirs.id)).await.unwrap_err();

        assert_matches!(
            err.as_core(),
            Some(CoreError::NotFound(m)) if m == pickup_msg::INVALID_ID
        );
        assert!(h.mem.products.all().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_hides_from_get() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let product = seed(&h, &me).await;

        toggle_deleted(&h.svc, &me, product.id).await.unwrap();

        let err = get(&h.svc, &me, product.id).await.unwrap_err();
        assert_matches!(err.as_core(), Some(CoreError::NotFound(m)) if m == msg::INVALID_ID);
    }

    #[tokio::test]
    async fn test_toggle_return_flips_flag() {
        let h = Harness::new();
        let me = h.tenant("Acme").await;
        let product = seed(&h, &me).await;
        assert!(!product.returns_allowed);

        assert!(toggle_return(&h.svc, &me, product.id).await.unwrap().returns_allowed);
        assert!(!toggle_return(&h.svc, &me, product.id).await.unwrap().returns_allowed);

        let logs = h.mem.user_logs.all().await;
        assert_eq!(
            logs.last().unwrap().description,
            audit::describe(msg::RETURN_TOGGLED, product.id)
        );
    }
}
