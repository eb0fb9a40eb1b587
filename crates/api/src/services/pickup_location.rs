//! Pickup locations and their registration with the shipping provider.
//!
//! Rows are written before the provider is called so the provider never
//! holds a location we have no record of. When registration fails the
//! saved rows stay without an `external_location_id`, and the caller gets a
//! client error carrying the provider's reason.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::integrations::PickupRegistration;
use bizhub_core::messages::{address as address_msg, pickup_location as msg};
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest};
use bizhub_core::types::DbId;
use bizhub_db::models::address::Address;
use bizhub_db::models::pickup_location::{PickupLocation, PickupLocationRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, integration_failure, page, record, toggle, BulkResult};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

fn registration(nickname: &str, address: &Address) -> PickupRegistration {
    PickupRegistration {
        nickname: nickname.to_string(),
        contact_name: address
            .name_on_address
            .clone()
            .unwrap_or_else(|| nickname.to_string()),
        email: address.email_on_address.clone().unwrap_or_default(),
        phone: address.phone_on_address.clone().unwrap_or_default(),
        address_line1: address.street_address.clone(),
        address_line2: address.street_address2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        country: address.country.clone(),
        postal_code: address.postal_code.clone(),
    }
}

async fn register(svc: &Services, location: &mut PickupLocation, address: &Address) -> AppResult<()> {
    let external_id = svc
        .shipping
        .register_pickup_location(&registration(&location.address_nick_name, address))
        .await
        .map_err(|e| {
            tracing::warn!(location_id = location.id, error = %e, "Pickup registration failed");
            integration_failure(msg::REGISTRATION_FAILED_PREFIX, e)
        })?;
    tracing::info!(location_id = location.id, external_id = %external_id, "Pickup location registered");
    location.external_location_id = Some(external_id);
    Ok(())
}

/// Only one location per tenant is the default.
async fn clear_other_defaults(svc: &Services, user: &AuthUser, keep: DbId) -> AppResult<()> {
    let all = PageQuery::matching(Vec::new());
    let others = svc.stores.pickup_locations.page(user.client_id(), &all).await?.data;
    for mut other in others.into_iter().filter(|l| l.is_default && l.id != keep) {
        other.is_default = false;
        other.touch(user.actor(), Utc::now());
        svc.stores.pickup_locations.save(&other).await?;
    }
    Ok(())
}

/// Write the address and location, register with the provider and settle
/// the default flag, without auditing.
async fn insert_location(
    svc: &Services,
    user: &AuthUser,
    req: &PickupLocationRequest,
) -> AppResult<PickupLocation> {
    let (nickname, fields) = req.validate()?;
    let now = Utc::now();

    let address = Address::new(user.client_id(), fields, user.actor(), now);
    let address = svc.stores.addresses.insert(&address).await?;
    let location = PickupLocation::new(
        user.client_id(),
        nickname,
        address.id,
        req.is_default,
        user.actor(),
        now,
    );
    let mut location = svc.stores.pickup_locations.insert(&location).await?;

    register(svc, &mut location, &address).await?;
    let saved = svc.stores.pickup_locations.save(&location).await?;
    if saved.is_default {
        clear_other_defaults(svc, user, saved.id).await?;
    }
    Ok(saved)
}

pub async fn create(
    svc: &Services,
    user: &AuthUser,
    req: PickupLocationRequest,
) -> AppResult<PickupLocation> {
    let saved = insert_location(svc, user, &req).await?;
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, saved.id)).await;
    Ok(saved)
}

/// Create every location that passes on its own, registering each with the
/// provider. Failures are keyed by nickname.
pub async fn bulk_create(
    svc: &Services,
    user: &AuthUser,
    items: Vec<PickupLocationRequest>,
) -> AppResult<BulkResult> {
    if items.is_empty() {
        return Err(CoreError::validation(msg::BULK_EMPTY).into());
    }

    let mut result = BulkResult::default();
    for (index, item) in items.iter().enumerate() {
        match insert_location(svc, user, item).await {
            Ok(_) => result.succeeded(),
            Err(e) => result.failed(index, item.address_nick_name.clone(), e),
        }
    }
    Ok(result.finish(svc, user, "pickup_location", msg::BULK_INSERTED).await)
}

/// Update the location and its address. The provider is only called again
/// when the nickname or the address changed.
pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: PickupLocationRequest,
) -> AppResult<PickupLocation> {
    let (nickname, fields) = req.validate()?;
    let now = Utc::now();
    let mut location =
        find_live(svc.stores.pickup_locations.as_ref(), id, user, msg::INVALID_ID).await?;
    let mut address =
        find_live(svc.stores.addresses.as_ref(), location.address_id, user, address_msg::INVALID_ID)
            .await?;

    let relocated = !address.same_location(&fields) || location.address_nick_name != nickname;
    if !address.same_location(&fields) {
        address.apply(fields);
        address.touch(user.actor(), now);
        address = svc.stores.addresses.save(&address).await?;
    }

    location.address_nick_name = nickname;
    location.is_default = req.is_default;
    if relocated || location.external_location_id.is_none() {
        register(svc, &mut location, &address).await?;
    }
    location.touch(user.actor(), now);
    let saved = svc.stores.pickup_locations.save(&location).await?;
    if saved.is_default {
        clear_other_defaults(svc, user, saved.id).await?;
    }

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
) -> AppResult<PickupLocation> {
    toggle(svc, svc.stores.pickup_locations.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<PickupLocation> {
    find_live(svc.stores.pickup_locations.as_ref(), id, user, msg::INVALID_ID).await
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<PickupLocation>> {
    page(svc.stores.pickup_locations.as_ref(), user, req, FILTER_COLUMNS).await
}
