//! Shipments placed with the shipping provider.
//!
//! A shipment is stored only after the provider accepted the order, so every
//! stored row carries the provider's ids. Rows without a provider order are
//! treated as missing.

use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::integrations::ShipmentOrder;
use bizhub_core::messages::{
    pickup_location as location_msg, purchase_order as po_msg, shipment as msg,
};
use bizhub_core::pagination::{PaginatedResponse, PaginationRequest};
use bizhub_core::types::DbId;
use bizhub_core::validation::purchase_order::statuses as order_statuses;
use bizhub_db::models::shipment::{statuses, Shipment, ShipmentRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, integration_failure, page, record};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

fn not_found(id: DbId) -> CoreError {
    CoreError::not_found(format!("{}{id}", msg::NOT_FOUND_PREFIX))
}

pub async fn create(svc: &Services, user: &AuthUser, req: ShipmentRequest) -> AppResult<Shipment> {
    req.validate()?;
    let order_id = req.purchase_order_id.unwrap_or_default();
    let order =
        find_live(svc.stores.purchase_orders.as_ref(), order_id, user, po_msg::INVALID_ID).await?;
    if order.status != order_statuses::APPROVED
        && order.status != order_statuses::APPROVED_WITH_PARTIAL_PAYMENT
    {
        return Err(CoreError::validation(msg::ORDER_NOT_APPROVED).into());
    }
    let location = find_live(
        svc.stores.pickup_locations.as_ref(),
        req.pickup_location_id.unwrap_or_default(),
        user,
        location_msg::INVALID_ID,
    )
    .await?;

    let mut shipment = Shipment::from_request(user.client_id(), &req, user.actor(), Utc::now());
    let placed = svc
        .shipping
        .create_order(&ShipmentOrder {
            reference: format!("PO-{}-{}", order.id, Utc::now().timestamp_millis()),
            pickup_location: location.address_nick_name.clone(),
            courier_name: shipment.courier_name.clone(),
            weight_kgs: shipment.total_weight_kgs,
            quantity: shipment.total_quantity,
            declared_value: shipment.declared_value(),
        })
        .await
        .map_err(|e| integration_failure(msg::PROVIDER_FAILED_PREFIX, e))?;
    shipment.provider_order_id = Some(placed.order_id);
    shipment.provider_shipment_id = Some(placed.shipment_id);
    let shipment = svc.stores.shipments.insert(&shipment).await?;

    tracing::info!(
        shipment_id = shipment.id,
        order_id = order.id,
        client_id = user.client_id(),
        provider_order_id = shipment.provider_order_id.as_deref().unwrap_or_default(),
        "Shipment placed"
    );
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, shipment.id)).await;
    Ok(shipment)
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Shipment> {
    if id <= 0 {
        return Err(CoreError::validation(msg::INVALID_ID).into());
    }
    match svc.stores.shipments.find(id, user.client_id()).await? {
        Some(shipment) if shipment.is_placed() => Ok(shipment),
        _ => Err(not_found(id).into()),
    }
}

/// Cancel the provider order and mark the shipment cancelled.
pub async fn cancel(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Shipment> {
    let mut shipment = get(svc, user, id).await?;
    if shipment.is_cancelled() {
        return Err(CoreError::validation(msg::ALREADY_CANCELLED).into());
    }
    let Some(provider_order_id) = shipment.provider_order_id.clone() else {
        return Err(CoreError::validation(msg::NO_PROVIDER_ORDER).into());
    };
    svc.shipping
        .cancel_orders(&[provider_order_id])
        .await
        .map_err(|e| integration_failure(msg::PROVIDER_FAILED_PREFIX, e))?;

    shipment.status = statuses::CANCELLED.to_string();
    shipment.touch(user.actor(), Utc::now());
    let saved = svc.stores.shipments.save(&shipment).await?;

    record(svc, user, action_types::CANCEL, audit::describe(msg::CANCELLED, id)).await;
    Ok(saved)
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Shipment>> {
    page(svc.stores.shipments.as_ref(), user, req, FILTER_COLUMNS).await
}
