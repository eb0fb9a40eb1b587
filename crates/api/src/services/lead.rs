use bizhub_core::audit::{self, action_types};
use bizhub_core::error::CoreError;
use bizhub_core::messages::{address as address_msg, lead as msg};
use bizhub_core::pagination::{PageQuery, PaginatedResponse, PaginationRequest, Predicate};
use bizhub_core::types::DbId;
use bizhub_db::models::address::Address;
use bizhub_db::models::lead::{Lead, LeadAddress, LeadRequest, FILTER_COLUMNS};
use bizhub_db::TenantEntity;
use chrono::Utc;

use super::{find_live, page, record, toggle, BulkResult};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::Services;

async fn ensure_agent(svc: &Services, user: &AuthUser, agent_id: Option<DbId>) -> AppResult<()> {
    if let Some(agent_id) = agent_id {
        if svc.stores.users.find(agent_id, user.client_id()).await?.is_none() {
            return Err(CoreError::validation(msg::INVALID_AGENT).into());
        }
    }
    Ok(())
}

/// Resolve the address a lead points at. A nested address replaces the
/// fields of `current` when there is one, and is inserted otherwise.
async fn resolve_address(
    svc: &Services,
    user: &AuthUser,
    address: LeadAddress,
    current: Option<DbId>,
) -> AppResult<DbId> {
    let now = Utc::now();
    match (address, current) {
        (LeadAddress::Existing(id), _) => {
            find_live(svc.stores.addresses.as_ref(), id, user, address_msg::INVALID_ID).await?;
            Ok(id)
        }
        (LeadAddress::New(fields), Some(current)) => {
            let mut existing =
                find_live(svc.stores.addresses.as_ref(), current, user, address_msg::INVALID_ID)
                    .await?;
            if !existing.same_location(&fields) {
                existing.apply(fields);
                existing.touch(user.actor(), now);
                svc.stores.addresses.save(&existing).await?;
            }
            Ok(current)
        }
        (LeadAddress::New(fields), None) => {
            let address = Address::new(user.client_id(), fields, user.actor(), now);
            Ok(svc.stores.addresses.insert(&address).await?.id)
        }
    }
}

/// Validate, resolve the address and insert, without auditing.
async fn insert_lead(svc: &Services, user: &AuthUser, req: &LeadRequest) -> AppResult<Lead> {
    let address = req.validate()?;
    ensure_agent(svc, user, req.assigned_agent_id).await?;
    let address_id = resolve_address(svc, user, address, None).await?;

    let mut lead = Lead::new(user.client_id(), address_id, user.actor(), Utc::now());
    req.apply_to(&mut lead);
    Ok(svc.stores.leads.insert(&lead).await?)
}

pub async fn create(svc: &Services, user: &AuthUser, req: LeadRequest) -> AppResult<Lead> {
    let created = insert_lead(svc, user, &req).await?;

    tracing::info!(lead_id = created.id, client_id = user.client_id(), "Lead created");
    record(svc, user, action_types::INSERT, audit::describe(msg::INSERTED, created.id)).await;
    Ok(created)
}

/// Insert every lead that passes on its own. Failures are keyed by email.
pub async fn bulk_create(
    svc: &Services,
    user: &AuthUser,
    items: Vec<LeadRequest>,
) -> AppResult<BulkResult> {
    if items.is_empty() {
        return Err(CoreError::validation(msg::BULK_EMPTY).into());
    }

    let mut result = BulkResult::default();
    for (index, item) in items.iter().enumerate() {
        match insert_lead(svc, user, item).await {
            Ok(_) => result.succeeded(),
            Err(e) => result.failed(index, item.email.clone(), e),
        }
    }
    Ok(result.finish(svc, user, "lead", msg::BULK_INSERTED).await)
}

pub async fn update(
    svc: &Services,
    user: &AuthUser,
    id: DbId,
    req: LeadRequest,
) -> AppResult<Lead> {
    let address = req.validate()?;
    let mut lead = find_live(svc.stores.leads.as_ref(), id, user, msg::INVALID_ID).await?;
    ensure_agent(svc, user, req.assigned_agent_id).await?;
    lead.address_id = resolve_address(svc, user, address, Some(lead.address_id)).await?;

    req.apply_to(&mut lead);
    lead.touch(user.actor(), Utc::now());
    let saved = svc.stores.leads.save(&lead).await?;

    record(svc, user, action_types::UPDATE, audit::describe(msg::UPDATED, id)).await;
    Ok(saved)
}

pub async fn toggle_deleted(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Lead> {
    toggle(svc, svc.stores.leads.as_ref(), user, id, msg::INVALID_ID, msg::TOGGLED).await
}

pub async fn get(svc: &Services, user: &AuthUser, id: DbId) -> AppResult<Lead> {
    find_live(svc.stores.leads.as_ref(), id, user, msg::INVALID_ID).await
}

/// Most recent live lead of the caller's tenant with `email`.
pub async fn get_by_email(svc: &Services, user: &AuthUser, email: &str) -> AppResult<Lead> {
    let query = PageQuery::matching(vec![Predicate::text_equals("email", email.trim().to_lowercase())]);
    svc.stores
        .leads
        .page(user.client_id(), &query)
        .await?
        .data
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::not_found(msg::NOT_FOUND).into())
}

pub async fn list(
    svc: &Services,
    user: &AuthUser,
    req: &PaginationRequest,
) -> AppResult<PaginatedResponse<Lead>> {
    page(svc.stores.leads.as_ref(), user, req, FILTER_COLUMNS).await
}
